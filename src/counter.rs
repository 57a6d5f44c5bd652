//! Multiset with ranked top-k extraction.
//!
//! Ranking is always count descending, then item ascending, so equal counts come out
//! in a fixed order no matter in which order the items were added.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrequencyCounter<T: Eq + Hash> {
    counts: HashMap<T, usize>,
    total: usize,
}

impl<T: Eq + Hash> Default for FrequencyCounter<T> {
    fn default() -> Self {
        FrequencyCounter {
            counts: HashMap::new(),
            total: 0,
        }
    }
}

impl<T: Eq + Hash + Ord + Clone> FrequencyCounter<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: T) {
        self.add_n(item, 1);
    }

    pub fn add_n(&mut self, item: T, n: usize) {
        if n == 0 {
            return;
        }
        *self.counts.entry(item).or_insert(0) += n;
        self.total += n;
    }

    pub fn count(&self, item: &T) -> usize {
        self.counts.get(item).copied().unwrap_or(0)
    }

    /// Number of observations, duplicates included.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of distinct items.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Sums `other` into `self`.
    pub fn merge(&mut self, other: FrequencyCounter<T>) {
        for (item, n) in other.counts {
            self.add_n(item, n);
        }
    }

    pub fn most_common(&self) -> Option<(&T, usize)> {
        self.counts
            .iter()
            .map(|(item, n)| (item, *n))
            .min_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)))
    }

    /// The `k` highest ranked items with their counts.
    pub fn top(&self, k: usize) -> Vec<(T, usize)> {
        let mut ranked: Vec<(&T, usize)> = self.counts.iter().map(|(t, n)| (t, *n)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
            .into_iter()
            .take(k)
            .map(|(t, n)| (t.clone(), n))
            .collect()
    }
}

impl<T: Eq + Hash + Ord + Clone> FromIterator<T> for FrequencyCounter<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut counter = FrequencyCounter::new();
        counter.extend(iter);
        counter
    }
}

impl<T: Eq + Hash + Ord + Clone> Extend<T> for FrequencyCounter<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.add(item);
        }
    }
}
