//! Per-word co-occurrence tallies.
//!
//! For every qualifying sentence each position contributes its POS tag, its right and
//! left neighbours and every word of the surrounding window (duplicates included) to
//! the tally of the word at that position.

use std::collections::HashMap;

use log::{debug, info};
use rayon::prelude::*;

use crate::config::AnalysisOptions;
use crate::counter::FrequencyCounter;
use crate::sentence::Sentence;

/// First index of the window around `index`, never below zero.
/// # Example
/// ```
/// use ner_semantics::cooccur::window_start;
/// assert_eq!(window_start(2, 3), 0);
/// assert_eq!(window_start(10, 3), 7);
/// ```
pub fn window_start(index: usize, radius: usize) -> usize {
    index.saturating_sub(radius)
}

/// One past the last index of the window around `index`, never beyond `len`.
/// # Example
/// ```
/// use ner_semantics::cooccur::window_end;
/// assert_eq!(window_end(2, 3, 4), 4);
/// assert_eq!(window_end(2, 3, 9), 6);
/// ```
pub fn window_end(index: usize, radius: usize, len: usize) -> usize {
    (index + radius + 1).min(len)
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WordTally {
    pub pos: FrequencyCounter<String>,
    pub next: FrequencyCounter<String>,
    pub prev: FrequencyCounter<String>,
    pub context: FrequencyCounter<String>,
}

impl WordTally {
    pub fn merge(&mut self, other: WordTally) {
        self.pos.merge(other.pos);
        self.next.merge(other.next);
        self.prev.merge(other.prev);
        self.context.merge(other.context);
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AggregateStats {
    pub sentences: usize,
    pub qualifying_sentences: usize,
    pub tokens_counted: usize,
}

/// Word → tally, keyed by exact string equality. Entries are created on first sight.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TallyMap {
    tallies: HashMap<String, WordTally>,
    pub stats: AggregateStats,
}

impl TallyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, word: &str) -> Option<&WordTally> {
        self.tallies.get(word)
    }

    pub fn len(&self) -> usize {
        self.tallies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tallies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &WordTally)> {
        self.tallies.iter()
    }

    /// Adds one sentence. Returns false (and changes nothing but the sentence count)
    /// when the sentence is shorter than `min_sentence_len`.
    pub fn observe(&mut self, sentence: &Sentence, options: &AnalysisOptions) -> bool {
        self.stats.sentences += 1;
        let len = sentence.len();
        if len < options.min_sentence_len {
            debug!("skipping sentence {:?} with {} tokens", sentence.id, len);
            return false;
        }
        self.stats.qualifying_sentences += 1;
        self.stats.tokens_counted += len;

        let words = sentence.words();
        let tags = sentence.pos_tags();
        for (index, (word, pos)) in words.iter().zip(&tags).enumerate() {
            let tally = self.tallies.entry((*word).to_string()).or_default();
            tally.pos.add((*pos).to_string());
            if index + 1 < len {
                tally.next.add(words[index + 1].to_string());
            }
            if index > 0 {
                tally.prev.add(words[index - 1].to_string());
            }
            let start = window_start(index, options.window);
            let end = window_end(index, options.window, len);
            for (position, near) in words.iter().enumerate().take(end).skip(start) {
                if position != index {
                    tally.context.add((*near).to_string());
                }
            }
        }
        true
    }

    /// Sums another map into this one.
    pub fn merge(&mut self, other: TallyMap) {
        for (word, tally) in other.tallies {
            self.tallies.entry(word).or_default().merge(tally);
        }
        self.stats.sentences += other.stats.sentences;
        self.stats.qualifying_sentences += other.stats.qualifying_sentences;
        self.stats.tokens_counted += other.stats.tokens_counted;
    }
}

/// Builds the tally map over all sentences, on the rayon pool when
/// `options.parallel` is set. Both paths produce the same map.
pub fn aggregate(sentences: &[Sentence], options: &AnalysisOptions) -> TallyMap {
    let map = if options.parallel {
        aggregate_parallel(sentences, options)
    } else {
        let mut map = TallyMap::new();
        for sentence in sentences {
            map.observe(sentence, options);
        }
        map
    };
    info!(
        "aggregated {} of {} sentences into {} word tallies",
        map.stats.qualifying_sentences,
        map.stats.sentences,
        map.len()
    );
    map
}

fn aggregate_parallel(sentences: &[Sentence], options: &AnalysisOptions) -> TallyMap {
    sentences
        .par_iter()
        .fold(TallyMap::new, |mut map, sentence| {
            map.observe(sentence, options);
            map
        })
        .reduce(TallyMap::new, |mut left, right| {
            left.merge(right);
            left
        })
}
