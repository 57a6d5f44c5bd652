//! Next-word model over word sequences of one to three words.
//!
//! Every qualifying sentence adds, for each position and each context length `n`, the
//! word that follows the `n` words starting there. Predictions back off from the
//! longest context that was seen to shorter ones.

use std::collections::HashMap;

use log::info;
use rayon::prelude::*;

use crate::config::AnalysisOptions;
use crate::counter::FrequencyCounter;
use crate::sentence::Sentence;

/// Longest context (in words) the model keeps.
pub const MAX_CONTEXT: usize = 3;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NGramModel {
    followers: HashMap<Vec<String>, FrequencyCounter<String>>,
}

impl NGramModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct contexts.
    pub fn len(&self) -> usize {
        self.followers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.followers.is_empty()
    }

    /// Adds every context/follower pair of one sentence.
    pub fn observe(&mut self, words: &[&str]) {
        for start in 0..words.len() {
            for n in 1..=MAX_CONTEXT {
                let Some(next) = words.get(start + n) else {
                    break;
                };
                let context: Vec<String> =
                    words[start..start + n].iter().map(|w| w.to_string()).collect();
                self.followers
                    .entry(context)
                    .or_default()
                    .add((*next).to_string());
            }
        }
    }

    pub fn merge(&mut self, other: NGramModel) {
        for (context, counter) in other.followers {
            self.followers.entry(context).or_default().merge(counter);
        }
    }

    /// Words seen right after exactly this sequence.
    pub fn followers(&self, context: &[String]) -> Option<&FrequencyCounter<String>> {
        self.followers.get(context)
    }

    /// Ranked followers of the last `n` words of `tokens`, if that many exist.
    pub fn ranked_after(&self, tokens: &[String], n: usize, k: usize) -> Vec<(String, usize)> {
        if n == 0 || tokens.len() < n {
            return Vec::new();
        }
        self.followers(&tokens[tokens.len() - n..])
            .map(|f| f.top(k))
            .unwrap_or_default()
    }

    /// Most frequent follower of the longest matching suffix of `tokens`.
    pub fn predict(&self, tokens: &[String]) -> Option<&str> {
        (1..=MAX_CONTEXT.min(tokens.len())).rev().find_map(|n| {
            self.followers(&tokens[tokens.len() - n..])
                .and_then(|f| f.most_common())
                .map(|(word, _)| word.as_str())
        })
    }
}

/// Builds the model over sentences with at least `options.min_sentence_len` tokens,
/// on the rayon pool when `options.parallel` is set.
pub fn build_ngrams(sentences: &[Sentence], options: &AnalysisOptions) -> NGramModel {
    let qualifying = |s: &&Sentence| s.len() >= options.min_sentence_len;
    let model = if options.parallel {
        sentences
            .par_iter()
            .filter(qualifying)
            .fold(NGramModel::new, |mut model, sentence| {
                model.observe(&sentence.words());
                model
            })
            .reduce(NGramModel::new, |mut left, right| {
                left.merge(right);
                left
            })
    } else {
        let mut model = NGramModel::new();
        for sentence in sentences.iter().filter(qualifying) {
            model.observe(&sentence.words());
        }
        model
    };
    info!("built next-word model with {} contexts", model.len());
    model
}
