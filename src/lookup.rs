//! Read-only queries over a relationship table.

use std::collections::HashMap;
use std::path::Path;

use log::info;

use crate::clean::normalize_text;
use crate::config::ExportFormat;
use crate::error::Result;
use crate::export::{format_for_path, read_relationships_as};
use crate::ngram::{MAX_CONTEXT, NGramModel};
use crate::reduce::{RankedEntry, RelationshipRow, RelationshipTable};

/// Function words used to top up suggestions when the table knows too little.
pub const COMMON_WORDS: &[&str] = &[
    "the", "a", "an", "and", "in", "on", "at", "to", "with", "by", "for", "of", "that", "this",
    "is", "are", "was", "were", "be",
];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SuggestionSource {
    /// Followed the last three context words.
    Trigram,
    /// Followed the last two context words.
    Bigram,
    /// Followed the last context word.
    Next,
    Related,
    Common,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Suggestion {
    pub word: String,
    pub source: SuggestionSource,
}

#[derive(Clone, Debug, Default)]
pub struct SemanticLookup {
    rows: HashMap<String, RelationshipRow>,
    ngrams: NGramModel,
}

/// Context words normalized one by one; words that normalize to nothing are dropped.
fn context_tokens(context: &str) -> Vec<String> {
    context
        .split_whitespace()
        .map(normalize_text)
        .filter(|w| !w.is_empty())
        .collect()
}

impl SemanticLookup {
    pub fn from_table(table: RelationshipTable) -> Self {
        let rows = table
            .rows
            .into_iter()
            .map(|row| (row.word.clone(), row))
            .collect();
        SemanticLookup {
            rows,
            ngrams: NGramModel::default(),
        }
    }

    /// Adds a next-word model for multi-word contexts.
    pub fn with_ngrams(mut self, ngrams: NGramModel) -> Self {
        self.ngrams = ngrams;
        self
    }

    /// Loads a table written by the pipeline, format from the file extension.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with(path, format_for_path(path))
    }

    /// Loads a table written by the pipeline in `format`.
    pub fn load_with(path: &Path, format: ExportFormat) -> Result<Self> {
        let table = read_relationships_as(path, format)?;
        info!("loaded {} relationships from {}", table.len(), path.display());
        Ok(Self::from_table(table))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Looks up a word after normalizing it the way the corpus was normalized.
    pub fn get(&self, word: &str) -> Option<&RelationshipRow> {
        self.rows.get(&normalize_text(word))
    }

    pub fn common_pos(&self, word: &str) -> Option<&str> {
        self.get(word).map(|r| r.common_pos.as_str())
    }

    pub fn next_words(&self, word: &str, k: usize) -> Vec<&RankedEntry> {
        self.get(word)
            .map(|r| r.next_words.iter().take(k).collect())
            .unwrap_or_default()
    }

    pub fn previous_words(&self, word: &str, k: usize) -> Vec<&RankedEntry> {
        self.get(word)
            .map(|r| r.prev_words.iter().take(k).collect())
            .unwrap_or_default()
    }

    pub fn related(&self, word: &str, k: usize) -> Vec<&RankedEntry> {
        self.get(word)
            .map(|r| r.related_words.iter().take(k).collect())
            .unwrap_or_default()
    }

    /// Up to `k` suggestions for the word following `context`.
    ///
    /// Followers of the last three and then the last two context words come first,
    /// then ranked next words of the last word, then its related words, then
    /// [`COMMON_WORDS`]. No word is suggested twice.
    pub fn suggest_next(&self, context: &str, k: usize) -> Vec<Suggestion> {
        let tokens = context_tokens(context);
        let mut out: Vec<Suggestion> = Vec::with_capacity(k);
        let mut push = |word: &str, source: SuggestionSource| {
            if out.len() < k && !out.iter().any(|s| s.word == word) {
                out.push(Suggestion {
                    word: word.to_string(),
                    source,
                });
            }
        };

        for (n, source) in [
            (MAX_CONTEXT, SuggestionSource::Trigram),
            (2, SuggestionSource::Bigram),
        ] {
            for (word, _) in self.ngrams.ranked_after(&tokens, n, k) {
                push(&word, source);
            }
        }
        if let Some(last) = tokens.last() {
            if let Some(row) = self.rows.get(last) {
                for word in row.next_words.words() {
                    push(word, SuggestionSource::Next);
                }
            }
            for (word, _) in self.ngrams.ranked_after(&tokens, 1, k) {
                push(&word, SuggestionSource::Next);
            }
            if let Some(row) = self.rows.get(last) {
                for word in row.related_words.words() {
                    push(word, SuggestionSource::Related);
                }
            }
        }
        for word in COMMON_WORDS {
            push(*word, SuggestionSource::Common);
        }
        out
    }

    /// Single most likely next word: the longest matching n-gram context, else the top
    /// ranked next word of the last word in the table.
    pub fn predict_next(&self, tokens: &[String]) -> Option<String> {
        if let Some(word) = self.ngrams.predict(tokens) {
            return Some(word.to_string());
        }
        let last = tokens.last()?;
        let row = self.rows.get(last)?;
        row.next_words.words().next().map(String::from)
    }

    /// Up to `count` distinct continuations of `context`, each extended by up to
    /// `extra_words` words.
    ///
    /// Each phrase starts from a different [`suggest_next`](Self::suggest_next) candidate
    /// and is then extended greedily with [`predict_next`](Self::predict_next), stopping
    /// early when nothing is predicted.
    pub fn complete_phrases(
        &self,
        context: &str,
        extra_words: usize,
        count: usize,
    ) -> Vec<String> {
        if extra_words == 0 || count == 0 {
            return Vec::new();
        }
        let tokens = context_tokens(context);
        let mut phrases: Vec<String> = Vec::with_capacity(count);
        for first in self.suggest_next(context, count) {
            let mut phrase = tokens.clone();
            phrase.push(first.word);
            while phrase.len() - tokens.len() < extra_words {
                match self.predict_next(&phrase) {
                    Some(word) => phrase.push(word),
                    None => break,
                }
            }
            let text = phrase.join(" ");
            if !phrases.contains(&text) {
                phrases.push(text);
            }
        }
        phrases
    }
}
