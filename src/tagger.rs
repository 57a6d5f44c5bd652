//! Part-of-speech taggers trained on the cleaned corpus.
//!
//! An n-gram tagger of order `n` picks the most frequent tag seen for the current word
//! after the `n - 1` preceding tags, and hands positions with an unseen context to its
//! backoff tagger. The chain ends in a [`DefaultTagger`]. While tagging, the tags already
//! predicted for earlier positions form the context of later ones.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::counter::FrequencyCounter;
use crate::sentence::Sentence;

/// Tag of the fallback tagger.
pub const DEFAULT_TAG: &str = "NN";

/// Highest n-gram order of a tagger chain.
pub const MAX_ORDER: usize = 4;

/// Stands in for the tags before the first word.
const START: &str = "START";

static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[[:punct:]]+$").unwrap());
static NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(?:[.,][0-9]+)?$").unwrap());

/// Fixed tag for punctuation and numbers; `None` for ordinary words.
pub fn shape_tag(word: &str) -> Option<&'static str> {
    if PUNCTUATION.is_match(word) {
        return Some(match word {
            "." | "!" | "?" => ".",
            "," => ",",
            ":" | ";" => ":",
            "(" | ")" => "-LRB-",
            "[" | "]" => "-LSB-",
            "{" | "}" => "-LCB-",
            _ => "SYM",
        });
    }
    if NUMERIC.is_match(word) {
        return Some("CD");
    }
    None
}

pub trait Tagger: Send + Sync {
    /// Tag for `words[position]`; `tags` holds the tags of the positions before it.
    fn predict(&self, words: &[String], tags: &[String], position: usize) -> String;

    /// Tags a whole sentence left to right.
    fn tag(&self, words: &[String]) -> Vec<String> {
        let mut tags: Vec<String> = Vec::with_capacity(words.len());
        for (position, word) in words.iter().enumerate() {
            let tag = match shape_tag(word) {
                Some(tag) => tag.to_string(),
                None => self.predict(words, &tags, position),
            };
            tags.push(tag);
        }
        tags
    }
}

/// Tags every word with the same tag.
#[derive(Clone, Debug)]
pub struct DefaultTagger {
    tag: String,
}

impl DefaultTagger {
    pub fn new(tag: impl Into<String>) -> Self {
        DefaultTagger { tag: tag.into() }
    }
}

impl Default for DefaultTagger {
    fn default() -> Self {
        Self::new(DEFAULT_TAG)
    }
}

impl Tagger for DefaultTagger {
    fn predict(&self, _words: &[String], _tags: &[String], _position: usize) -> String {
        self.tag.clone()
    }

    fn tag(&self, words: &[String]) -> Vec<String> {
        vec![self.tag.clone(); words.len()]
    }
}

type Context = (Vec<String>, String);

pub struct NGramTagger {
    order: usize,
    table: HashMap<Context, String>,
    backoff: Arc<dyn Tagger>,
}

impl NGramTagger {
    /// Trains an order-`order` tagger (at least 1) on gold-tagged sentences.
    pub fn train(order: usize, sentences: &[Sentence], backoff: Arc<dyn Tagger>) -> Self {
        let order = order.max(1);
        let mut counts: HashMap<Context, FrequencyCounter<String>> = HashMap::new();
        for sentence in sentences {
            let words: Vec<String> = sentence.words().into_iter().map(String::from).collect();
            let tags: Vec<String> = sentence.pos_tags().into_iter().map(String::from).collect();
            for (position, tag) in tags.iter().enumerate() {
                counts
                    .entry(context(order, &words, &tags, position))
                    .or_default()
                    .add(tag.clone());
            }
        }
        let table = counts
            .into_iter()
            .filter_map(|(ctx, tags)| tags.most_common().map(|(tag, _)| (ctx, tag.clone())))
            .collect();
        NGramTagger {
            order,
            table,
            backoff,
        }
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of contexts with a learned tag.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Tagger for NGramTagger {
    fn predict(&self, words: &[String], tags: &[String], position: usize) -> String {
        match self.table.get(&context(self.order, words, tags, position)) {
            Some(tag) => tag.clone(),
            None => self.backoff.predict(words, tags, position),
        }
    }
}

/// The `order - 1` tags before `position` (padded with `START`) and the lower-cased word.
fn context(order: usize, words: &[String], tags: &[String], position: usize) -> Context {
    let previous = (1..order)
        .rev()
        .map(|offset| match position.checked_sub(offset) {
            Some(i) => tags[i].clone(),
            None => START.to_string(),
        })
        .collect();
    (previous, words[position].to_lowercase())
}

/// Taggers of order 0 (default) up to `max_order`, each backing off to the previous one.
pub fn tagger_chain(max_order: usize, sentences: &[Sentence]) -> Vec<Arc<dyn Tagger>> {
    let mut chain: Vec<Arc<dyn Tagger>> = vec![Arc::new(DefaultTagger::default())];
    for order in 1..=max_order {
        let backoff = Arc::clone(&chain[order - 1]);
        chain.push(Arc::new(NGramTagger::train(order, sentences, backoff)));
    }
    chain
}

/// Correctly tagged tokens out of all tokens.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Accuracy {
    pub correct: usize,
    pub total: usize,
}

impl Accuracy {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 * 100.0 / self.total as f64
        }
    }
}

/// Tags every sentence and compares with its gold tags.
pub fn evaluate(tagger: &dyn Tagger, sentences: &[Sentence]) -> Accuracy {
    let mut accuracy = Accuracy::default();
    for sentence in sentences {
        let words: Vec<String> = sentence.words().into_iter().map(String::from).collect();
        let predicted = tagger.tag(&words);
        for (gold, guess) in sentence.pos_tags().into_iter().zip(&predicted) {
            accuracy.total += 1;
            if gold == guess.as_str() {
                accuracy.correct += 1;
            }
        }
    }
    accuracy
}
