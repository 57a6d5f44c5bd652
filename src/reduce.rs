//! Reduction of word tallies into the relationship table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::AnalysisOptions;
use crate::cooccur::{TallyMap, WordTally};
use crate::counter::FrequencyCounter;
use crate::error::Error;

/// `Common_POS` of a word without POS observations.
pub const UNKNOWN_POS: &str = "UNK";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub word: String,
    pub count: usize,
}

/// Ranked `(word, count)` list, rendered as `word:count` pairs joined by commas.
/// # Example
/// ```
/// use ner_semantics::RankedList;
/// let list: RankedList = "sat:2,down:1".parse().unwrap();
/// assert_eq!(list.len(), 2);
/// assert_eq!(list.to_string(), "sat:2,down:1");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankedList(pub Vec<RankedEntry>);

impl RankedList {
    /// The `k` highest ranked entries of a counter.
    pub fn from_counter(counter: &FrequencyCounter<String>, k: usize) -> Self {
        RankedList(
            counter
                .top(k)
                .into_iter()
                .map(|(word, count)| RankedEntry { word, count })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankedEntry> {
        self.0.iter()
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|e| e.word.as_str())
    }
}

impl fmt::Display for RankedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}:{}", entry.word, entry.count)?;
        }
        Ok(())
    }
}

// Normalized words never contain ':', so the first ':' always ends a word and the
// digits after it end at the separating ',' (words may themselves contain commas).
impl FromStr for RankedList {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || Error::MalformedList(s.to_string());
        let mut entries = Vec::new();
        let mut rest = s;
        while !rest.is_empty() {
            let colon = rest.find(':').ok_or_else(malformed)?;
            let word = &rest[..colon];
            let after = &rest[colon + 1..];
            let digits = after
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(after.len());
            if word.is_empty() || digits == 0 {
                return Err(malformed());
            }
            let count = after[..digits].parse().map_err(|_| malformed())?;
            entries.push(RankedEntry {
                word: word.to_string(),
                count,
            });
            rest = &after[digits..];
            if !rest.is_empty() {
                rest = rest.strip_prefix(',').ok_or_else(malformed)?;
                if rest.is_empty() {
                    return Err(malformed());
                }
            }
        }
        Ok(RankedList(entries))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipRow {
    #[serde(rename = "Word")]
    pub word: String,
    #[serde(rename = "Common_POS")]
    pub common_pos: String,
    #[serde(rename = "Next_Words")]
    pub next_words: RankedList,
    #[serde(rename = "Prev_Words")]
    pub prev_words: RankedList,
    #[serde(rename = "Related_Words")]
    pub related_words: RankedList,
}

/// Relationship rows ordered by word.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RelationshipTable {
    pub rows: Vec<RelationshipRow>,
}

impl RelationshipTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RelationshipRow> {
        self.rows.iter()
    }
}

/// Summarizes one tally. Total over any tally, including the empty one.
pub fn summarize(word: &str, tally: &WordTally, options: &AnalysisOptions) -> RelationshipRow {
    RelationshipRow {
        word: word.to_string(),
        common_pos: tally
            .pos
            .most_common()
            .map(|(tag, _)| tag.clone())
            .unwrap_or_else(|| UNKNOWN_POS.to_string()),
        next_words: RankedList::from_counter(&tally.next, options.max_next),
        prev_words: RankedList::from_counter(&tally.prev, options.max_prev),
        related_words: RankedList::from_counter(&tally.context, options.max_related),
    }
}

/// Reduces every tally; the map is only read, so repeated calls give equal tables.
pub fn reduce(tallies: &TallyMap, options: &AnalysisOptions) -> RelationshipTable {
    let mut rows: Vec<RelationshipRow> = tallies
        .iter()
        .map(|(word, tally)| summarize(word, tally, options))
        .collect();
    rows.sort_by(|a, b| a.word.cmp(&b.word));
    RelationshipTable { rows }
}
