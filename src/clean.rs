//! Reading and cleaning of the token-per-row corpus.
//!
//! Every transform here is a pure function of one value: the text normalizer, the
//! POS tag canonicalizer and the row filter. Columns other than `Word` and `POS` pass
//! through untouched.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::LazyLock;

use csv::{ReaderBuilder, StringRecord};
use log::{debug, info};
use regex::Regex;

use crate::error::{Error, Result};
use crate::sentence::TokenRow;

pub const SENTENCE_COLUMN: &str = "Sentence #";
pub const WORD_COLUMN: &str = "Word";
pub const POS_COLUMN: &str = "POS";

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
// word chars, whitespace and . , ; ! ? - survive
static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s.,;!?-]").unwrap());
static SPACE_BEFORE_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s([.,;!?])").unwrap());

/// Universal tags mapped to their Penn Treebank counterpart.
const POS_TAG_MAP: &[(&str, &str)] = &[
    ("NOUN", "NN"),
    ("VERB", "VB"),
    ("ADJ", "JJ"),
    ("ADV", "RB"),
    ("ADP", "IN"),
    ("DET", "DT"),
    ("PRON", "PRP"),
    ("CONJ", "CC"),
    ("NUM", "CD"),
    ("PART", "RP"),
    ("INTJ", "UH"),
];

/// Lower-cases, collapses whitespace, strips special characters (keeping `.,;!?-`)
/// and glues punctuation to the preceding text.
/// # Example
/// ```
/// use ner_semantics::normalize_text;
/// assert_eq!(normalize_text("  Hello   (World) !"), "hello world!");
/// assert_eq!(normalize_text("$"), "");
/// ```
pub fn normalize_text(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let collapsed = WHITESPACE.replace_all(&lowered, " ");
    let kept = DISALLOWED.replace_all(collapsed.trim(), "");
    let glued = SPACE_BEFORE_PUNCT.replace_all(&kept, "$1");
    glued.trim().to_string()
}

/// Maps a POS tag through the fixed canonicalization table, identity if absent.
pub fn canonicalize_pos(tag: &str) -> String {
    let tag = tag.trim();
    POS_TAG_MAP
        .iter()
        .find(|(from, _)| *from == tag)
        .map(|(_, to)| (*to).to_string())
        .unwrap_or_else(|| tag.to_string())
}

/// UTF-8 if valid, otherwise ISO-8859-1 (one byte, one char).
fn decode_field(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

fn decode_record(record: &csv::ByteRecord) -> StringRecord {
    record.iter().map(decode_field).collect()
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Columns {
    sentence: usize,
    word: usize,
    pos: usize,
}

impl Columns {
    fn locate(headers: &StringRecord, source: &str) -> Result<Self> {
        let find = |column: &'static str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == column)
                .ok_or_else(|| Error::MissingColumn {
                    column,
                    path: source.to_string(),
                })
        };
        Ok(Columns {
            sentence: find(SENTENCE_COLUMN)?,
            word: find(WORD_COLUMN)?,
            pos: find(POS_COLUMN)?,
        })
    }
}

/// The input table as read, before any cleaning.
#[derive(Clone, Debug)]
pub struct RawCorpus {
    pub headers: StringRecord,
    pub records: Vec<StringRecord>,
    columns: Columns,
}

impl RawCorpus {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Reads a corpus table. `source` only names the input in error messages.
pub fn read_corpus<R: Read>(reader: R, source: &str) -> Result<RawCorpus> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = decode_record(rdr.byte_headers()?);
    let columns = Columns::locate(&headers, source)?;
    let mut records = Vec::new();
    for result in rdr.byte_records() {
        records.push(decode_record(&result?));
    }
    debug!("read {} records from {}", records.len(), source);
    Ok(RawCorpus {
        headers,
        records,
        columns,
    })
}

pub fn read_corpus_path(path: &Path) -> Result<RawCorpus> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    read_corpus(BufReader::new(file), &path.display().to_string())
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CleaningStats {
    pub original_rows: usize,
    pub cleaned_rows: usize,
    pub removed_rows: usize,
    pub unique_words: usize,
    pub unique_pos_tags: usize,
}

/// Cleaned table (for export) plus the token rows the analysis runs on.
#[derive(Clone, Debug)]
pub struct CleanedCorpus {
    pub headers: StringRecord,
    /// Kept records, `Word`/`POS` rewritten, padded or cut to the header width
    pub records: Vec<StringRecord>,
    pub rows: Vec<TokenRow>,
    pub stats: CleaningStats,
}

/// Applies normalizer, canonicalizer and row filter to every record.
///
/// A record is dropped when its `Word` or `POS` field is missing or its normalized
/// word or canonical tag is empty. An empty sentence id is kept: it marks a row that
/// continues the current sentence.
pub fn clean_corpus(raw: &RawCorpus) -> CleanedCorpus {
    let cols = raw.columns;
    let width = raw.headers.len();
    let mut records = Vec::with_capacity(raw.records.len());
    let mut rows = Vec::with_capacity(raw.records.len());

    for record in &raw.records {
        let (Some(word), Some(pos)) = (record.get(cols.word), record.get(cols.pos)) else {
            continue;
        };
        let word = normalize_text(word);
        let pos = canonicalize_pos(pos);
        if word.is_empty() || pos.is_empty() {
            continue;
        }
        let sentence_id = record.get(cols.sentence).unwrap_or("").trim().to_string();

        let cleaned: StringRecord = (0..width)
            .map(|i| match i {
                i if i == cols.word => word.as_str(),
                i if i == cols.pos => pos.as_str(),
                i => record.get(i).unwrap_or(""),
            })
            .collect();
        records.push(cleaned);
        rows.push(TokenRow {
            sentence_id,
            word,
            pos,
        });
    }

    let unique_words: HashSet<&str> = rows.iter().map(|r| r.word.as_str()).collect();
    let unique_pos: HashSet<&str> = rows.iter().map(|r| r.pos.as_str()).collect();
    let stats = CleaningStats {
        original_rows: raw.len(),
        cleaned_rows: rows.len(),
        removed_rows: raw.len() - rows.len(),
        unique_words: unique_words.len(),
        unique_pos_tags: unique_pos.len(),
    };
    info!(
        "cleaned {} rows, removed {}",
        stats.cleaned_rows, stats.removed_rows
    );

    CleanedCorpus {
        headers: raw.headers.clone(),
        records,
        rows,
        stats,
    }
}
