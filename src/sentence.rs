//! Sentence reassembly from the flat token-per-row stream.
//!
//! The corpus marks a sentence only on its first row; the rows that follow carry an
//! empty sentence id until the next sentence starts. A boundary is declared only when
//! an incoming id is non-empty and differs from the id of the sentence being built.

/// One cleaned corpus record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenRow {
    pub sentence_id: String,
    pub word: String,
    pub pos: String,
}

impl TokenRow {
    pub fn new(
        sentence_id: impl Into<String>,
        word: impl Into<String>,
        pos: impl Into<String>,
    ) -> Self {
        TokenRow {
            sentence_id: sentence_id.into(),
            word: word.into(),
            pos: pos.into(),
        }
    }

    /// Row continues whatever sentence is currently open.
    pub fn is_continuation(&self) -> bool {
        self.sentence_id.trim().is_empty()
    }
}

/// Ordered `(word, pos)` pairs of one sentence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sentence {
    /// Id of the row that opened the sentence; empty when the stream started with
    /// continuation rows only.
    pub id: String,
    pub tokens: Vec<(String, String)>,
}

impl Sentence {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn words(&self) -> Vec<&str> {
        self.tokens.iter().map(|(w, _)| w.as_str()).collect()
    }

    pub fn pos_tags(&self) -> Vec<&str> {
        self.tokens.iter().map(|(_, p)| p.as_str()).collect()
    }
}

/// Incremental reassembler: feed rows in order, collect completed sentences.
#[derive(Debug, Default)]
pub struct Reassembler {
    current_id: Option<String>,
    buffer: Vec<(String, String)>,
}

impl Reassembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a row. Returns the previous sentence if this row starts a new one.
    pub fn push(&mut self, row: &TokenRow) -> Option<Sentence> {
        let mut completed = None;
        if !row.is_continuation() {
            let id = row.sentence_id.trim();
            if let Some(current) = &self.current_id {
                if current != id {
                    completed = self.flush();
                }
            }
            if self.current_id.as_deref() != Some(id) {
                self.current_id = Some(id.to_string());
            }
        }
        self.buffer.push((row.word.clone(), row.pos.clone()));
        completed
    }

    /// Flushes the last open sentence, if any.
    pub fn finish(mut self) -> Option<Sentence> {
        self.flush()
    }

    fn flush(&mut self) -> Option<Sentence> {
        if self.buffer.is_empty() {
            return None;
        }
        Some(Sentence {
            id: self.current_id.clone().unwrap_or_default(),
            tokens: std::mem::take(&mut self.buffer),
        })
    }
}

/// Groups an ordered row stream into sentences. No rows yield no sentences.
pub fn reassemble(rows: &[TokenRow]) -> Vec<Sentence> {
    let mut reassembler = Reassembler::new();
    let mut sentences = Vec::new();
    for row in rows {
        if let Some(sentence) = reassembler.push(row) {
            sentences.push(sentence);
        }
    }
    sentences.extend(reassembler.finish());
    sentences
}
