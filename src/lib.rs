#![forbid(unsafe_code)]
//! # ner_semantics
//!
//! Cleans a token-per-row named-entity-recognition corpus (`Sentence #`, `Word`, `POS`,
//! any further columns) and derives a per-word co-occurrence table: dominant POS tag,
//! most frequent next/previous words and most frequent context words within a window.
//!
//! The stages are plain functions over owned data:
//! rows → [`clean_corpus`] → [`reassemble`] → [`aggregate`] → [`reduce`].
//! [`build_relationships`] runs the last three without touching the filesystem,
//! [`run_pipeline`] runs everything and writes both output tables.
//!
//! The cleaned sentences also feed a multi-word next-word model ([`ngram`]), used by
//! [`SemanticLookup`] for suggestions and phrase completion, and a chain of n-gram
//! part-of-speech taggers ([`tagger`]) scored by [`jackknife`] evaluation.

pub mod clean;
pub mod config;
pub mod cooccur;
pub mod counter;
pub mod error;
pub mod export;
pub mod jackknife;
pub mod lookup;
pub mod ngram;
pub mod reduce;
pub mod sentence;
pub mod tagger;

use std::path::Path;

use log::{info, warn};

pub use clean::{
    CleanedCorpus, CleaningStats, RawCorpus, canonicalize_pos, clean_corpus, normalize_text,
    read_corpus, read_corpus_path,
};
pub use config::{AnalysisOptions, ExportFormat, PipelineConfig};
pub use cooccur::{AggregateStats, TallyMap, WordTally, aggregate};
pub use counter::FrequencyCounter;
pub use error::{Error, Result};
pub use export::{
    format_for_path, read_relationships_as, read_relationships_path, write_cleaned,
    write_relationships,
};
pub use jackknife::{JackknifeReport, jackknife};
pub use lookup::{SemanticLookup, Suggestion, SuggestionSource};
pub use ngram::{NGramModel, build_ngrams};
pub use reduce::{
    RankedEntry, RankedList, RelationshipRow, RelationshipTable, UNKNOWN_POS, reduce,
};
pub use sentence::{Sentence, TokenRow, reassemble};
pub use tagger::{Accuracy, DefaultTagger, NGramTagger, Tagger, evaluate, tagger_chain};

/// Reads a corpus table, cleans it and reassembles its sentences.
pub fn read_sentences(path: &Path) -> Result<Vec<Sentence>> {
    let cleaned = clean_corpus(&read_corpus_path(path)?);
    let sentences = reassemble(&cleaned.rows);
    info!("read {} sentences from {}", sentences.len(), path.display());
    Ok(sentences)
}

/// Reassembles, aggregates and reduces cleaned rows, returning the aggregation
/// statistics alongside the table.
pub fn analyze_rows(
    rows: &[TokenRow],
    options: &AnalysisOptions,
) -> (RelationshipTable, AggregateStats) {
    let sentences = reassemble(rows);
    info!("reassembled {} sentences from {} rows", sentences.len(), rows.len());
    let tallies = aggregate(&sentences, options);
    (reduce(&tallies, options), tallies.stats)
}

/// Relationship table for cleaned rows.
/// # Example
/// ```
/// use ner_semantics::{AnalysisOptions, TokenRow, build_relationships};
/// let rows = vec![
///     TokenRow::new("1", "the", "DT"),
///     TokenRow::new("1", "cat", "NN"),
///     TokenRow::new("1", "sat", "VB"),
/// ];
/// let table = build_relationships(&rows, &AnalysisOptions::default());
/// let cat = table.iter().find(|r| r.word == "cat").unwrap();
/// assert_eq!(cat.next_words.to_string(), "sat:1");
/// ```
pub fn build_relationships(rows: &[TokenRow], options: &AnalysisOptions) -> RelationshipTable {
    analyze_rows(rows, options).0
}

/// Outcome of a pipeline run.
#[derive(Clone, Debug)]
pub struct PipelineReport {
    pub cleaning: CleaningStats,
    pub aggregate: AggregateStats,
    pub relationships: usize,
    /// Human readable statistics and sample relationships (what the CLI prints)
    pub summary: String,
}

/// Reads the input table, cleans it, builds the relationship table and writes both
/// outputs. Any failure aborts the run; nothing is written unless the analysis
/// succeeded.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineReport> {
    config.options.validate()?;

    info!("loading data from {}", config.input_path.display());
    let raw = read_corpus_path(&config.input_path)?;
    let cleaned = clean_corpus(&raw);

    info!("building semantic relationships");
    let (table, aggregate_stats) = analyze_rows(&cleaned.rows, &config.options);
    if table.is_empty() {
        warn!("no qualifying sentences; the relationship table is empty");
    }

    write_cleaned(&config.cleaned_output_path, &cleaned)?;
    write_relationships(&config.semantic_output_path, &table, config.export_format)?;

    let summary = format_summary(&cleaned.stats, &aggregate_stats, &table, config.samples);
    Ok(PipelineReport {
        cleaning: cleaned.stats,
        aggregate: aggregate_stats,
        relationships: table.len(),
        summary,
    })
}

/// Run statistics followed by up to `samples` relationships as `word -> related`.
pub fn format_summary(
    cleaning: &CleaningStats,
    aggregate: &AggregateStats,
    table: &RelationshipTable,
    samples: usize,
) -> String {
    let mut out = format!(
        "Original rows: {}\nCleaned rows: {}\nRows removed: {}\nUnique words: {}\n\
         Unique POS tags: {}\nSentences: {} (qualifying: {})\nRelationships: {}\n",
        cleaning.original_rows,
        cleaning.cleaned_rows,
        cleaning.removed_rows,
        cleaning.unique_words,
        cleaning.unique_pos_tags,
        aggregate.sentences,
        aggregate.qualifying_sentences,
        table.len()
    );
    if samples > 0 && !table.is_empty() {
        out.push_str("\nSample semantic relationships:\n");
        for row in table.iter().take(samples) {
            out.push_str(&format!("{} -> {}\n", row.word, row.related_words));
        }
    }
    out
}
