//! Run configuration: file locations, export format and the tunables of the
//! co-occurrence analysis.

use std::path::PathBuf;

use clap::ValueEnum;

use crate::error::{Error, Result};

pub const DEFAULT_INPUT_PATH: &str = "../resources/ner_dataset2.csv";
pub const DEFAULT_CLEANED_OUTPUT_PATH: &str = "../resources/cleaned_ner_dataset.csv";
pub const DEFAULT_SEMANTIC_OUTPUT_PATH: &str = "../resources/semantic_data.csv";

/// Output format for the relationship table.
///
/// The cleaned corpus is always written as CSV so that it keeps the shape of the input.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Csv,
    Tsv,
    Json,
}

/// Tunables of the sentence/co-occurrence analysis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Context window radius (±window tokens around each word)
    pub window: usize,
    /// Sentences shorter than this contribute nothing
    pub min_sentence_len: usize,
    /// Cap for `Next_Words`
    pub max_next: usize,
    /// Cap for `Prev_Words`
    pub max_prev: usize,
    /// Cap for `Related_Words`
    pub max_related: usize,
    /// Aggregate sentences on the rayon thread pool
    pub parallel: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            window: 3,
            min_sentence_len: 3,
            max_next: 5,
            max_prev: 5,
            max_related: 10,
            parallel: false,
        }
    }
}

impl AnalysisOptions {
    pub fn validate(&self) -> Result<()> {
        if self.window == 0 {
            return Err(Error::InvalidOption("window must be at least 1".into()));
        }
        if self.min_sentence_len == 0 {
            return Err(Error::InvalidOption(
                "minimum sentence length must be at least 1".into(),
            ));
        }
        for (name, cap) in [
            ("max-next", self.max_next),
            ("max-prev", self.max_prev),
            ("max-related", self.max_related),
        ] {
            if cap == 0 {
                return Err(Error::InvalidOption(format!("{name} must be at least 1")));
            }
        }
        Ok(())
    }
}

/// Everything a pipeline run needs. `Default` reproduces the fixed paths of the
/// original batch script.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub input_path: PathBuf,
    pub cleaned_output_path: PathBuf,
    pub semantic_output_path: PathBuf,
    pub export_format: ExportFormat,
    pub options: AnalysisOptions,
    /// Number of sample relationships included in the run summary
    pub samples: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            cleaned_output_path: PathBuf::from(DEFAULT_CLEANED_OUTPUT_PATH),
            semantic_output_path: PathBuf::from(DEFAULT_SEMANTIC_OUTPUT_PATH),
            export_format: ExportFormat::Csv,
            options: AnalysisOptions::default(),
            samples: 10,
        }
    }
}
