//! Error type shared by every stage of the pipeline.
//!
//! Only unrecoverable problems are errors: unreadable input, a table without the
//! required columns, invalid options, failed writes. Malformed corpus rows are not
//! errors; the row filter drops them and counts them in the cleaning statistics.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("input table {path} has no `{column}` column")]
    MissingColumn { column: &'static str, path: String },

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("malformed ranked list: {0}")]
    MalformedList(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
