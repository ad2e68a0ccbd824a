use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by the rate collector.
///
/// Per-day remote failures never surface here; they are folded into the
/// [`RunSummary`](crate::RunSummary) counters instead.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// The requested range ends before it starts.
    #[error(transparent)]
    InvalidRange(#[from] cburates_core::CoreError),

    /// The underlying `reqwest::Client` could not be constructed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV write error on {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
