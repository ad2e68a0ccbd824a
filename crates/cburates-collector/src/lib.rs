//! Day-by-day collector for the Central Bank of Uzbekistan rate archive.
//!
//! Walks an inclusive date range, fetches each day's records from the archive,
//! and appends them to a CSV file whose columns are fixed by the first record
//! seen. Days are fetched strictly one at a time and in order.

pub mod client;
pub mod error;
pub mod pipeline;
pub mod types;
pub mod writer;

pub use client::{path_fragment, RateArchiveClient};
pub use error::CollectorError;
pub use pipeline::collect_rates;
pub use types::{DayResult, Record, RunSummary, Schema};
pub use writer::{append_rows, output_has_content};
