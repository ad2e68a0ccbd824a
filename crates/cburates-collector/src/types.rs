//! Records, per-day outcomes, and run summaries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One flat rate observation as returned by the archive, keys in wire order.
pub type Record = serde_json::Map<String, Value>;

/// Outcome of fetching a single day.
#[derive(Debug, Clone, PartialEq)]
pub enum DayResult {
    /// The archive returned at least one record. Never holds an empty vec.
    Success(Vec<Record>),
    /// No rate was published for the day, or the payload was unusable.
    Empty,
    /// The request never produced a response (connect error, timeout, broken body).
    Failed,
}

/// Ordered column names, fixed from the first record a run writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema(Vec<String>);

impl Schema {
    #[must_use]
    pub fn from_record(record: &Record) -> Self {
        Self(record.keys().cloned().collect())
    }

    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.0
    }

    /// Renders `record` in schema order. Missing fields become blank cells and
    /// fields outside the schema are dropped.
    #[must_use]
    pub fn row(&self, record: &Record) -> Vec<String> {
        self.0
            .iter()
            .map(|field| render_cell(record.get(field)))
            .collect()
    }
}

impl From<Vec<String>> for Schema {
    fn from(fields: Vec<String>) -> Self {
        Self(fields)
    }
}

fn render_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Aggregate result of one collection run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub written_rows: u64,
    pub skipped_days: u64,
    pub failed_days: u64,
    pub output_file: String,
}
