//! The day-by-day collection loop.

use std::path::Path;

use cburates_core::DayRange;
use chrono::NaiveDate;

use crate::client::RateArchiveClient;
use crate::error::CollectorError;
use crate::types::{DayResult, RunSummary, Schema};
use crate::writer;

/// Fetches every day in `start..=end` and appends the records to `output`.
///
/// Days are requested one at a time in date order. Remote failures are
/// counted, not raised: HTTP error statuses and unusable payloads count as
/// skipped days, transport failures as failed days. The column schema is fixed
/// by the first record with at least one field; a day whose records are all
/// field-less before that point is skipped. A header is written only when
/// `output` was absent or empty when the run started.
///
/// Running the same range twice appends the same rows twice.
///
/// # Errors
///
/// - [`CollectorError::InvalidRange`] if `end < start`; no request is made.
/// - [`CollectorError::Io`] / [`CollectorError::Csv`] if the output cannot be
///   written. Rows appended for earlier days stay on disk.
pub async fn collect_rates(
    client: &RateArchiveClient,
    start: NaiveDate,
    end: NaiveDate,
    output: &Path,
) -> Result<RunSummary, CollectorError> {
    let range = DayRange::new(start, end)?;
    let mut header_written = writer::output_has_content(output)?;
    let mut schema: Option<Schema> = None;

    let mut written_rows: u64 = 0;
    let mut skipped_days: u64 = 0;
    let mut failed_days: u64 = 0;

    tracing::info!(
        %start,
        %end,
        days = range.len(),
        currency = client.currency(),
        output = %output.display(),
        "starting rate collection"
    );

    for day in range {
        match client.fetch_day(day).await {
            DayResult::Failed => failed_days += 1,
            DayResult::Empty => skipped_days += 1,
            DayResult::Success(records) => {
                // Columns come from the first record that has any; field-less
                // records cannot fix the schema.
                if schema.is_none() {
                    schema = records
                        .iter()
                        .find(|record| !record.is_empty())
                        .map(Schema::from_record);
                }
                let Some(schema) = schema.as_ref() else {
                    tracing::info!(%day, "no fields in any record; nothing to write");
                    skipped_days += 1;
                    continue;
                };

                header_written = writer::append_rows(output, &records, schema, header_written)?;

                let count = records.len() as u64;
                written_rows += count;
                tracing::info!(%day, rows = count, "saved rows");
            }
        }
    }

    tracing::info!(
        written_rows,
        skipped_days,
        failed_days,
        "rate collection complete"
    );

    Ok(RunSummary {
        start_date: start,
        end_date: end,
        written_rows,
        skipped_days,
        failed_days,
        output_file: output.display().to_string(),
    })
}
