//! HTTP client for the CBU daily rate archive.
//!
//! The archive serves one JSON document per currency per day at
//! `{base}/{currency}/{year}-{month}-{day}/`. Days without a published rate
//! (weekends, holidays, future dates) come back as HTTP error statuses rather
//! than an empty document, so any 4xx/5xx is read as "no data".

use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use reqwest::{Client, Url};
use serde_json::Value;

use crate::error::CollectorError;
use crate::types::{DayResult, Record};

/// Client for the CBU rate archive.
///
/// Use [`RateArchiveClient::from_config`] for the configured archive or
/// [`RateArchiveClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct RateArchiveClient {
    client: Client,
    base_url: Url,
    currency: String,
}

impl RateArchiveClient {
    /// Creates a client from loaded application configuration.
    ///
    /// # Errors
    ///
    /// See [`RateArchiveClient::with_base_url`].
    pub fn from_config(config: &cburates_core::AppConfig) -> Result<Self, CollectorError> {
        Self::with_base_url(
            &config.base_url,
            &config.currency,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`CollectorError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`CollectorError::InvalidBaseUrl`] if
    /// `base_url` is not an absolute http(s) URL.
    pub fn with_base_url(
        base_url: &str,
        currency: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, CollectorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;

        let invalid = |reason: String| CollectorError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason,
        };

        // Exactly one trailing slash so the day segments land under the base path.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
        }

        Ok(Self {
            client,
            base_url: parsed,
            currency: currency.to_uppercase(),
        })
    }

    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Builds the archive URL for `day`, e.g. `.../json/USD/2025-1-2/`.
    #[must_use]
    pub fn day_url(&self, day: NaiveDate) -> Url {
        let mut url = self.base_url.clone();
        // http(s) URLs always have a path, checked in `with_base_url`.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(&self.currency)
                .push(&path_fragment(day))
                .push("");
        }
        url
    }

    /// Fetches and classifies one day. Never retries.
    pub async fn fetch_day(&self, day: NaiveDate) -> DayResult {
        let url = self.day_url(day);

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(%day, error = %e, "request failed");
                return DayResult::Failed;
            }
        };

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            tracing::info!(%day, status = status.as_u16(), "no data (HTTP error)");
            return DayResult::Empty;
        }

        match response.bytes().await {
            Ok(body) => classify_body(day, &body),
            Err(e) => {
                tracing::warn!(%day, error = %e, "failed to read response body");
                DayResult::Failed
            }
        }
    }
}

/// Formats `day` the way the archive expects: `year-month-day`, no zero padding.
#[must_use]
pub fn path_fragment(day: NaiveDate) -> String {
    format!("{}-{}-{}", day.year(), day.month(), day.day())
}

/// Classifies a 2xx response body.
pub(crate) fn classify_body(day: NaiveDate, body: &[u8]) -> DayResult {
    if body.iter().all(u8::is_ascii_whitespace) {
        return no_data(day);
    }

    let payload: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(%day, error = %e, "response body is not JSON");
            return DayResult::Empty;
        }
    };

    match payload {
        Value::Null => no_data(day),
        Value::Object(record) if record.is_empty() => no_data(day),
        Value::Object(record) => DayResult::Success(vec![record]),
        Value::Array(items) if items.is_empty() => no_data(day),
        Value::Array(items) => {
            let records: Option<Vec<Record>> = items
                .into_iter()
                .map(|item| match item {
                    Value::Object(record) => Some(record),
                    _ => None,
                })
                .collect();
            records.map_or_else(
                || {
                    tracing::warn!(%day, "unexpected payload shape: array with non-object items");
                    DayResult::Empty
                },
                DayResult::Success,
            )
        }
        other => {
            tracing::warn!(%day, kind = json_kind(&other), "unexpected payload shape");
            DayResult::Empty
        }
    }
}

fn no_data(day: NaiveDate) -> DayResult {
    tracing::info!(%day, "no data");
    DayResult::Empty
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
