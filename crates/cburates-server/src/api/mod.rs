mod fetch;

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use cburates_collector::{CollectorError, RateArchiveClient};
use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub client: RateArchiveClient,
    pub output_path: Arc<PathBuf>,
    pub default_start: NaiveDate,
    pub default_end: NaiveDate,
    /// Held for the whole of a run so two triggers never append to the file at once.
    pub run_lock: Arc<Mutex<()>>,
}

impl AppState {
    #[must_use]
    pub fn new(
        client: RateArchiveClient,
        output_path: PathBuf,
        default_start: NaiveDate,
        default_end: NaiveDate,
    ) -> Self {
        Self {
            client,
            output_path: Arc::new(output_path),
            default_start,
            default_end,
            run_lock: Arc::new(Mutex::new(())),
        }
    }

    /// # Errors
    ///
    /// Returns [`CollectorError`] if the archive client cannot be built.
    pub fn from_config(config: &cburates_core::AppConfig) -> Result<Self, CollectorError> {
        Ok(Self::new(
            RateArchiveClient::from_config(config)?,
            config.output_path.clone(),
            config.default_start_date,
            config.default_end_date,
        ))
    }
}

/// Error body returned as `{"detail": "..."}`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub code: &'static str,
    pub detail: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct StatusMessage {
    message: String,
}

impl ApiError {
    pub fn new(code: &'static str, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.code {
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_collector_error(request_id: &str, error: &CollectorError) -> ApiError {
    match error {
        CollectorError::InvalidRange(e) => ApiError::new("bad_request", e.to_string()),
        other => {
            tracing::error!(request_id, error = %other, "rate collection failed");
            ApiError::new("internal_error", "failed to write output file")
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/fetch", get(fetch::fetch_rates))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn root(State(state): State<AppState>) -> impl IntoResponse {
    Json(StatusMessage {
        message: format!("{} to UZS fetcher is running", state.client.currency()),
    })
}
