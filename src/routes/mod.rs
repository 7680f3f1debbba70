//! Route gateway: each sibling module exports a subrouter and this module
//! merges them over the shared [`AppState`].

use std::sync::Arc;

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::Serialize;
use tracing::warn;

use crate::errors::ObservatoryError;
use crate::store::{Dataset, Store};

mod analysis;
mod health;
mod overview;
mod parameters;
mod readings;
mod refresh;
mod sites;
mod water_sources;

// ---

pub type AppState = Arc<Store>;

pub fn router(store: AppState) -> Router {
    // ---
    Router::new()
        .merge(health::router())
        .merge(overview::router())
        .merge(water_sources::router())
        .merge(parameters::router())
        .merge(sites::router())
        .merge(analysis::router())
        .merge(readings::router())
        .merge(refresh::router())
        .with_state(store)
}

// ---

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Error half of every handler's result, rendered as `{ "error": ... }`.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    /// No dataset could be loaded; carries the localized message.
    Unavailable(String),
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}

impl From<ObservatoryError> for ApiError {
    fn from(e: ObservatoryError) -> Self {
        match e {
            ObservatoryError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            other => ApiError::Unavailable(other.to_string()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;

/// Numeric id from a path segment. Anything that is not a `u32` cannot
/// match a record, so it is reported as not found.
pub(crate) fn parse_id(kind: &'static str, raw: &str) -> Result<u32, ApiError> {
    raw.parse().map_err(|_| {
        warn!("{} not found: {:?} is not a valid id", kind, raw);
        ObservatoryError::not_found(kind, raw).into()
    })
}

/// Current dataset, or 503 when nothing has ever loaded.
///
/// After a failed refresh the previous dataset keeps being served.
pub(crate) async fn current_dataset(store: &Store) -> Result<Arc<Dataset>, ApiError> {
    // ---
    let snapshot = store.snapshot().await;
    match (snapshot.loaded_at, snapshot.error) {
        (None, Some(message)) => {
            warn!("Serving 503, no dataset loaded: {}", message);
            Err(ApiError::Unavailable(message))
        }
        _ => Ok(snapshot.data),
    }
}
