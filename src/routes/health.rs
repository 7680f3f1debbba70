//! Liveness endpoint plus the store's load state.

use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    loaded_at: Option<DateTime<Utc>>,
}

/// Handle `GET /health`.
///
/// Always 200 while the process serves requests; a failed load shows up in
/// `error` rather than in the status code.
async fn health(State(store): State<AppState>) -> Json<HealthResponse> {
    let snapshot = store.snapshot().await;
    Json(HealthResponse {
        status: "ok",
        loading: snapshot.loading,
        error: snapshot.error,
        loaded_at: snapshot.loaded_at,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
