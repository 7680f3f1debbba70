use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{ApiError, ApiResult, AppState};
use crate::store::DataKind;

// ---

pub fn router() -> Router<AppState> {
    Router::new().route("/api/refresh", post(handler))
}

#[derive(Debug, Deserialize)]
pub struct RefreshQuery {
    #[serde(default)]
    kind: DataKind,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    refreshed: DataKind,
    readings: usize,
}

/// Handle `POST /api/refresh?kind=`. On failure the previous dataset stays
/// in place and the store's localized message is returned with a 503.
async fn handler(
    query: Result<Query<RefreshQuery>, QueryRejection>,
    State(store): State<AppState>,
) -> ApiResult<RefreshResponse> {
    // ---
    let Query(query) = query?;
    info!("POST /api/refresh kind={}", query.kind);
    if store.refresh(query.kind).await.is_err() {
        let message = store
            .snapshot()
            .await
            .error
            .unwrap_or_else(|| format!("Error al actualizar {}", query.kind));
        return Err(ApiError::Unavailable(message));
    }
    let snapshot = store.snapshot().await;
    Ok(Json(RefreshResponse {
        refreshed: query.kind,
        readings: snapshot.data.readings.len(),
    }))
}
