use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::{current_dataset, ApiError, ApiResult, AppState};
use crate::views::{source_analysis, SourceAnalysis};

// ---

pub fn router() -> Router<AppState> {
    Router::new().route("/api/analysis", get(handler))
}

/// Both ids default to the two catalog sources.
#[derive(Debug, Deserialize)]
pub struct AnalysisQuery {
    a: Option<u32>,
    b: Option<u32>,
}

async fn handler(
    query: Result<Query<AnalysisQuery>, QueryRejection>,
    State(store): State<AppState>,
) -> ApiResult<SourceAnalysis> {
    // ---
    let Query(query) = query?;
    let (a, b) = (query.a.unwrap_or(1), query.b.unwrap_or(2));
    if a == b {
        return Err(ApiError::BadRequest(format!(
            "Seleccione dos fuentes distintas (a = b = {a})"
        )));
    }
    let data = current_dataset(&store).await?;
    Ok(Json(source_analysis(&data, a, b)?))
}
