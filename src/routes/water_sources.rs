use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use super::{current_dataset, parse_id, ApiResult, AppState};
use crate::models::WaterSource;
use crate::views::{water_source_detail, WaterSourceDetail};

// ---

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/water-sources", get(list))
        .route("/api/water-sources/{id}", get(detail))
}

#[derive(Debug, Deserialize)]
pub struct DetailQuery {
    /// Parameter id to chart, e.g. `ph`.
    parameter: Option<String>,
}

async fn list(State(store): State<AppState>) -> ApiResult<Vec<WaterSource>> {
    let data = current_dataset(&store).await?;
    Ok(Json(data.water_sources.clone()))
}

async fn detail(
    Path(id): Path<String>,
    query: Result<Query<DetailQuery>, QueryRejection>,
    State(store): State<AppState>,
) -> ApiResult<WaterSourceDetail> {
    // ---
    let id = parse_id("water source", &id)?;
    let Query(query) = query?;
    info!("GET /api/water-sources/{} {:?}", id, query);
    let data = current_dataset(&store).await?;
    Ok(Json(water_source_detail(&data, id, query.parameter.as_deref())?))
}
