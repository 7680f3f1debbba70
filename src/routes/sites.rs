use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use super::{current_dataset, parse_id, ApiResult, AppState};
use crate::views::{site_detail, SiteDetail};

// ---

pub fn router() -> Router<AppState> {
    Router::new().route("/api/sites/{id}", get(handler))
}

async fn handler(Path(id): Path<String>, State(store): State<AppState>) -> ApiResult<SiteDetail> {
    let id = parse_id("monitoring site", &id)?;
    let data = current_dataset(&store).await?;
    Ok(Json(site_detail(&data, id)?))
}
