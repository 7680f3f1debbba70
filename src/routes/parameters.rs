use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use super::{current_dataset, ApiResult, AppState};
use crate::models::Parameter;
use crate::views::{parameter_detail, ParameterDetail};

// ---

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/parameters", get(list))
        .route("/api/parameters/{id}", get(detail))
}

async fn list(State(store): State<AppState>) -> ApiResult<Vec<Parameter>> {
    let data = current_dataset(&store).await?;
    Ok(Json(data.parameters.clone()))
}

async fn detail(
    Path(id): Path<String>,
    State(store): State<AppState>,
) -> ApiResult<ParameterDetail> {
    let data = current_dataset(&store).await?;
    Ok(Json(parameter_detail(&data, &id)?))
}
