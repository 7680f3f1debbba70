use axum::{extract::State, routing::get, Json, Router};
use tracing::debug;

use super::{current_dataset, ApiResult, AppState};
use crate::views::{home_overview, HomeOverview};

// ---

pub fn router() -> Router<AppState> {
    Router::new().route("/api/overview", get(handler))
}

async fn handler(State(store): State<AppState>) -> ApiResult<HomeOverview> {
    // ---
    let data = current_dataset(&store).await?;
    let overview = home_overview(&data);
    for widget in &overview.widgets {
        debug!("{}", widget.summary());
    }
    Ok(Json(overview))
}
