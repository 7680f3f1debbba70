//! Data explorer: the full reading list with simple equality filters.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{debug, info};

use super::{current_dataset, ApiResult, AppState};
use crate::models::Reading;

// ---

const DEFAULT_LIMIT: u32 = 1000;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/readings", get(handler))
}

async fn handler(
    params: Result<Query<ReadingsQuery>, QueryRejection>,
    State(store): State<AppState>,
) -> ApiResult<Vec<Reading>> {
    // ---
    let Query(params) = params?;
    let data = current_dataset(&store).await?;
    let filtered = apply_filters(&data.readings, &params);
    info!(
        "GET /api/readings returning {} of {} readings",
        filtered.len(),
        data.readings.len()
    );
    Ok(Json(filtered))
}

/// Query parameters for filtering readings.
#[derive(Debug, Default, Deserialize)]
pub struct ReadingsQuery {
    parameter: Option<String>,
    site: Option<u32>,
    source: Option<u32>,
    limit: Option<u32>,
}

fn apply_filters(readings: &[Reading], params: &ReadingsQuery) -> Vec<Reading> {
    // ---
    debug!("Apply filter: {:?}", params);
    readings
        .iter()
        .filter(|r| {
            params
                .parameter
                .as_ref()
                .map_or(true, |id| &r.parameter_id == id)
        })
        .filter(|r| params.site.map_or(true, |id| r.site_id == id))
        .filter(|r| params.source.map_or(true, |id| r.water_source_id == id))
        .take(params.limit.unwrap_or(DEFAULT_LIMIT) as usize)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::aggregate::fixtures::reading;

    fn readings() -> Vec<Reading> {
        vec![
            reading("ph", 1, "2024-01-10", 7.0),
            reading("ph", 3, "2024-01-10", 6.9),
            reading("turbidity", 1, "2024-01-10", 1.2),
            reading("turbidity", 2, "2024-02-10", 2.5),
        ]
    }

    #[test]
    fn test_no_filters_returns_everything() {
        assert_eq!(apply_filters(&readings(), &ReadingsQuery::default()).len(), 4);
    }

    #[test]
    fn test_filters_combine() {
        // ---
        let params = ReadingsQuery {
            parameter: Some("turbidity".to_string()),
            source: Some(1),
            ..Default::default()
        };
        let ids: Vec<String> = apply_filters(&readings(), &params)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["1-turbidity-2024-01-10", "2-turbidity-2024-02-10"]);

        let by_site = ReadingsQuery {
            site: Some(3),
            ..Default::default()
        };
        assert_eq!(apply_filters(&readings(), &by_site).len(), 1);
    }

    #[test]
    fn test_limit_truncates_in_order() {
        let params = ReadingsQuery {
            limit: Some(2),
            ..Default::default()
        };
        let filtered = apply_filters(&readings(), &params);
        assert_eq!(filtered, readings()[..2].to_vec());
    }
}
