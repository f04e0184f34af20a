//! Handler for chart payloads.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};

use crate::api::dto::charts::ChartQuery;
use crate::domain::chart::{ChartPayload, ChartVariant};
use crate::error::AppError;
use crate::state::AppState;

/// Builds the Plotly payload of one chart.
///
/// # Endpoint
///
/// `GET /api/charts/{chart}` where `chart` is one of `unemployment`,
/// `unemployment-by-age`, `participation`, `gender-share`,
/// `participation-by-region`, `region-average`.
///
/// # Query Parameters
///
/// See [`ChartQuery`].
///
/// # Errors
///
/// - 400 for invalid filter parameters
/// - 404 for an unknown chart
/// - 503 when the record source cannot be read
pub async fn chart_handler(
    State(state): State<AppState>,
    Path(chart): Path<String>,
    query: Result<Query<ChartQuery>, QueryRejection>,
) -> Result<Json<ChartPayload>, AppError> {
    let variant: ChartVariant = chart.parse()?;
    let Query(params) = query?;
    let filter = params.to_filter()?;

    let payload = state
        .chart_service
        .chart(variant, &filter, params.gender)
        .await?;

    Ok(Json(payload))
}
