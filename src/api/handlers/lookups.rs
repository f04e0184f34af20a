//! Handlers for the dashboard's lookup lists.

use axum::{Json, extract::State};

use crate::api::dto::lookups::{AgeBracketItem, QuarterItem, RegionItem};
use crate::domain::entities::AgeGroup;
use crate::domain::entities::age::{MAX_BRACKET, MIN_BRACKET};
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/quarters` - sorted quarters with slider marks.
pub async fn quarters_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<QuarterItem>>, AppError> {
    let quarters = state.chart_service.quarters().await?;
    Ok(Json(QuarterItem::from_periods(&quarters)))
}

/// `GET /api/regions` - region options in source order.
pub async fn regions_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<RegionItem>>, AppError> {
    let regions = state.chart_service.regions().await?;
    Ok(Json(regions.into_iter().map(RegionItem::from).collect()))
}

/// `GET /api/age-brackets` - labels for brackets 1 to 12.
pub async fn age_brackets_handler() -> Json<Vec<AgeBracketItem>> {
    Json((MIN_BRACKET..=MAX_BRACKET).map(AgeBracketItem::new).collect())
}

/// `GET /api/age-groups` - groups plotted by the by-age chart.
pub async fn age_groups_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<AgeGroup>>, AppError> {
    Ok(Json(state.chart_service.age_groups().await?))
}
