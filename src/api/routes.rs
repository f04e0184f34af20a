//! API route configuration.

use crate::api::handlers::{
    age_brackets_handler, age_groups_handler, chart_handler, quarters_handler, regions_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// JSON API routes, nested under `/api`.
///
/// # Endpoints
///
/// - `GET /quarters`        - Sorted quarter list for the date slider
/// - `GET /regions`         - Region options
/// - `GET /age-brackets`    - Age bracket labels
/// - `GET /age-groups`      - Age groups of the by-age chart
/// - `GET /charts/{chart}`  - Chart payload
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/quarters", get(quarters_handler))
        .route("/regions", get(regions_handler))
        .route("/age-brackets", get(age_brackets_handler))
        .route("/age-groups", get(age_groups_handler))
        .route("/charts/{chart}", get(chart_handler))
}
