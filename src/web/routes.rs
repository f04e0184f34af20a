//! Web dashboard route configuration.

use crate::state::AppState;
use crate::web::handlers::{
    about_handler, dashboard_handler, unemployment_by_age_handler, unemployment_handler,
    workforce_handler,
};
use axum::{Router, routing::get};

/// Dashboard pages, nested under `/dashboard`.
///
/// # Endpoints
///
/// - `GET /`                     - Index with links to every page
/// - `GET /workforce`            - Participation and gender share charts
/// - `GET /unemployment`         - Unemployment rate with region, age and date controls
/// - `GET /unemployment-by-age`  - Unemployment rate per age group
/// - `GET /about`                - Data source notes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard_handler))
        .route("/workforce", get(workforce_handler))
        .route("/unemployment", get(unemployment_handler))
        .route("/unemployment-by-age", get(unemployment_by_age_handler))
        .route("/about", get(about_handler))
}
