//! Unemployment page handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::domain::chart::ChartVariant;

/// Template shared by both unemployment pages.
///
/// Renders `templates/unemployment.html`. Region, age and date controls are
/// filled from the lookup endpoints; `by_age` swaps the age range selector
/// for the gender selector.
#[derive(Template, WebTemplate)]
#[template(path = "unemployment.html")]
pub struct UnemploymentTemplate {
    pub version: &'static str,
    pub heading: &'static str,
    pub chart: &'static str,
    pub by_age: bool,
}

/// `GET /dashboard/unemployment`
pub async fn unemployment_handler() -> impl IntoResponse {
    UnemploymentTemplate {
        version: env!("CARGO_PKG_VERSION"),
        heading: "Unemployment Rate",
        chart: ChartVariant::Unemployment.slug(),
        by_age: false,
    }
}

/// `GET /dashboard/unemployment-by-age`
pub async fn unemployment_by_age_handler() -> impl IntoResponse {
    UnemploymentTemplate {
        version: env!("CARGO_PKG_VERSION"),
        heading: "Unemployment Rate By Age",
        chart: ChartVariant::UnemploymentByAge.slug(),
        by_age: true,
    }
}
