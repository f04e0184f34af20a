//! Workforce participation page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::domain::chart::ChartVariant;

/// Template for the workforce page.
///
/// Renders `templates/workforce.html` with one chart container per variant;
/// the page script fetches each payload from `/api/charts/{slug}`.
#[derive(Template, WebTemplate)]
#[template(path = "workforce.html")]
pub struct WorkforceTemplate {
    pub version: &'static str,
    pub charts: Vec<&'static str>,
}

/// `GET /dashboard/workforce`
pub async fn workforce_handler() -> impl IntoResponse {
    WorkforceTemplate {
        version: env!("CARGO_PKG_VERSION"),
        charts: [
            ChartVariant::Participation,
            ChartVariant::GenderShare,
            ChartVariant::ParticipationByRegion,
            ChartVariant::RegionAverage,
        ]
        .iter()
        .map(ChartVariant::slug)
        .collect(),
    }
}
