//! Dashboard index and about pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

/// Template for the dashboard index.
///
/// Renders `templates/dashboard.html`: a card per chart page.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub version: &'static str,
}

/// `GET /dashboard`
pub async fn dashboard_handler() -> impl IntoResponse {
    DashboardTemplate {
        version: env!("CARGO_PKG_VERSION"),
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub version: &'static str,
}

/// `GET /dashboard/about`
pub async fn about_handler() -> impl IntoResponse {
    AboutTemplate {
        version: env!("CARGO_PKG_VERSION"),
    }
}
