//! HTML template rendering handlers for the web dashboard.

mod dashboard;
mod unemployment;
mod workforce;

pub use dashboard::{about_handler, dashboard_handler};
pub use unemployment::{unemployment_by_age_handler, unemployment_handler};
pub use workforce::workforce_handler;
