//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::ChartService;
use crate::domain::repositories::SurveyRepository;

/// Cheap to clone; every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub chart_service: Arc<ChartService<dyn SurveyRepository>>,
    /// Name of the configured record source, reported by `/health`.
    pub source: &'static str,
}

impl AppState {
    pub fn new(repository: Arc<dyn SurveyRepository>, source: &'static str) -> Self {
        Self {
            chart_service: Arc::new(ChartService::new(repository)),
            source,
        }
    }
}
