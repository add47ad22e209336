use deal_score::config::{load_scoring_config, AppConfig};
use deal_score::error::AppError;
use deal_score::scoring::ScoringConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Scoring rubric for CLI commands: an explicit file wins over the environment.
pub(crate) fn resolve_scoring_config(path: Option<&Path>) -> Result<ScoringConfig, AppError> {
    match path {
        Some(path) => Ok(load_scoring_config(path)?),
        None => Ok(AppConfig::load()?.scoring),
    }
}
