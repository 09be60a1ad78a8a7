//! Shared application state

use bayeshub_classifiers::ClassifierRegistry;
use bayeshub_core::Result;
use bayeshub_telemetry::{DiagnosticLog, Operation, OperationMetrics};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tracing::warn;

use crate::config::ServerConfig;
use crate::error::AppError;

/// State handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ClassifierRegistry>,
    pub diagnostics: Arc<DiagnosticLog>,
    pub metrics: OperationMetrics,
    pub metrics_handle: Option<PrometheusHandle>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Build state with an empty Bayes registry
    pub fn new(config: ServerConfig, metrics_handle: Option<PrometheusHandle>) -> Self {
        let registry = ClassifierRegistry::default().with_import_policy(config.import_policy());
        Self::with_registry(config, Arc::new(registry), metrics_handle)
    }

    /// Build state around an existing registry
    pub fn with_registry(
        config: ServerConfig,
        registry: Arc<ClassifierRegistry>,
        metrics_handle: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            registry,
            diagnostics: Arc::new(DiagnosticLog::new(config.diagnostic_log_capacity)),
            metrics: OperationMetrics::new(),
            metrics_handle,
            config: Arc::new(config),
        }
    }

    /// Run one registry operation, counting it and recording failures
    pub fn observe<T>(
        &self,
        operation: Operation,
        name: &str,
        f: impl FnOnce() -> Result<T>,
    ) -> std::result::Result<T, AppError> {
        self.metrics.record_request(operation);

        f().map_err(|e| {
            let err = AppError::from(e);
            self.metrics.record_error(operation, err.kind());
            warn!("{} '{}' failed: {}", operation.as_str(), name, err);
            self.diagnostics.warn(format!("{} {}: {}", operation.as_str(), name, err));
            err
        })
    }
}
