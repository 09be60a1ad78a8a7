//! bayeshub Telemetry
//!
//! Operational visibility for the classifier service.
//!
//! Provides:
//! - A fixed-capacity diagnostic log that keeps the most recent events
//! - Per-operation request and error counters

pub mod metrics;
pub mod ring_log;

pub use metrics::{MetricsSnapshot, Operation, OperationMetrics};
pub use ring_log::{DiagnosticLog, Severity};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::metrics::{Operation, OperationMetrics};
    pub use crate::ring_log::{DiagnosticLog, Severity};
}
