//! Per-operation request and error counters

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Operations exposed by the registry service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Delete,
    Info,
    Export,
    Import,
    Train,
    Predict,
    List,
}

impl Operation {
    pub const ALL: [Operation; 8] = [
        Operation::Create,
        Operation::Delete,
        Operation::Info,
        Operation::Export,
        Operation::Import,
        Operation::Train,
        Operation::Predict,
        Operation::List,
    ];

    /// Label value used for this operation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Delete => "delete",
            Self::Info => "info",
            Self::Export => "export",
            Self::Import => "import",
            Self::Train => "train",
            Self::Predict => "predict",
            Self::List => "list",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Metrics collector for registry operations.
///
/// Counts are kept in process for inspection and mirrored to the `metrics`
/// facade so an installed exporter can publish them.
#[derive(Clone)]
pub struct OperationMetrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    requests: [AtomicU64; 8],
    errors: [AtomicU64; 8],
}

impl OperationMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                requests: Default::default(),
                errors: Default::default(),
            }),
        }
    }

    /// Record a request
    pub fn record_request(&self, operation: Operation) {
        self.inner.requests[operation.index()].fetch_add(1, Ordering::Relaxed);
        ::metrics::counter!("bayeshub_requests_total", "operation" => operation.as_str())
            .increment(1);
    }

    /// Record a failed request
    pub fn record_error(&self, operation: Operation, kind: &'static str) {
        self.inner.errors[operation.index()].fetch_add(1, Ordering::Relaxed);
        ::metrics::counter!(
            "bayeshub_errors_total",
            "operation" => operation.as_str(),
            "kind" => kind
        )
        .increment(1);
    }

    /// Requests recorded for one operation
    pub fn requests(&self, operation: Operation) -> u64 {
        self.inner.requests[operation.index()].load(Ordering::Relaxed)
    }

    /// Errors recorded for one operation
    pub fn errors(&self, operation: Operation) -> u64 {
        self.inner.errors[operation.index()].load(Ordering::Relaxed)
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_requests: Operation::ALL.iter().map(|op| self.requests(*op)).sum(),
            total_errors: Operation::ALL.iter().map(|op| self.errors(*op)).sum(),
        }
    }
}

impl Default for OperationMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of current metrics
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub total_errors: u64,
}

impl MetricsSnapshot {
    /// Fraction of requests that failed
    pub fn error_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.total_errors as f64 / self.total_requests as f64
        }
    }
}
