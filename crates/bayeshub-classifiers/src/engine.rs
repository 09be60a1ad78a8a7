//! Classification engine capability and factory traits

use bayeshub_core::{Result, Scores};
use std::collections::HashMap;

/// Capability interface of a per-instance classification model.
///
/// The registry only ever talks to engines through this trait. Engines are
/// not assumed to be internally synchronized: callers serialize `learn`
/// against every other call on the same instance.
pub trait ClassificationEngine: Send + Sync {
    /// Ordered label set the engine was built over
    fn classes(&self) -> Vec<String>;

    /// Record one observation of `tokens` under `class`
    fn learn(&mut self, tokens: &[String], class: &str) -> Result<()>;

    /// Score a token sequence against every class
    fn safe_prob_scores(&self, tokens: &[String]) -> Result<Scores>;

    /// Number of `learn` observations recorded so far
    fn learned(&self) -> u64;

    /// Per-class word counts, aligned with `classes()`
    fn word_count(&self) -> Vec<u64>;

    /// Per-word weights learned for one class
    fn words_by_class(&self, class: &str) -> Result<HashMap<String, f64>>;

    /// Serialize the full engine state
    fn serialize(&self) -> Result<Vec<u8>>;
}

/// Builds engine instances for the registry.
///
/// Implement this to swap the classification algorithm without touching the
/// registry, handles, or pipelines.
pub trait EngineFactory: Send + Sync {
    /// Create an empty engine over the given labels
    fn create(&self, classes: &[String]) -> Result<Box<dyn ClassificationEngine>>;

    /// Rebuild an engine from bytes produced by `ClassificationEngine::serialize`
    fn restore(&self, bytes: &[u8]) -> Result<Box<dyn ClassificationEngine>>;
}
