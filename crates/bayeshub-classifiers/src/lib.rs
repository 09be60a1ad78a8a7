//! bayeshub Classifiers
//!
//! Registry of named, independently trainable text classifiers.
//!
//! - [`engine`] defines the capability interface every classification engine
//!   implements, plus the factory the registry builds engines with
//! - [`bayes`] is the default multinomial naive Bayes engine
//! - [`registry`] owns the name to handle mapping and its structural locking
//! - [`training`], [`prediction`] and [`snapshot`] drive a resolved handle

pub mod bayes;
pub mod engine;
pub mod handle;
pub mod prediction;
pub mod registry;
pub mod snapshot;
pub mod training;
pub mod validation;

pub use bayes::{BayesEngine, BayesEngineFactory};
pub use engine::{ClassificationEngine, EngineFactory};
pub use handle::{ClassifierHandle, ClassifierInfo};
pub use prediction::Prediction;
pub use registry::{ClassifierRegistry, ImportPolicy};
pub use snapshot::Snapshot;
pub use training::TrainOutcome;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::engine::{ClassificationEngine, EngineFactory};
    pub use crate::handle::{ClassifierHandle, ClassifierInfo};
    pub use crate::prediction::Prediction;
    pub use crate::registry::{ClassifierRegistry, ImportPolicy};
    pub use crate::snapshot::Snapshot;
}
