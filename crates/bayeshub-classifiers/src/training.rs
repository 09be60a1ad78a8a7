//! Training pipeline

use crate::handle::ClassifierHandle;
use crate::validation::ensure_classes_known;
use bayeshub_core::{tokenize, Result};
use tracing::debug;

/// Summary of one training request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainOutcome {
    /// Number of `learn` calls issued to the engine
    pub observations: usize,
}

/// Train a classifier with every phrase under every requested class.
///
/// This is a cross-product, not a pairing: `k` phrases and `m` classes issue
/// exactly `k * m` learn observations, each phrase being recorded once per
/// class. Callers that want one label per phrase send one request per label.
///
/// All requested classes are validated before the engine is touched, so an
/// unknown class leaves the classifier unchanged.
pub fn train(
    handle: &ClassifierHandle,
    classes: &[String],
    phrases: &[String],
) -> Result<TrainOutcome> {
    ensure_classes_known(handle, classes)?;

    let tokenized: Vec<Vec<String>> = phrases.iter().map(|p| tokenize(p)).collect();

    let observations = handle.write_engine(|engine| -> Result<usize> {
        let mut observations = 0;
        for tokens in &tokenized {
            for class in classes {
                engine.learn(tokens, class)?;
                observations += 1;
            }
        }
        Ok(observations)
    })?;

    debug!(
        "Trained '{}' with {} phrases x {} classes",
        handle.name(),
        phrases.len(),
        classes.len()
    );

    Ok(TrainOutcome { observations })
}
