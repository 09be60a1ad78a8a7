//! Prediction pipeline

use crate::handle::ClassifierHandle;
use bayeshub_core::{to_percentage, tokenize, Error, Result};
use serde::{Deserialize, Serialize};

/// Result of scoring one phrase against a classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Label at `winning_index`
    pub winning_class: String,

    /// Index of the top score in the classifier's class order
    pub winning_index: usize,

    /// Raw engine scores, aligned with the classifier's classes
    pub scores: Vec<f64>,

    /// Scores as two-decimal percentages, truncated
    pub percentages: Vec<f64>,

    /// Whether the engine judged the winner unambiguous
    pub strict: bool,
}

impl Prediction {
    /// Percentage of the winning class
    pub fn winning_percentage(&self) -> f64 {
        self.percentages
            .get(self.winning_index)
            .copied()
            .unwrap_or_default()
    }
}

/// Score `phrase` and map the engine's answer back onto label names
pub fn predict(handle: &ClassifierHandle, phrase: &str) -> Result<Prediction> {
    let tokens = tokenize(phrase);
    let result = handle.read_engine(|engine| engine.safe_prob_scores(&tokens))?;

    let classes = handle.classes();
    if result.scores.len() != classes.len() {
        return Err(Error::engine(format!(
            "engine returned {} scores for {} classes",
            result.scores.len(),
            classes.len()
        )));
    }
    let winning_class = classes
        .get(result.best_index)
        .cloned()
        .ok_or_else(|| Error::engine(format!("winning index {} out of range", result.best_index)))?;

    let percentages = result.scores.iter().copied().map(to_percentage).collect();

    Ok(Prediction {
        winning_class,
        winning_index: result.best_index,
        scores: result.scores,
        percentages,
        strict: result.strict,
    })
}
