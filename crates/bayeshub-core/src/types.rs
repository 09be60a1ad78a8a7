//! Core types for bayeshub

use serde::{Deserialize, Serialize};

/// Raw output of one engine scoring call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    /// Per-class probabilities, aligned with the engine's class order
    pub scores: Vec<f64>,

    /// Index of the highest score
    pub best_index: usize,

    /// Whether the engine judges the top score an unambiguous winner
    pub strict: bool,
}

impl Scores {
    /// Create a new score set
    pub fn new(scores: Vec<f64>, best_index: usize, strict: bool) -> Self {
        Self {
            scores,
            best_index,
            strict,
        }
    }

    /// Score of the winning class
    pub fn best_score(&self) -> Option<f64> {
        self.scores.get(self.best_index).copied()
    }
}

/// Split a phrase into whitespace-delimited tokens
pub fn tokenize(phrase: &str) -> Vec<String> {
    phrase.split_whitespace().map(str::to_string).collect()
}

/// Scale a probability to a two-decimal percentage, truncating rather than rounding
pub fn to_percentage(score: f64) -> f64 {
    (score * 10000.0).floor() / 100.0
}
