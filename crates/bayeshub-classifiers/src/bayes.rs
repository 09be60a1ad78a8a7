//! Multinomial naive Bayes engine
//!
//! Default [`ClassificationEngine`] used by the server. Each class keeps a
//! token frequency table; a query is scored as the class prior times the
//! product of per-token probabilities, computed in log space and normalized
//! so the scores sum to one.

use crate::engine::{ClassificationEngine, EngineFactory};
use crate::validation::ensure_class_set;
use bayeshub_core::{Error, Result, Scores};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

/// Probability assigned to a token a class has never seen
pub const DEFAULT_PROB: f64 = 1e-11;

const FORMAT: &str = "bayeshub-bayes";
const VERSION: u32 = 1;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ClassData {
    freqs: BTreeMap<String, u64>,
    total: u64,
}

impl ClassData {
    fn word_prob(&self, word: &str) -> f64 {
        match self.freqs.get(word) {
            Some(&freq) if self.total > 0 => freq as f64 / self.total as f64,
            _ => DEFAULT_PROB,
        }
    }
}

/// Serialized engine document
#[derive(Debug, Serialize, Deserialize)]
struct BayesState {
    format: String,
    version: u32,
    classes: Vec<String>,
    learned: u64,
    data: BTreeMap<String, ClassData>,
}

/// Naive Bayes classifier over a fixed label set
#[derive(Debug)]
pub struct BayesEngine {
    classes: Vec<String>,
    data: Vec<ClassData>,
    learned: u64,
    seen: AtomicU64,
}

impl BayesEngine {
    /// Create an empty engine. Labels must be unique and at least two.
    pub fn new(classes: &[String]) -> Result<Self> {
        ensure_class_set(classes)?;
        Ok(Self {
            classes: classes.to_vec(),
            data: vec![ClassData::default(); classes.len()],
            learned: 0,
            seen: AtomicU64::new(0),
        })
    }

    /// Restore an engine from its serialized JSON document
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let state: BayesState = serde_json::from_slice(bytes)
            .map_err(|e| Error::engine(format!("failed to decode engine state: {}", e)))?;

        if state.format != FORMAT || state.version != VERSION {
            return Err(Error::engine(format!(
                "unsupported engine state {} v{}",
                state.format, state.version
            )));
        }
        ensure_class_set(&state.classes).map_err(|e| Error::engine(e.to_string()))?;

        let mut data = state.data;
        if data.len() != state.classes.len() {
            return Err(Error::engine("engine state does not match its class set"));
        }
        let mut ordered = Vec::with_capacity(state.classes.len());
        for class in &state.classes {
            let class_data = data.remove(class).ok_or_else(|| {
                Error::engine(format!("engine state is missing class '{}'", class))
            })?;
            ordered.push(class_data);
        }

        Ok(Self {
            classes: state.classes,
            data: ordered,
            learned: state.learned,
            seen: AtomicU64::new(0),
        })
    }

    /// Number of scoring calls answered by this instance. Not part of the
    /// serialized state, so a restored engine starts at zero.
    pub fn seen(&self) -> u64 {
        self.seen.load(Ordering::Relaxed)
    }

    fn index_of(&self, class: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == class)
    }

    fn priors(&self) -> Vec<f64> {
        let sum: u64 = self.data.iter().map(|d| d.total).sum();
        if sum == 0 {
            return vec![0.0; self.data.len()];
        }
        self.data
            .iter()
            .map(|d| d.total as f64 / sum as f64)
            .collect()
    }
}

impl ClassificationEngine for BayesEngine {
    fn classes(&self) -> Vec<String> {
        self.classes.clone()
    }

    fn learn(&mut self, tokens: &[String], class: &str) -> Result<()> {
        let index = self
            .index_of(class)
            .ok_or_else(|| Error::engine(format!("unknown class '{}'", class)))?;

        let data = &mut self.data[index];
        for token in tokens {
            *data.freqs.entry(token.clone()).or_insert(0) += 1;
            data.total += 1;
        }
        self.learned += 1;
        Ok(())
    }

    fn safe_prob_scores(&self, tokens: &[String]) -> Result<Scores> {
        let log_scores: Vec<f64> = self
            .priors()
            .into_iter()
            .zip(&self.data)
            .map(|(prior, data)| {
                tokens
                    .iter()
                    .fold(prior.ln(), |acc, token| acc + data.word_prob(token).ln())
            })
            .collect();

        let max = log_scores
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        if !max.is_finite() {
            return Err(Error::engine("classifier has no training observations"));
        }

        let mut scores: Vec<f64> = log_scores.iter().map(|s| (s - max).exp()).collect();
        let sum: f64 = scores.iter().sum();
        for score in &mut scores {
            *score /= sum;
        }

        let (best_index, unique) = find_max(&scores);

        // A query made only of unseen tokens is decided by the priors alone.
        let informed = tokens
            .iter()
            .any(|token| self.data.iter().any(|d| d.freqs.contains_key(token)));

        self.seen.fetch_add(1, Ordering::Relaxed);
        Ok(Scores::new(scores, best_index, unique && informed))
    }

    fn learned(&self) -> u64 {
        self.learned
    }

    fn word_count(&self) -> Vec<u64> {
        self.data.iter().map(|d| d.total).collect()
    }

    fn words_by_class(&self, class: &str) -> Result<HashMap<String, f64>> {
        let index = self
            .index_of(class)
            .ok_or_else(|| Error::engine(format!("unknown class '{}'", class)))?;
        let data = &self.data[index];

        Ok(data
            .freqs
            .iter()
            .map(|(word, &freq)| (word.clone(), freq as f64 / data.total as f64))
            .collect())
    }

    fn serialize(&self) -> Result<Vec<u8>> {
        let state = BayesState {
            format: FORMAT.to_string(),
            version: VERSION,
            classes: self.classes.clone(),
            learned: self.learned,
            data: self
                .classes
                .iter()
                .cloned()
                .zip(self.data.iter().cloned())
                .collect(),
        };
        Ok(serde_json::to_vec(&state)?)
    }
}

/// Index of the first maximum, and whether no other entry ties it
fn find_max(scores: &[f64]) -> (usize, bool) {
    let mut best = 0;
    let mut unique = true;
    for (i, &score) in scores.iter().enumerate().skip(1) {
        if score > scores[best] {
            best = i;
            unique = true;
        } else if score == scores[best] {
            unique = false;
        }
    }
    (best, unique)
}

/// Factory producing [`BayesEngine`] instances
#[derive(Debug, Clone, Copy, Default)]
pub struct BayesEngineFactory;

impl EngineFactory for BayesEngineFactory {
    fn create(&self, classes: &[String]) -> Result<Box<dyn ClassificationEngine>> {
        Ok(Box::new(BayesEngine::new(classes)?))
    }

    fn restore(&self, bytes: &[u8]) -> Result<Box<dyn ClassificationEngine>> {
        Ok(Box::new(BayesEngine::from_bytes(bytes)?))
    }
}
