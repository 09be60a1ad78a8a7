//! Classifier handle: one named engine instance and its fixed label set

use crate::engine::ClassificationEngine;
use crate::validation::ensure_class_set;
use bayeshub_core::Result;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named classifier owning exclusive access to its engine.
///
/// The label set is captured at construction and never changes. All engine
/// access goes through the handle's lock: training takes it exclusively,
/// reads share it.
pub struct ClassifierHandle {
    name: String,
    classes: Vec<String>,
    engine: RwLock<Box<dyn ClassificationEngine>>,
}

impl ClassifierHandle {
    /// Wrap an engine under a name. The engine's label set must be valid.
    pub fn new(name: impl Into<String>, engine: Box<dyn ClassificationEngine>) -> Result<Self> {
        let classes = engine.classes();
        ensure_class_set(&classes)?;

        Ok(Self {
            name: name.into(),
            classes,
            engine: RwLock::new(engine),
        })
    }

    /// Registry key of this classifier
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered label set; indexes line up with prediction scores
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Whether `class` is one of this classifier's labels
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Training observations recorded so far
    pub fn learned(&self) -> u64 {
        self.engine.read().learned()
    }

    /// Per-class word counts
    pub fn word_count(&self) -> Vec<u64> {
        self.engine.read().word_count()
    }

    /// Run `f` with shared access to the engine
    pub fn read_engine<T>(&self, f: impl FnOnce(&dyn ClassificationEngine) -> T) -> T {
        let engine = self.engine.read();
        f(&**engine)
    }

    /// Run `f` with exclusive access to the engine
    pub fn write_engine<T>(&self, f: impl FnOnce(&mut dyn ClassificationEngine) -> T) -> T {
        let mut engine = self.engine.write();
        f(&mut **engine)
    }

    /// Describe the classifier, including the learned word weights per class
    pub fn info(&self) -> Result<ClassifierInfo> {
        self.read_engine(|engine| -> Result<ClassifierInfo> {
            let mut words: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
            for class in &self.classes {
                let weights = engine.words_by_class(class)?;
                words.insert(class.clone(), weights.into_iter().collect());
            }

            Ok(ClassifierInfo {
                name: self.name.clone(),
                learned: engine.learned(),
                word_count: engine.word_count(),
                classes: self.classes.clone(),
                words,
            })
        })
    }
}

impl std::fmt::Debug for ClassifierHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierHandle")
            .field("name", &self.name)
            .field("classes", &self.classes)
            .finish_non_exhaustive()
    }
}

/// Read-only description of a classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifierInfo {
    pub name: String,
    pub learned: u64,
    pub word_count: Vec<u64>,
    pub classes: Vec<String>,
    /// class -> word -> weight
    pub words: BTreeMap<String, BTreeMap<String, f64>>,
}
