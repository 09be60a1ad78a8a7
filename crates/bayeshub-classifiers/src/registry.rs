//! Classifier registry: the authoritative name to handle mapping

use crate::bayes::BayesEngineFactory;
use crate::engine::EngineFactory;
use crate::handle::{ClassifierHandle, ClassifierInfo};
use crate::prediction::{self, Prediction};
use crate::snapshot::{self, Snapshot};
use crate::training::{self, TrainOutcome};
use crate::validation::ensure_class_set;
use bayeshub_core::{Error, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// What `import` does when the target name is already registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportPolicy {
    /// Fail with `AlreadyExists`, like `create`
    #[default]
    Reject,
    /// Atomically replace the existing entry
    Overwrite,
}

/// Registry of named classifiers.
///
/// Structural changes (create, delete, import) take the mapping's write
/// lock; lookups take its read lock and clone the handle out before any
/// engine work starts. Engine access is then guarded by the handle's own
/// lock, so operations on different names never wait on each other.
pub struct ClassifierRegistry {
    factory: Arc<dyn EngineFactory>,
    import_policy: ImportPolicy,
    classifiers: RwLock<HashMap<String, Arc<ClassifierHandle>>>,
}

impl ClassifierRegistry {
    /// Create an empty registry backed by the given engine factory
    pub fn new(factory: Arc<dyn EngineFactory>) -> Self {
        Self {
            factory,
            import_policy: ImportPolicy::default(),
            classifiers: RwLock::new(HashMap::new()),
        }
    }

    /// Set the policy for imports that target an existing name
    pub fn with_import_policy(mut self, policy: ImportPolicy) -> Self {
        self.import_policy = policy;
        self
    }

    /// Policy applied to imports that target an existing name
    pub fn import_policy(&self) -> ImportPolicy {
        self.import_policy
    }

    /// Register a new, untrained classifier
    pub fn create(&self, name: &str, classes: &[String]) -> Result<Arc<ClassifierHandle>> {
        let mut classifiers = self.classifiers.write();

        if classifiers.contains_key(name) {
            return Err(Error::already_exists(name));
        }
        ensure_class_set(classes)?;

        let engine = self.factory.create(classes)?;
        let handle = Arc::new(ClassifierHandle::new(name, engine)?);
        classifiers.insert(name.to_string(), Arc::clone(&handle));

        info!("Created classifier '{}' with classes {:?}", name, classes);
        Ok(handle)
    }

    /// Remove a classifier
    pub fn delete(&self, name: &str) -> Result<()> {
        match self.classifiers.write().remove(name) {
            Some(_) => {
                info!("Deleted classifier '{}'", name);
                Ok(())
            }
            None => Err(Error::not_found(name)),
        }
    }

    /// Resolve a name to its handle
    pub fn get(&self, name: &str) -> Result<Arc<ClassifierHandle>> {
        self.classifiers
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::not_found(name))
    }

    /// Whether a classifier is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.classifiers.read().contains_key(name)
    }

    /// Names of all registered classifiers, sorted
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.classifiers.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered classifiers
    pub fn len(&self) -> usize {
        self.classifiers.read().len()
    }

    /// Whether the registry holds no classifiers
    pub fn is_empty(&self) -> bool {
        self.classifiers.read().is_empty()
    }

    /// Train `name`; see [`training::train`] for the cross-product semantics
    pub fn train(&self, name: &str, classes: &[String], phrases: &[String]) -> Result<TrainOutcome> {
        let handle = self.get(name)?;
        training::train(&handle, classes, phrases)
    }

    /// Score a phrase against `name`
    pub fn predict(&self, name: &str, phrase: &str) -> Result<Prediction> {
        let handle = self.get(name)?;
        prediction::predict(&handle, phrase)
    }

    /// Describe `name`
    pub fn info(&self, name: &str) -> Result<ClassifierInfo> {
        self.get(name)?.info()
    }

    /// Export `name` as a snapshot
    pub fn export(&self, name: &str) -> Result<Snapshot> {
        let handle = self.get(name)?;
        snapshot::export(&handle)
    }

    /// Build a classifier from a snapshot and register it under `name`.
    ///
    /// Decoding happens before the mapping is locked; the insert itself
    /// follows the registry's [`ImportPolicy`].
    pub fn import(&self, name: &str, snapshot: &Snapshot) -> Result<Arc<ClassifierHandle>> {
        if self.import_policy == ImportPolicy::Reject && self.contains(name) {
            return Err(Error::already_exists(name));
        }

        let handle = Arc::new(snapshot::decode(name, snapshot, self.factory.as_ref())?);

        let mut classifiers = self.classifiers.write();
        let replaced = match self.import_policy {
            ImportPolicy::Reject if classifiers.contains_key(name) => {
                return Err(Error::already_exists(name));
            }
            _ => classifiers
                .insert(name.to_string(), Arc::clone(&handle))
                .is_some(),
        };
        drop(classifiers);

        if replaced {
            info!("Imported classifier '{}', replacing the previous entry", name);
        } else {
            info!("Imported classifier '{}'", name);
        }
        debug!("Imported '{}' with {} observations", name, handle.learned());
        Ok(handle)
    }
}

impl Default for ClassifierRegistry {
    fn default() -> Self {
        Self::new(Arc::new(BayesEngineFactory))
    }
}
