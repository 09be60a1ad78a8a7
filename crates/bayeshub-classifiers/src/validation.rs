//! Class-set invariants checked before any mutation reaches an engine

use crate::handle::ClassifierHandle;
use bayeshub_core::{Error, Result};
use std::collections::HashSet;

/// Minimum number of classes a classifier must be created with
pub const MIN_CLASSES: usize = 2;

/// Check that a label set can back a classifier: at least two labels, no repeats
pub fn ensure_class_set(classes: &[String]) -> Result<()> {
    if classes.len() < MIN_CLASSES {
        return Err(Error::invalid_class_set(format!(
            "At least {} classes must be provided",
            MIN_CLASSES
        )));
    }

    let mut seen = HashSet::with_capacity(classes.len());
    for class in classes {
        if !seen.insert(class.as_str()) {
            return Err(Error::invalid_class_set(format!(
                "class '{}' is listed more than once",
                class
            )));
        }
    }

    Ok(())
}

/// Check that every requested class belongs to the handle's label set.
///
/// Fails on the first unknown class; callers must not touch the engine
/// unless this returns `Ok`.
pub fn ensure_classes_known(handle: &ClassifierHandle, requested: &[String]) -> Result<()> {
    match requested.iter().find(|class| !handle.has_class(class)) {
        Some(class) => Err(Error::unknown_class(handle.name(), class.as_str())),
        None => Ok(()),
    }
}
