//! Snapshot codec: engine state to and from a transport-safe record

use crate::engine::EngineFactory;
use crate::handle::ClassifierHandle;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bayeshub_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Portable export of one classifier.
///
/// `blob` is the engine's own serialization, base64 encoded. The remaining
/// fields are descriptive; on import only `classes` is checked, and only when
/// it is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub classes: Vec<String>,

    #[serde(default)]
    pub word_count: Vec<u64>,

    #[serde(default)]
    pub learned: u64,

    #[serde(rename = "obj")]
    pub blob: String,
}

/// Serialize a classifier's engine into a snapshot
pub fn export(handle: &ClassifierHandle) -> Result<Snapshot> {
    let (bytes, learned, word_count) = handle.read_engine(|engine| -> Result<_> {
        Ok((engine.serialize()?, engine.learned(), engine.word_count()))
    })?;

    Ok(Snapshot {
        classes: handle.classes().to_vec(),
        word_count,
        learned,
        blob: STANDARD.encode(bytes),
    })
}

/// Decode a snapshot into a fresh, unregistered handle named `name`
pub fn decode(
    name: &str,
    snapshot: &Snapshot,
    factory: &dyn EngineFactory,
) -> Result<ClassifierHandle> {
    let bytes = STANDARD
        .decode(snapshot.blob.trim())
        .map_err(|e| Error::bad_request(format!("malformed snapshot encoding: {}", e)))?;

    let engine = factory.restore(&bytes).map_err(|e| match e {
        Error::Engine(_) => e,
        other => Error::engine(other.to_string()),
    })?;

    let restored = engine.classes();
    if !snapshot.classes.is_empty() && snapshot.classes != restored {
        return Err(Error::bad_request(format!(
            "snapshot declares classes {:?} but its state holds {:?}",
            snapshot.classes, restored
        )));
    }

    ClassifierHandle::new(name, engine).map_err(|e| Error::engine(e.to_string()))
}
