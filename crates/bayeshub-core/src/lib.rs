//! bayeshub Core
//!
//! Core types and utilities shared across bayeshub components.
//!
//! This crate provides:
//! - Error types and result handling
//! - The raw score type returned by classification engines
//! - Whitespace tokenization and percentage scaling shared by the pipelines

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{to_percentage, tokenize, Scores};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{to_percentage, tokenize, Scores};
}
