//! Error types for bayeshub

/// Result type alias using bayeshub's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for registry and engine operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No classifier is registered under the name
    #[error("classifier '{0}' not found")]
    NotFound(String),

    /// A classifier is already registered under the name
    #[error("classifier '{0}' already exists")]
    AlreadyExists(String),

    /// The label set is unusable (fewer than two classes, duplicates)
    #[error("invalid class set: {0}")]
    InvalidClassSet(String),

    /// Training referenced a class the classifier does not have
    #[error("model {name} does not have class {class}")]
    UnknownClass { name: String, class: String },

    /// Malformed request payload or snapshot encoding
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Failure reported by the classification engine
    #[error("engine error: {0}")]
    Engine(String),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new not-found error
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new already-exists error
    pub fn already_exists(name: impl Into<String>) -> Self {
        Self::AlreadyExists(name.into())
    }

    /// Create a new invalid class set error
    pub fn invalid_class_set(msg: impl Into<String>) -> Self {
        Self::InvalidClassSet(msg.into())
    }

    /// Create a new unknown class error
    pub fn unknown_class(name: impl Into<String>, class: impl Into<String>) -> Self {
        Self::UnknownClass {
            name: name.into(),
            class: class.into(),
        }
    }

    /// Create a new bad request error
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    /// Create a new engine error
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Short machine-readable name of the error kind, used as a metrics label
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::AlreadyExists(_) => "already_exists",
            Self::InvalidClassSet(_) => "invalid_class_set",
            Self::UnknownClass { .. } => "unknown_class",
            Self::BadRequest(_) => "bad_request",
            Self::Engine(_) => "engine",
            Self::Serialization(_) => "serialization",
            Self::Config(_) => "config",
            Self::Internal(_) => "internal",
        }
    }
}
