//! Error types for Trellis

use thiserror::Error;

/// The main error type for Trellis operations
#[derive(Debug, Error)]
pub enum TrellisError {
    #[error("Unknown namespace: {0}")]
    UnknownNamespace(String),

    #[error("Unknown component type '{type_name}' in namespace '{namespace}'")]
    UnknownType { namespace: String, type_name: String },

    #[error("Library not found: {0}")]
    LibraryNotFound(String),

    #[error("Library load failed for '{namespace}': {reason}")]
    LoadFailure { namespace: String, reason: String },

    #[error("Manifest error: {0}")]
    ManifestError(String),

    #[error("Namespace mismatch: requested '{requested}', bundle declares '{declared}'")]
    NamespaceMismatch { requested: String, declared: String },

    #[error("Fetch error: {0}")]
    FetchError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Tree description error: {0}")]
    TreeError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("JSON error: {0}")]
    JsonError(String),
}

impl TrellisError {
    /// True for errors that mean "this source does not have the library",
    /// as opposed to a source that has it but could not deliver it.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TrellisError::LibraryNotFound(_))
    }

    /// The bare failure reason, without the category prefix `Display` adds
    /// for fetch errors.
    pub fn reason(&self) -> String {
        match self {
            TrellisError::FetchError(reason) => reason.clone(),
            TrellisError::LoadFailure { reason, .. } => reason.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for Trellis operations
pub type Result<T> = std::result::Result<T, TrellisError>;

impl From<toml::de::Error> for TrellisError {
    fn from(err: toml::de::Error) -> Self {
        TrellisError::TomlParseError(err.to_string())
    }
}

impl From<serde_json::Error> for TrellisError {
    fn from(err: serde_json::Error) -> Self {
        TrellisError::JsonError(err.to_string())
    }
}
