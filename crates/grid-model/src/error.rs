//! Error types for the grid engine.

use thiserror::Error;

/// Errors surfaced by grid collaborators (stores, persistence, export).
///
/// Pipeline stages themselves are infallible; these errors only come from
/// the edges where the engine talks to the outside world.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GridError {
    /// No schema is registered for the resource type.
    #[error("unknown resource type: {resource_type}")]
    UnknownResourceType { resource_type: String },

    /// A column key is not declared by the schema.
    #[error("unknown column '{key}' for {resource_type}")]
    UnknownColumn { resource_type: String, key: String },

    /// The resource store could not list records.
    #[error("failed to load {resource_type}: {message}")]
    Fetch {
        resource_type: String,
        message: String,
    },

    /// Reading or writing a preference failed.
    #[error("preference store error for '{namespace}': {message}")]
    Preference { namespace: String, message: String },

    /// Export serialization or delivery failed.
    #[error("export failed: {message}")]
    Export { message: String },

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GridError {
    /// Create a fetch error for a resource type.
    pub fn fetch(resource_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            resource_type: resource_type.into(),
            message: message.into(),
        }
    }

    /// Create an export error.
    pub fn export(message: impl Into<String>) -> Self {
        Self::Export {
            message: message.into(),
        }
    }
}

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;
