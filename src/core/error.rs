//! Policy editor error types

use thiserror::Error;

/// Errors that can occur while loading, editing or saving a policy file
#[derive(Error, Debug)]
pub enum PolicyError {
    /// An operation that needs a backing file was called before one was set
    #[error("No policy file bound to the model")]
    NoFileBound,

    /// A policy entry was built without its permission sets
    #[error("Invalid policy entry: {0}")]
    InvalidEntry(String),

    /// Paste was requested before anything was copied
    #[error("Clipboard is empty")]
    EmptyClipboard,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Policy text could not be tokenized or does not follow the grant grammar
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Codebase is not a URL with a supported scheme
    #[error("Invalid codebase: {0}")]
    InvalidCodebase(String),

    /// Permission name does not match any known category
    #[error("Unknown permission: {0}")]
    UnknownPermission(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PolicyError {
    /// Create a parse error for the given 1-based line
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        PolicyError::Parse {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid entry error
    pub fn invalid_entry(msg: impl Into<String>) -> Self {
        PolicyError::InvalidEntry(msg.into())
    }

    /// Whether this error is an IO "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, PolicyError::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Result type alias for policy operations
pub type PolicyResult<T> = Result<T, PolicyError>;
