//! Error types for directive resolution, currency lookups and schema loading.

use std::path::PathBuf;
use thiserror::Error;

/// Field-scoped errors raised by a wrapped resolver.
///
/// These are reported through the executor's per-field error channel and
/// never abort sibling fields.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("Currency codes: {} are not valid!", codes.join(","))]
    InvalidCode { codes: Vec<String> },

    #[error("Unable to validate field \"{field}\" of type {type_name}. @{directive} can only be used on scalar type String or Float")]
    UnsupportedType {
        field: String,
        type_name: String,
        directive: String,
    },

    #[error("field \"{field}\" resolved to {actual}, expected a numeric amount")]
    NonNumeric { field: String, actual: String },

    #[error("Error converting amount {amount} from {from} to {to}!")]
    Lookup {
        amount: f64,
        from: String,
        to: String,
        #[source]
        source: LookupError,
    },

    #[error("{message}")]
    Resolver { message: String },
}

impl FieldError {
    /// Error raised by a user-supplied resolver.
    pub fn resolver(message: impl Into<String>) -> Self {
        FieldError::Resolver {
            message: message.into(),
        }
    }
}

/// Errors from the external conversion lookup.
#[derive(Debug, Error)]
pub enum LookupError {
    #[cfg(feature = "remote")]
    #[error("failed to build HTTP client: {source}")]
    Client {
        #[source]
        source: reqwest::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("no amount found in response from {url}")]
    MissingAmount { url: String },

    #[error("invalid amount marker \"{marker}\": {message}")]
    InvalidMarker { marker: String, message: String },

    #[error("lookup unavailable: {message}")]
    Unavailable { message: String },
}

/// Errors while loading schema metadata or root values.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid type reference \"{value}\": {message}")]
    InvalidTypeRef { value: String, message: String },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            _ => 2,
        }
    }
}

/// Single field error with its response path.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ExecutionError {
    /// Path of response keys leading to the failed field.
    pub path: Vec<String>,
    /// Human-readable error message.
    pub message: String,
}

impl std::fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.join("."), self.message)
    }
}
