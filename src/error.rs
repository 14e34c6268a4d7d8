//! Error types for document loading, resolution, validation and transport.

use std::path::PathBuf;
use thiserror::Error;

/// Errors during compound document resolution.
///
/// Only structural problems are errors. A relationship that cannot be
/// resolved is dropped from the output instead.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("document has no collection named \"{collection}\"")]
    MissingCollection { collection: String },

    #[error("invalid document: {message}")]
    InvalidDocument { message: String },

    #[error("collection \"{collection}\" must be an array, got {actual}")]
    InvalidCollection { collection: String, actual: String },

    #[error("record {index} in \"{collection}\" must be an object, got {actual}")]
    InvalidRecord {
        collection: String,
        index: usize,
        actual: String,
    },

    #[error("links of {record} must be an object, got {actual}")]
    InvalidLinks { record: String, actual: String },

    #[error("invalid link \"{association}\" on {record}: expected id or array of ids, got {actual}")]
    InvalidLinkValue {
        record: String,
        association: String,
        actual: String,
    },
}

impl ResolveError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

/// Errors while loading a document from a file, string or URL.
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

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            LoadError::NetworkError { .. } => 3,
            LoadError::InvalidJson { .. } => 2,
        }
    }
}

/// Errors during document validation.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("invalid schema: {message}")]
    InvalidSchema { message: String },

    #[error("validation failed with {} error(s)", errors.len())]
    Invalid { errors: Vec<SchemaError> },
}

impl ValidateError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ValidateError::InvalidSchema { .. } => 2,
            ValidateError::Invalid { .. } => 1,
        }
    }
}

/// Single validation error with path context.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SchemaError {
    /// JSON Pointer (RFC 6901) to the invalid value.
    pub path: String,
    /// Human-readable error message.
    pub message: String,
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Errors reading client configuration from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("environment variable {variable} was requested, but is not set")]
    MissingVariable { variable: String },

    #[error("environment variable {variable} has invalid value \"{value}\": {message}")]
    InvalidVariable {
        variable: String,
        value: String,
        message: String,
    },
}

/// Errors raised by the HTTP transport.
#[cfg(feature = "remote")]
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The connection could not be established, TLS handshake failures
    /// included.
    #[error("connection to {url} failed: {source}")]
    ConnectionFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} timed out")]
    Timeout {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("resource not found: {url}")]
    ResourceNotFound { url: String },

    #[error("the server responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("cannot parse response from {url}: {message}")]
    Parsing { url: String, message: String },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[cfg(feature = "remote")]
impl ClientError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ClientError::Config(_) | ClientError::Parsing { .. } => 2,
            _ => 3,
        }
    }
}

/// Errors from fetching and resolving a collection in one step.
#[cfg(feature = "remote")]
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

#[cfg(feature = "remote")]
impl FetchError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            FetchError::Client(e) => e.exit_code(),
            FetchError::Resolve(e) => e.exit_code(),
        }
    }
}
