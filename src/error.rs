//! Error types for the check-in service.

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Session storage errors.
///
/// A missing key is not an error — the flow guard handles absence by
/// redirecting. These cover backend failures only.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage backend failure: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Errors from the backend check-in API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request to {endpoint} failed: {reason}")]
    RequestFailed { endpoint: String, reason: String },

    #[error("Invalid response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },

    #[error("QR token rejected: {0}")]
    TokenRejected(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;
