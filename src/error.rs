//! Error types for the fantasy football database service

use thiserror::Error;

#[cfg(test)]
mod tests;

pub type Result<T> = std::result::Result<T, FfdbError>;

#[derive(Error, Debug)]
pub enum FfdbError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV parsing failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Failed to parse number: {0}")]
    ParseInt(#[from] std::num::ParseIntError),

    #[error("Invalid value for '{name}': {message}")]
    InvalidParameter { name: String, message: String },

    #[error("Invalid position: {position}")]
    InvalidPosition { position: String },

    #[error("{provider} returned an unusable payload: {message}")]
    Provider { provider: String, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Background job failed: {message}")]
    Job { message: String },

    #[error("Database connection lock was poisoned")]
    LockPoisoned,
}

impl FfdbError {
    /// Shorthand for a rejected query/CLI parameter.
    pub fn invalid_parameter(name: &str, message: impl Into<String>) -> Self {
        FfdbError::InvalidParameter {
            name: name.to_string(),
            message: message.into(),
        }
    }

    /// True for errors caused by the caller's input rather than by the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            FfdbError::InvalidParameter { .. } | FfdbError::InvalidPosition { .. }
        )
    }
}
