//! Error types for the store collaborator

use std::fmt::Display;
use std::time::Duration;
use thiserror::Error;
use wirebench_core::{Error, ErrorCode};

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Backend unreachable or session setup rejected
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Insert rejected
    #[error("Write rejected: {0}")]
    Write(String),

    /// Collection statistics failed or came back in an unexpected shape
    #[error("Collection statistics unavailable: {0}")]
    Stats(String),

    /// Dropping a collection or database failed
    #[error("Drop failed: {0}")]
    Drop(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
}

impl StoreError {
    /// Create a connection error
    pub fn connection(err: impl Display) -> Self {
        Self::Connection(err.to_string())
    }

    /// Create a write error
    pub fn write(err: impl Display) -> Self {
        Self::Write(err.to_string())
    }

    /// Create a statistics error
    pub fn stats(err: impl Display) -> Self {
        Self::Stats(err.to_string())
    }

    /// Create a drop error
    pub fn drop_failed(err: impl Display) -> Self {
        Self::Drop(err.to_string())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Benchmark error code this store error maps onto
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Connection(_) => ErrorCode::ConnectionError,
            Self::Write(_) | Self::Drop(_) => ErrorCode::WriteError,
            Self::Stats(_) => ErrorCode::StatsError,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Timeout(_) => ErrorCode::Timeout,
        }
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        let code = err.code();
        let message = err.to_string();
        let error = Error::new(code, message);

        match code {
            ErrorCode::ConnectionError => error.with_suggestion(
                "Check that the server is running and the connection string is correct",
            ),
            ErrorCode::StatsError => {
                error.with_suggestion("The backend must support the collStats command")
            }
            _ => error,
        }
        .with_source(err)
    }
}
