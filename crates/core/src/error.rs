//! Benchmark error handling with codes, context and recovery suggestions
//!
//! Every failure the benchmark can hit maps onto one [`ErrorCode`]. The code
//! survives propagation through the orchestrator so the binary can pick an
//! exit status, while context (which algorithm failed) is layered on top.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // General errors (1xxx)
    Unknown = 1000,
    Internal = 1001,
    Timeout = 1003,

    // Configuration errors (3xxx)
    ConfigError = 3000,
    InvalidConfigValue = 3004,

    // Encoding errors (4xxx)
    EncodingError = 4000,

    // Backend errors (5xxx)
    ConnectionError = 5000,
    WriteError = 5001,
    StatsError = 5002,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a human-readable category
    pub fn category(&self) -> &'static str {
        match self.code() / 1000 {
            1 => "General",
            3 => "Configuration",
            4 => "Encoding",
            5 => "Backend",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Main error type with rich context
#[derive(Error, Debug)]
pub struct Error {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional context
    pub context: Option<String>,
    /// Recovery suggestion
    pub suggestion: Option<String>,
    /// Source error
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ctx) = &self.context {
            write!(f, "{}: ", ctx)?;
        }
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

impl Error {
    /// Create a new error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a recovery suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Convert to a serializable report
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code,
            code_str: self.code.to_string(),
            category: self.code.category().to_string(),
            message: self.message.clone(),
            context: self.context.clone(),
            suggestion: self.suggestion.clone(),
            source: self.source.as_ref().map(|e| e.to_string()),
        }
    }

    /// Whether the error was caused by the overall deadline expiring
    pub fn is_timeout(&self) -> bool {
        self.code == ErrorCode::Timeout
    }

    // Convenience constructors

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    pub fn invalid_config_value(field: &str, reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InvalidConfigValue,
            format!("Invalid value for {}: {}", field, reason.into()),
        )
    }

    pub fn encoding(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::EncodingError, message)
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConnectionError, message)
            .with_suggestion("Check that the server is running and the connection string is correct")
    }

    pub fn write(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::WriteError, message)
    }

    pub fn stats(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StatsError, message)
    }

    pub fn timeout(after: std::time::Duration) -> Self {
        Self::new(
            ErrorCode::Timeout,
            format!("Benchmark deadline of {:?} exceeded", after),
        )
        .with_suggestion("Raise the deadline with --timeout or check backend latency")
    }
}

/// Serializable error report for logging and JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub code_str: String,
    pub category: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Exit codes for the benchmark binary
pub mod exit_codes {
    use super::ErrorCode;

    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    pub const CONFIG_ERROR: i32 = 3;
    pub const BACKEND_ERROR: i32 = 4;
    pub const ENCODING_ERROR: i32 = 5;
    pub const TIMEOUT: i32 = 124;

    /// Map an error code onto the process exit status
    pub fn for_code(code: ErrorCode) -> i32 {
        match code {
            ErrorCode::Timeout => TIMEOUT,
            ErrorCode::ConfigError | ErrorCode::InvalidConfigValue => CONFIG_ERROR,
            ErrorCode::ConnectionError | ErrorCode::WriteError | ErrorCode::StatsError => {
                BACKEND_ERROR
            }
            ErrorCode::EncodingError => ENCODING_ERROR,
            ErrorCode::Unknown | ErrorCode::Internal => FAILURE,
        }
    }
}

impl From<bson::ser::Error> for Error {
    fn from(err: bson::ser::Error) -> Self {
        Error::encoding(format!("BSON serialization failed: {}", err)).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::internal(format!("JSON error: {}", err)).with_source(err)
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;
    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_suggestion(suggestion))
    }
}
