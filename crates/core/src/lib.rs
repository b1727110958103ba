//! Core building blocks for the wirebench compression benchmark
//!
//! This crate owns everything that does not talk to the backend:
//!
//! - **Error handling**: coded errors with context and recovery suggestions
//! - **Configuration**: algorithm table, document shape, projection constants
//! - **Document synthesis**: the deterministic multi-megabyte test document
//! - **Size probing**: canonical BSON length of a document
//! - **Metrics**: per-run results and cross-run analysis
//!
//! # Example
//!
//! ```rust
//! use wirebench_core::config::DocumentShape;
//! use wirebench_core::document::TestDocument;
//! use wirebench_core::size::Payload;
//!
//! let document = TestDocument::generate(&DocumentShape::tiny());
//! let payload = Payload::from_test_document(&document).unwrap();
//! assert!(payload.original_size() > 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod document;
pub mod error;
pub mod metrics;
pub mod size;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{AlgorithmSpec, BenchConfig, Compressor, DocumentShape, ProjectionConfig};
    pub use crate::document::TestDocument;
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::metrics::{Analysis, BenchmarkReport, RunResult};
    pub use crate::size::{encoded_len, Payload};
}
