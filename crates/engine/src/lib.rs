//! Benchmark engine for wirebench
//!
//! Drives one measurement per configured algorithm against a
//! [`wirebench_store::Backend`]: each run opens its own connection
//! negotiating a single compressor, resets its collection, times one insert
//! and reads back the storage size. Runs happen strictly in order, a failure
//! aborts the benchmark, and every backend round-trip is bounded by one
//! overall [`Deadline`].
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use wirebench_core::config::{BenchConfig, DocumentShape};
//! use wirebench_core::document::TestDocument;
//! use wirebench_core::size::Payload;
//! use wirebench_engine::{Deadline, Orchestrator};
//! use wirebench_store::MongoBackend;
//!
//! #[tokio::main]
//! async fn main() -> wirebench_core::Result<()> {
//!     let config = BenchConfig::default();
//!     let deadline = Deadline::after(config.deadline);
//!     let payload = Payload::from_test_document(&TestDocument::generate(&config.document))?;
//!
//!     let orchestrator = Orchestrator::new(MongoBackend::new()?, config, deadline);
//!     let report = orchestrator.run_all(&payload).await?;
//!     orchestrator.teardown().await?;
//!
//!     println!("{} runs", report.len());
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod deadline;
pub mod driver;
pub mod orchestrator;

#[cfg(test)]
mod testing;

pub use deadline::Deadline;
pub use driver::{with_connection, RunDriver};
pub use orchestrator::{Orchestrator, RunEvent};
