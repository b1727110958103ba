//! Document store collaborator for wirebench
//!
//! This crate is the only place that talks to the storage backend. It defines
//! the narrow contract the benchmark engine consumes and implements it for
//! MongoDB with the official driver.
//!
//! # Features
//!
//! - **Environment-based configuration**: connection string and handshake name
//! - **Compressor negotiation**: every connection is restricted to the
//!   compressors it was opened with
//! - **Idempotent resets**: dropping a collection that does not exist succeeds
//! - **Typed statistics**: `collStats` replies parsed into [`CollectionStats`]
//!
//! # Example
//!
//! ```rust,no_run
//! use wirebench_core::config::Compressor;
//! use wirebench_store::{Backend, Connection, MongoBackend, StoreConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = MongoBackend::with_config(StoreConfig::from_env())?;
//!     let connection = backend.connect(&[Compressor::Zstd]).await?;
//!
//!     let stats = connection.collection_stats("compression_demo", "test_zstd").await?;
//!     println!("{} bytes on disk", stats.storage_size);
//!
//!     connection.close().await;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod client;
pub mod config;
pub mod error;

pub use backend::{Backend, CollectionStats, Connection};
pub use client::{MongoBackend, MongoConnection};
pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::backend::{Backend, CollectionStats, Connection};
    pub use crate::client::MongoBackend;
    pub use crate::config::StoreConfig;
    pub use crate::error::{StoreError, StoreResult};
}
