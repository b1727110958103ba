//! Benchmark configuration
//!
//! TOML file, environment overrides and the schema types shared by the
//! engine and the binary.

mod loader;
mod schema;

pub use loader::DEFAULT_CONFIG_FILE;
pub use schema::*;
