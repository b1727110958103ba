//! Configuration schema definitions
//!
//! Every constant that shapes a benchmark run lives here rather than in
//! globals, so tests can shrink the document or swap pricing without touching
//! the engine.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Wire-level compressor negotiated when a connection is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compressor {
    /// Snappy (fastest, lightest compression)
    Snappy,
    /// Zlib (deflate based)
    Zlib,
    /// Zstandard
    Zstd,
}

impl Compressor {
    /// All compressors in their canonical benchmark order
    pub const ALL: [Compressor; 3] = [Compressor::Snappy, Compressor::Zlib, Compressor::Zstd];

    /// Identifier the backend recognizes during compressor negotiation
    pub fn id(&self) -> &'static str {
        match self {
            Self::Snappy => "snappy",
            Self::Zlib => "zlib",
            Self::Zstd => "zstd",
        }
    }

    /// Display name used in reports
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Snappy => "Snappy",
            Self::Zlib => "Zlib",
            Self::Zstd => "Zstd",
        }
    }
}

impl fmt::Display for Compressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Compressor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "snappy" => Ok(Self::Snappy),
            "zlib" => Ok(Self::Zlib),
            "zstd" => Ok(Self::Zstd),
            other => Err(Error::invalid_config_value(
                "compressor",
                format!("unknown compressor '{}' (expected snappy, zlib or zstd)", other),
            )),
        }
    }
}

/// One row of the algorithm table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmSpec {
    /// Display name ("Snappy")
    pub name: String,
    /// Compressor negotiated for this run
    pub compressor: Compressor,
}

impl AlgorithmSpec {
    /// Create a new algorithm row
    pub fn new(name: impl Into<String>, compressor: Compressor) -> Self {
        Self {
            name: name.into(),
            compressor,
        }
    }

    /// Collection the run writes into, named after the algorithm
    pub fn collection_name(&self) -> String {
        format!("test_{}", self.name.to_lowercase())
    }
}

impl From<Compressor> for AlgorithmSpec {
    fn from(compressor: Compressor) -> Self {
        Self::new(compressor.display_name(), compressor)
    }
}

/// The fixed algorithm table: Snappy, Zlib, Zstd in that order
pub fn default_algorithms() -> Vec<AlgorithmSpec> {
    Compressor::ALL.into_iter().map(AlgorithmSpec::from).collect()
}

/// Composition of the synthetic document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentShape {
    /// How many times the sentence is repeated in the text blob
    #[serde(default = "default_text_repeat")]
    pub text_repeat: usize,

    /// Number of product item records
    #[serde(default = "default_item_count")]
    pub item_count: usize,

    /// Length of the pseudo-random binary block
    #[serde(default = "default_binary_len")]
    pub binary_len: usize,

    /// Seed for the binary block generator
    #[serde(default = "default_binary_seed")]
    pub binary_seed: u64,
}

impl Default for DocumentShape {
    fn default() -> Self {
        Self {
            text_repeat: default_text_repeat(),
            item_count: default_item_count(),
            binary_len: default_binary_len(),
            binary_seed: default_binary_seed(),
        }
    }
}

impl DocumentShape {
    /// A shape small enough for unit tests
    #[must_use]
    pub fn tiny() -> Self {
        Self {
            text_repeat: 10,
            item_count: 5,
            binary_len: 64,
            binary_seed: default_binary_seed(),
        }
    }
}

fn default_text_repeat() -> usize {
    50_000
}

fn default_item_count() -> usize {
    5_000
}

fn default_binary_len() -> usize {
    300_000
}

fn default_binary_seed() -> u64 {
    0x5eed_0f_b150
}

/// Constants for bandwidth and cost projections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Transfers used for the network traffic simulation
    #[serde(default = "default_bandwidth_transfers")]
    pub bandwidth_transfers: u64,

    /// Transfers per month used for the cost projection
    #[serde(default = "default_monthly_transfers")]
    pub monthly_transfers: u64,

    /// Data transfer price in dollars per gigabyte
    #[serde(default = "default_cost_per_gb")]
    pub cost_per_gb: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            bandwidth_transfers: default_bandwidth_transfers(),
            monthly_transfers: default_monthly_transfers(),
            cost_per_gb: default_cost_per_gb(),
        }
    }
}

fn default_bandwidth_transfers() -> u64 {
    1_000
}

fn default_monthly_transfers() -> u64 {
    1_000_000
}

fn default_cost_per_gb() -> f64 {
    0.09
}

/// Root benchmark configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchConfig {
    /// Database holding the per-algorithm collections
    #[serde(default = "default_database")]
    pub database: String,

    /// Algorithms to run, in order
    #[serde(default = "default_algorithms")]
    pub algorithms: Vec<AlgorithmSpec>,

    /// Synthetic document composition
    #[serde(default)]
    pub document: DocumentShape,

    /// Pause between consecutive runs
    #[serde(default = "default_pause", with = "millis")]
    pub pause: Duration,

    /// Deadline covering the whole benchmark
    #[serde(default = "default_deadline", with = "secs")]
    pub deadline: Duration,

    /// Bandwidth and cost projection constants
    #[serde(default)]
    pub projection: ProjectionConfig,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            algorithms: default_algorithms(),
            document: DocumentShape::default(),
            pause: default_pause(),
            deadline: default_deadline(),
            projection: ProjectionConfig::default(),
        }
    }
}

fn default_database() -> String {
    "compression_demo".to_string()
}

fn default_pause() -> Duration {
    Duration::from_millis(100)
}

fn default_deadline() -> Duration {
    Duration::from_secs(30)
}

mod millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let ms = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(ms))
    }
}

mod secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl BenchConfig {
    /// Builder-style method to set the database
    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Builder-style method to set the algorithm table
    #[must_use]
    pub fn with_algorithms(mut self, algorithms: Vec<AlgorithmSpec>) -> Self {
        self.algorithms = algorithms;
        self
    }

    /// Builder-style method to set the document shape
    #[must_use]
    pub fn with_document(mut self, document: DocumentShape) -> Self {
        self.document = document;
        self
    }

    /// Builder-style method to set the pause between runs
    #[must_use]
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Builder-style method to set the overall deadline
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Builder-style method to set the projection constants
    #[must_use]
    pub fn with_projection(mut self, projection: ProjectionConfig) -> Self {
        self.projection = projection;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.database.trim().is_empty() {
            return Err(Error::invalid_config_value("database", "cannot be empty"));
        }

        if self.database.contains(['/', '\\', '.', ' ', '"', '$']) {
            return Err(Error::invalid_config_value(
                "database",
                format!("'{}' contains characters the backend rejects", self.database),
            ));
        }

        if self.algorithms.is_empty() {
            return Err(Error::invalid_config_value(
                "algorithms",
                "at least one algorithm is required",
            ));
        }

        let mut seen = HashSet::new();
        for algorithm in &self.algorithms {
            if algorithm.name.trim().is_empty() {
                return Err(Error::invalid_config_value("algorithms", "empty algorithm name"));
            }
            if !seen.insert(algorithm.collection_name()) {
                return Err(Error::invalid_config_value(
                    "algorithms",
                    format!("duplicate algorithm '{}'", algorithm.name),
                ));
            }
        }

        if self.deadline.is_zero() {
            return Err(Error::invalid_config_value("deadline", "cannot be zero"));
        }

        let projection = &self.projection;
        if projection.bandwidth_transfers == 0 || projection.monthly_transfers == 0 {
            return Err(Error::invalid_config_value(
                "projection",
                "transfer counts must be positive",
            ));
        }

        if !projection.cost_per_gb.is_finite() || projection.cost_per_gb < 0.0 {
            return Err(Error::invalid_config_value(
                "projection.cost_per_gb",
                "must be a non-negative number",
            ));
        }

        Ok(())
    }
}
