//! Run results and cross-run aggregation
//!
//! A [`RunResult`] is produced per algorithm; a [`BenchmarkReport`] holds them
//! in run order and [`Analysis`] derives the comparison figures the reporter
//! renders: best compression, fastest insert, bandwidth and cost projections.

use crate::config::{AlgorithmSpec, Compressor, ProjectionConfig};
use crate::error::{Error, Result};
use serde::{Serialize, Serializer};
use std::time::Duration;

/// Bytes in one megabyte (binary)
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Megabytes in one gigabyte (binary)
pub const MB_PER_GB: f64 = 1024.0;

/// Convert a byte count to megabytes
pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

/// `(1 - compressed / original) * 100`
pub fn reduction_percent(original_size: u64, compressed_size: u64) -> f64 {
    (1.0 - compressed_size as f64 / original_size as f64) * 100.0
}

/// `original / compressed`
pub fn compression_ratio(original_size: u64, compressed_size: u64) -> f64 {
    original_size as f64 / compressed_size as f64
}

/// Dollar cost of moving `size_mb` megabytes `transfers` times
pub fn transfer_cost(size_mb: f64, transfers: u64, cost_per_gb: f64) -> f64 {
    size_mb * transfers as f64 / MB_PER_GB * cost_per_gb
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64() * 1000.0)
}

/// Output of one per-algorithm measurement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunResult {
    pub algorithm: String,
    pub compressor: Compressor,
    /// Encoded size of the payload, shared by every run
    pub original_size: u64,
    /// Storage size the backend reported after compression
    pub compressed_size: u64,
    pub reduction_percent: f64,
    pub compression_ratio: f64,
    /// Wall-clock time of the single insert
    #[serde(rename = "insert_time_ms", serialize_with = "serialize_millis")]
    pub insert_time: Duration,
}

impl RunResult {
    /// Derive reduction and ratio from the raw measurements
    ///
    /// A compressed size above the original is a valid outcome. A reported
    /// storage size of zero is not: the ratio would be infinite, so it is
    /// rejected as a statistics error.
    pub fn new(
        algorithm: &AlgorithmSpec,
        original_size: u64,
        compressed_size: u64,
        insert_time: Duration,
    ) -> Result<Self> {
        if original_size == 0 {
            return Err(Error::encoding("original document encoded to zero bytes"));
        }

        if compressed_size == 0 {
            return Err(Error::stats(format!(
                "backend reported a storage size of 0 bytes for {}",
                algorithm.name
            ))
            .with_suggestion("The collection may not have been flushed yet; rerun the benchmark"));
        }

        Ok(Self {
            algorithm: algorithm.name.clone(),
            compressor: algorithm.compressor,
            original_size,
            compressed_size,
            reduction_percent: reduction_percent(original_size, compressed_size),
            compression_ratio: compression_ratio(original_size, compressed_size),
            insert_time,
        })
    }

    pub fn original_size_mb(&self) -> f64 {
        bytes_to_mb(self.original_size)
    }

    pub fn compressed_size_mb(&self) -> f64 {
        bytes_to_mb(self.compressed_size)
    }
}

/// Ordered results of a whole benchmark
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkReport {
    pub original_size: u64,
    pub results: Vec<RunResult>,
}

impl BenchmarkReport {
    pub fn new(original_size: u64) -> Self {
        Self {
            original_size,
            results: Vec::new(),
        }
    }

    pub fn push(&mut self, result: RunResult) {
        self.results.push(result);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn original_size_mb(&self) -> f64 {
        bytes_to_mb(self.original_size)
    }

    /// Result with the greatest reduction; the earliest wins a tie
    pub fn best_compression(&self) -> Option<(usize, &RunResult)> {
        self.pick(|candidate, best| candidate.reduction_percent > best.reduction_percent)
    }

    /// Result with the shortest insert; the earliest wins a tie
    pub fn fastest_insert(&self) -> Option<(usize, &RunResult)> {
        self.pick(|candidate, best| candidate.insert_time < best.insert_time)
    }

    fn pick(&self, beats: impl Fn(&RunResult, &RunResult) -> bool) -> Option<(usize, &RunResult)> {
        self.results
            .iter()
            .enumerate()
            .fold(None, |best, (index, candidate)| match best {
                Some((_, current)) if !beats(candidate, current) => best,
                _ => Some((index, candidate)),
            })
    }
}

/// A result singled out by the analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlight {
    /// Position in the run order
    pub index: usize,
    pub algorithm: String,
    pub reduction_percent: f64,
    #[serde(rename = "insert_time_ms", serialize_with = "serialize_millis")]
    pub insert_time: Duration,
}

impl Highlight {
    fn new(index: usize, result: &RunResult) -> Self {
        Self {
            index,
            algorithm: result.algorithm.clone(),
            reduction_percent: result.reduction_percent,
            insert_time: result.insert_time,
        }
    }
}

/// Projected traffic for one algorithm
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandwidthRow {
    pub algorithm: String,
    pub total_mb: f64,
    pub saved_mb: f64,
    pub savings_percent: f64,
}

/// Network traffic simulation over a fixed number of transfers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandwidthProjection {
    pub transfers: u64,
    pub uncompressed_mb: f64,
    pub rows: Vec<BandwidthRow>,
}

/// Projected monthly cost for one algorithm
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostRow {
    pub algorithm: String,
    pub monthly_cost: f64,
    pub savings: f64,
    pub savings_percent: f64,
}

/// Monthly data transfer cost projection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostProjection {
    pub transfers: u64,
    pub cost_per_gb: f64,
    pub uncompressed_cost: f64,
    pub rows: Vec<CostRow>,
}

/// Cross-run figures derived from a report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub original_size_mb: f64,
    pub best_compression: Highlight,
    pub fastest_insert: Highlight,
    pub bandwidth: BandwidthProjection,
    pub cost: CostProjection,
}

impl Analysis {
    /// Aggregate a report
    ///
    /// # Panics
    ///
    /// Panics if the report holds no results. The orchestrator either returns
    /// one result per algorithm or an error, so an empty report is a caller bug.
    pub fn new(report: &BenchmarkReport, projection: &ProjectionConfig) -> Self {
        assert!(!report.is_empty(), "cannot analyse an empty benchmark report");

        let original_mb = report.original_size_mb();
        let (best_index, best) = report.best_compression().expect("non-empty report");
        let (fastest_index, fastest) = report.fastest_insert().expect("non-empty report");

        Self {
            original_size_mb: original_mb,
            best_compression: Highlight::new(best_index, best),
            fastest_insert: Highlight::new(fastest_index, fastest),
            bandwidth: bandwidth_projection(report, projection.bandwidth_transfers),
            cost: cost_projection(report, projection),
        }
    }
}

fn bandwidth_projection(report: &BenchmarkReport, transfers: u64) -> BandwidthProjection {
    let uncompressed_mb = report.original_size_mb() * transfers as f64;

    let rows = report
        .results
        .iter()
        .map(|result| {
            let total_mb = result.compressed_size_mb() * transfers as f64;
            let saved_mb = uncompressed_mb - total_mb;
            BandwidthRow {
                algorithm: result.algorithm.clone(),
                total_mb,
                saved_mb,
                savings_percent: saved_mb / uncompressed_mb * 100.0,
            }
        })
        .collect();

    BandwidthProjection {
        transfers,
        uncompressed_mb,
        rows,
    }
}

fn cost_projection(report: &BenchmarkReport, projection: &ProjectionConfig) -> CostProjection {
    let transfers = projection.monthly_transfers;
    let cost_per_gb = projection.cost_per_gb;
    let uncompressed_cost = transfer_cost(report.original_size_mb(), transfers, cost_per_gb);

    let rows = report
        .results
        .iter()
        .map(|result| {
            let monthly_cost = transfer_cost(result.compressed_size_mb(), transfers, cost_per_gb);
            let savings = uncompressed_cost - monthly_cost;
            let savings_percent = if uncompressed_cost > 0.0 {
                savings / uncompressed_cost * 100.0
            } else {
                0.0
            };
            CostRow {
                algorithm: result.algorithm.clone(),
                monthly_cost,
                savings,
                savings_percent,
            }
        })
        .collect();

    CostProjection {
        transfers,
        cost_per_gb,
        uncompressed_cost,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn result(name: &str, original: u64, compressed: u64, millis: u64) -> RunResult {
        let compressor = name.parse().unwrap_or(Compressor::Zstd);
        RunResult::new(
            &AlgorithmSpec::new(name, compressor),
            original,
            compressed,
            Duration::from_millis(millis),
        )
        .unwrap()
    }

    fn report(results: Vec<RunResult>) -> BenchmarkReport {
        BenchmarkReport {
            original_size: results[0].original_size,
            results,
        }
    }

    #[test]
    fn test_half_size_scenario() {
        let r = result("Zlib", 1000, 500, 10);
        assert!((r.compression_ratio - 2.0).abs() < EPS);
        assert!((r.reduction_percent - 50.0).abs() < EPS);
    }

    #[test]
    fn test_growth_is_not_an_error() {
        let r = result("Snappy", 1000, 1200, 10);
        assert!(r.reduction_percent < 0.0);
        assert!(r.compression_ratio < 1.0);
    }

    #[test]
    fn test_zero_storage_size_is_rejected() {
        let err = RunResult::new(
            &AlgorithmSpec::from(Compressor::Zstd),
            1000,
            0,
            Duration::from_millis(1),
        )
        .unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::StatsError);
    }

    #[test]
    fn test_best_and_fastest_tie_break() {
        let report = report(vec![
            result("Snappy", 1000, 500, 30),
            result("Zlib", 1000, 500, 20),
            result("Zstd", 1000, 600, 20),
        ]);

        let (best_index, best) = report.best_compression().unwrap();
        assert_eq!(best_index, 0);
        assert_eq!(best.algorithm, "Snappy");

        let (fastest_index, fastest) = report.fastest_insert().unwrap();
        assert_eq!(fastest_index, 1);
        assert_eq!(fastest.algorithm, "Zlib");
    }

    #[test]
    fn test_empty_report_has_no_picks() {
        let report = BenchmarkReport::new(1000);
        assert!(report.best_compression().is_none());
        assert!(report.fastest_insert().is_none());
    }

    #[test]
    fn test_end_to_end_ranking() {
        let report = report(vec![
            result("Snappy", 4_700_000, 3_525_000, 40),
            result("Zlib", 4_700_000, 2_256_000, 90),
            result("Zstd", 4_700_000, 2_209_000, 55),
        ]);

        let reductions: Vec<_> = report.results.iter().map(|r| r.reduction_percent.round()).collect();
        assert_eq!(reductions, [25.0, 52.0, 53.0]);

        let ratios: Vec<_> = report
            .results
            .iter()
            .map(|r| (r.compression_ratio * 100.0).round() / 100.0)
            .collect();
        assert_eq!(ratios, [1.33, 2.08, 2.13]);

        let analysis = Analysis::new(&report, &ProjectionConfig::default());
        assert_eq!(analysis.best_compression.algorithm, "Zstd");
        assert_eq!(analysis.best_compression.index, 2);
        assert_eq!(analysis.fastest_insert.algorithm, "Snappy");
    }

    #[test]
    fn test_cost_projection_scenario() {
        let uncompressed = transfer_cost(4.7, 1_000_000, 0.09);
        let zlib = transfer_cost(2.26, 1_000_000, 0.09);
        let savings = uncompressed - zlib;

        assert!((uncompressed - 413.09).abs() < 0.01);
        assert!((zlib - 198.63).abs() < 0.01);
        assert!((savings - 214.45).abs() < 0.05);
        assert!((savings / uncompressed * 100.0 - 51.9).abs() < 0.1);
    }

    #[test]
    fn test_projections_from_report() {
        let mb = BYTES_PER_MB as u64;
        let report = report(vec![
            result("Snappy", 4 * mb, 3 * mb, 10),
            result("Zstd", 4 * mb, 2 * mb, 12),
        ]);
        let projection = ProjectionConfig {
            bandwidth_transfers: 1_000,
            monthly_transfers: 1_024,
            cost_per_gb: 1.0,
        };

        let analysis = Analysis::new(&report, &projection);

        assert!((analysis.original_size_mb - 4.0).abs() < EPS);
        assert!((analysis.bandwidth.uncompressed_mb - 4000.0).abs() < EPS);
        assert!((analysis.bandwidth.rows[0].total_mb - 3000.0).abs() < EPS);
        assert!((analysis.bandwidth.rows[1].saved_mb - 2000.0).abs() < EPS);
        assert!((analysis.bandwidth.rows[1].savings_percent - 50.0).abs() < EPS);

        assert!((analysis.cost.uncompressed_cost - 4.0).abs() < EPS);
        assert!((analysis.cost.rows[0].monthly_cost - 3.0).abs() < EPS);
        assert!((analysis.cost.rows[0].savings - 1.0).abs() < EPS);
        assert!((analysis.cost.rows[1].savings_percent - 50.0).abs() < EPS);
    }

    #[test]
    fn test_zero_price_has_no_savings_percent() {
        let report = report(vec![result("Zstd", 1000, 500, 1)]);
        let projection = ProjectionConfig {
            cost_per_gb: 0.0,
            ..ProjectionConfig::default()
        };
        let analysis = Analysis::new(&report, &projection);
        assert_eq!(analysis.cost.rows[0].savings_percent, 0.0);
    }

    #[test]
    #[should_panic(expected = "empty benchmark report")]
    fn test_analysis_requires_results() {
        Analysis::new(&BenchmarkReport::new(1000), &ProjectionConfig::default());
    }

    #[test]
    fn test_result_json_shape() {
        let json = serde_json::to_value(result("Zlib", 1000, 500, 250)).unwrap();
        assert_eq!(json["algorithm"], "Zlib");
        assert_eq!(json["compressor"], "zlib");
        assert_eq!(json["compressed_size"], 500);
        assert_eq!(json["insert_time_ms"], 250.0);
    }

    proptest! {
        #[test]
        fn prop_ratio_and_reduction_agree(original in 1u64..u32::MAX as u64, compressed in 1u64..u32::MAX as u64) {
            let r = result("Zstd", original, compressed, 1);
            let expected = (1.0 - compressed as f64 / original as f64) * 100.0;
            prop_assert!((r.reduction_percent - expected).abs() < 1e-6);
            prop_assert!((r.compression_ratio * compressed as f64 - original as f64).abs() < 1e-3 * original as f64);
            let inverse = 1.0 / r.compression_ratio;
            prop_assert!((1.0 - r.reduction_percent / 100.0 - inverse).abs() <= 1e-9 * inverse.max(1.0));
        }

        #[test]
        fn prop_best_compression_is_maximal(sizes in proptest::collection::vec(1u64..10_000, 1..8)) {
            let results = sizes.iter().map(|s| result("Zstd", 10_000, *s, 1)).collect();
            let report = report(results);
            let (index, best) = report.best_compression().unwrap();
            let min_size = *sizes.iter().min().unwrap();
            prop_assert_eq!(best.compressed_size, min_size);
            prop_assert_eq!(index, sizes.iter().position(|s| *s == min_size).unwrap());
        }
    }
}
