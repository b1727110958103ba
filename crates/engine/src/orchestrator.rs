//! Benchmark orchestration across the algorithm table

use crate::deadline::Deadline;
use crate::driver::{with_connection, RunDriver};
use tracing::{info, instrument, warn};
use uuid::Uuid;
use wirebench_core::config::{AlgorithmSpec, BenchConfig};
use wirebench_core::metrics::{BenchmarkReport, RunResult};
use wirebench_core::size::Payload;
use wirebench_core::{Result, ResultExt};
use wirebench_store::{Backend, Connection};

/// Progress notification emitted while the benchmark runs
#[derive(Debug, Clone, Copy)]
pub enum RunEvent<'a> {
    /// A run is about to connect
    Started {
        index: usize,
        total: usize,
        algorithm: &'a AlgorithmSpec,
    },
    /// A run completed and its result was recorded
    Finished {
        index: usize,
        total: usize,
        result: &'a RunResult,
    },
}

/// Runs every configured algorithm in order against one backend
pub struct Orchestrator<B: Backend> {
    backend: B,
    config: BenchConfig,
    deadline: Deadline,
    run_id: Uuid,
}

impl<B: Backend> Orchestrator<B> {
    /// Create an orchestrator; every backend call is bounded by `deadline`
    pub fn new(backend: B, config: BenchConfig, deadline: Deadline) -> Self {
        Self {
            backend,
            config,
            deadline,
            run_id: Uuid::new_v4(),
        }
    }

    /// Correlation id attached to this benchmark's log events
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    pub fn deadline(&self) -> Deadline {
        self.deadline
    }

    /// Run all algorithms without progress reporting
    pub async fn run_all(&self, payload: &Payload) -> Result<BenchmarkReport> {
        self.run_all_with(payload, |_| {}).await
    }

    /// Run all algorithms sequentially, in configured order
    ///
    /// The first failing run aborts the benchmark: no partial report is
    /// returned and the error names the algorithm that failed.
    #[instrument(skip_all, fields(run_id = %self.run_id))]
    pub async fn run_all_with(
        &self,
        payload: &Payload,
        mut on_event: impl FnMut(RunEvent<'_>),
    ) -> Result<BenchmarkReport> {
        let algorithms = &self.config.algorithms;
        let total = algorithms.len();
        let driver = RunDriver::new(&self.backend, &self.config.database, self.deadline);
        let mut report = BenchmarkReport::new(payload.original_size());

        info!(total, original_size = payload.original_size(), "Starting benchmark");

        for (index, algorithm) in algorithms.iter().enumerate() {
            if index > 0 && !self.config.pause.is_zero() {
                let pause = self.config.pause;
                self.deadline
                    .run(async {
                        tokio::time::sleep(pause).await;
                        Ok(())
                    })
                    .await?;
            }

            on_event(RunEvent::Started {
                index,
                total,
                algorithm,
            });

            let result = driver
                .run(algorithm, payload)
                .await
                .context(format!("{} test failed", algorithm.name))?;

            info!(
                algorithm = %result.algorithm,
                reduction_percent = result.reduction_percent,
                "Run finished"
            );

            report.push(result);
            if let Some(result) = report.results.last() {
                on_event(RunEvent::Finished {
                    index,
                    total,
                    result,
                });
            }
        }

        Ok(report)
    }

    /// Drop the benchmark database over a plain, uncompressed connection
    ///
    /// Best effort: failures are logged and returned so the caller can decide
    /// whether they matter.
    #[instrument(skip_all, fields(run_id = %self.run_id, database = %self.config.database))]
    pub async fn teardown(&self) -> Result<()> {
        let database = self.config.database.as_str();
        let outcome = with_connection(&self.backend, &[], self.deadline, async |connection: &B::Connection| {
            connection.drop_database(database).await?;
            Ok(())
        })
        .await;

        match &outcome {
            Ok(()) => info!("Benchmark database dropped"),
            Err(err) => warn!(error = %err, "Failed to drop benchmark database"),
        }
        outcome.context("Cleanup failed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Fault, ScriptedBackend};
    use std::time::Duration;
    use wirebench_core::config::{Compressor, DocumentShape};
    use wirebench_core::document::TestDocument;
    use wirebench_core::ErrorCode;

    fn payload() -> Payload {
        Payload::from_test_document(&TestDocument::generate(&DocumentShape::tiny())).unwrap()
    }

    fn orchestrator(backend: ScriptedBackend) -> Orchestrator<ScriptedBackend> {
        let config = BenchConfig::default().with_pause(Duration::ZERO);
        Orchestrator::new(backend, config, Deadline::after(Duration::from_secs(5)))
    }

    #[tokio::test]
    async fn test_results_follow_configured_order() {
        let backend = ScriptedBackend::with_storage(&[
            (Compressor::Snappy, 300),
            (Compressor::Zlib, 200),
            (Compressor::Zstd, 100),
        ]);
        let report = orchestrator(backend).run_all(&payload()).await.unwrap();

        let names: Vec<_> = report.results.iter().map(|r| r.algorithm.as_str()).collect();
        assert_eq!(names, vec!["Snappy", "Zlib", "Zstd"]);
        assert_eq!(report.best_compression().map(|(i, _)| i), Some(2));
    }

    #[tokio::test]
    async fn test_each_run_gets_a_fresh_connection() {
        let backend = ScriptedBackend::default();
        orchestrator(backend.clone()).run_all(&payload()).await.unwrap();

        let connects: Vec<_> = backend
            .log()
            .into_iter()
            .filter(|entry| entry.starts_with("connect") || entry.starts_with("close"))
            .collect();
        assert_eq!(
            connects,
            vec![
                "connect snappy",
                "close snappy",
                "connect zlib",
                "close zlib",
                "connect zstd",
                "close zstd",
            ]
        );
    }

    #[tokio::test]
    async fn test_fail_fast_names_the_algorithm() {
        let backend = ScriptedBackend::default().fail(Compressor::Zlib, Fault::Insert);
        let err = orchestrator(backend.clone()).run_all(&payload()).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::WriteError);
        assert_eq!(err.context.as_deref(), Some("Zlib test failed"));
        assert!(!backend.log().iter().any(|entry| entry.contains("zstd")));
    }

    #[tokio::test]
    async fn test_events_bracket_each_run() {
        let backend = ScriptedBackend::default();
        let mut events = Vec::new();

        orchestrator(backend)
            .run_all_with(&payload(), |event| {
                events.push(match event {
                    RunEvent::Started { index, total, algorithm } => {
                        format!("start {}/{} {}", index + 1, total, algorithm.name)
                    }
                    RunEvent::Finished { index, total, result } => {
                        format!("done {}/{} {}", index + 1, total, result.algorithm)
                    }
                });
            })
            .await
            .unwrap();

        assert_eq!(
            events,
            vec![
                "start 1/3 Snappy",
                "done 1/3 Snappy",
                "start 2/3 Zlib",
                "done 2/3 Zlib",
                "start 3/3 Zstd",
                "done 3/3 Zstd",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_only_between_runs() {
        let backend = ScriptedBackend::default();
        let config = BenchConfig::default().with_pause(Duration::from_millis(100));
        let orchestrator = Orchestrator::new(backend, config, Deadline::after(Duration::from_secs(5)));

        let started = tokio::time::Instant::now();
        orchestrator.run_all(&payload()).await.unwrap();

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(200));
        assert!(elapsed < Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_spans_the_whole_benchmark() {
        let backend = ScriptedBackend::default().insert_delay(Duration::from_secs(4));
        let config = BenchConfig::default().with_pause(Duration::ZERO);
        let orchestrator = Orchestrator::new(backend.clone(), config, Deadline::after(Duration::from_secs(10)));

        let err = orchestrator.run_all(&payload()).await.unwrap_err();

        assert!(err.is_timeout());
        assert_eq!(err.context.as_deref(), Some("Zstd test failed"));
        assert_eq!(backend.log().last().map(String::as_str), Some("close zstd"));
    }

    #[tokio::test]
    async fn test_teardown_uses_uncompressed_connection() {
        let backend = ScriptedBackend::default();
        orchestrator(backend.clone()).teardown().await.unwrap();

        assert_eq!(
            backend.log(),
            vec!["connect none", "drop_database compression_demo", "close none"]
        );
    }

    #[test]
    fn test_run_ids_are_unique() {
        let a = orchestrator(ScriptedBackend::default());
        let b = orchestrator(ScriptedBackend::default());
        assert_ne!(a.run_id(), b.run_id());
    }
}
