//! Per-algorithm run driver

use crate::deadline::Deadline;
use std::time::Instant;
use tracing::{debug, instrument};
use wirebench_core::config::{AlgorithmSpec, Compressor};
use wirebench_core::metrics::RunResult;
use wirebench_core::size::Payload;
use wirebench_core::{Error, Result};
use wirebench_store::{Backend, Connection};

/// Open a connection, hand it to `body` and close it again
///
/// Both the connect and the body run under `deadline`. The connection is
/// closed on every path once it has been opened, including a failing body
/// and deadline expiry; the body's outcome is returned after the close.
pub async fn with_connection<B, T, F>(
    backend: &B,
    compressors: &[Compressor],
    deadline: Deadline,
    body: F,
) -> Result<T>
where
    B: Backend,
    F: AsyncFnOnce(&B::Connection) -> Result<T>,
{
    let connection = deadline
        .run(async { backend.connect(compressors).await.map_err(Error::from) })
        .await?;

    let outcome = deadline.run(body(&connection)).await;
    connection.close().await;
    outcome
}

/// Measures one algorithm against the backend
pub struct RunDriver<'a, B: Backend> {
    backend: &'a B,
    database: &'a str,
    deadline: Deadline,
}

impl<'a, B: Backend> RunDriver<'a, B> {
    pub fn new(backend: &'a B, database: &'a str, deadline: Deadline) -> Self {
        Self {
            backend,
            database,
            deadline,
        }
    }

    /// Insert the payload over a connection restricted to the algorithm's
    /// compressor and derive the run's metrics from the reported storage size
    #[instrument(skip(self, payload), fields(algorithm = %algorithm.name))]
    pub async fn run(&self, algorithm: &AlgorithmSpec, payload: &Payload) -> Result<RunResult> {
        with_connection(
            self.backend,
            &[algorithm.compressor],
            self.deadline,
            async |connection: &B::Connection| self.measure(connection, algorithm, payload).await,
        )
        .await
    }

    async fn measure(
        &self,
        connection: &B::Connection,
        algorithm: &AlgorithmSpec,
        payload: &Payload,
    ) -> Result<RunResult> {
        let collection = algorithm.collection_name();

        connection.drop_collection(self.database, &collection).await?;

        let started = Instant::now();
        connection
            .insert_one(self.database, &collection, payload.document())
            .await?;
        let insert_time = started.elapsed();

        let stats = connection.collection_stats(self.database, &collection).await?;
        debug!(
            collection = %collection,
            storage_size = stats.storage_size,
            insert_ms = insert_time.as_millis() as u64,
            "Run measured"
        );

        RunResult::new(algorithm, payload.original_size(), stats.storage_size, insert_time)
    }
}
