//! MongoDB implementation of the backend contract

use crate::backend::{Backend, CollectionStats, Connection};
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::error::ErrorKind;
use mongodb::options::{ClientOptions, Compressor as DriverCompressor};
use mongodb::Client;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use wirebench_core::config::Compressor;

/// Server error code for "ns not found"
const NAMESPACE_NOT_FOUND: i32 = 26;

/// Opens one driver client per connection request
///
/// The driver pools sockets inside a `Client`, so isolation between
/// compressors needs a brand new client each time.
#[derive(Clone)]
pub struct MongoBackend {
    config: Arc<StoreConfig>,
}

impl MongoBackend {
    /// Create a backend with configuration from the environment
    pub fn new() -> StoreResult<Self> {
        Self::with_config(StoreConfig::from_env())
    }

    /// Create a backend with specific configuration
    pub fn with_config(config: StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    async fn client_options(&self, compressors: &[Compressor]) -> StoreResult<ClientOptions> {
        let mut options = ClientOptions::parse(self.config.uri.as_str())
            .await
            .map_err(StoreError::connection)?;

        options.app_name = Some(self.config.app_name.clone());
        options.connect_timeout = Some(self.config.connect_timeout);
        options.server_selection_timeout = Some(self.config.server_selection_timeout);
        options.compressors = if compressors.is_empty() {
            None
        } else {
            Some(compressors.iter().copied().map(driver_compressor).collect())
        };

        Ok(options)
    }
}

#[async_trait]
impl Backend for MongoBackend {
    type Connection = MongoConnection;

    #[instrument(skip(self), fields(uri = %self.config.redacted_uri()))]
    async fn connect(&self, compressors: &[Compressor]) -> StoreResult<MongoConnection> {
        let options = self.client_options(compressors).await?;
        let client = Client::with_options(options).map_err(StoreError::connection)?;

        // The driver connects lazily; ping so an unreachable server fails here
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(StoreError::connection)?;

        debug!("Connected");
        Ok(MongoConnection { client })
    }
}

/// A single driver client restricted to the negotiated compressors
pub struct MongoConnection {
    client: Client,
}

#[async_trait]
impl Connection for MongoConnection {
    #[instrument(skip(self))]
    async fn drop_collection(&self, database: &str, collection: &str) -> StoreResult<()> {
        let result = self
            .client
            .database(database)
            .collection::<Document>(collection)
            .drop()
            .await;

        match result {
            Ok(()) => Ok(()),
            Err(err) if is_namespace_not_found(&err) => {
                debug!("Collection did not exist");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Drop failed");
                Err(StoreError::drop_failed(err))
            }
        }
    }

    #[instrument(skip(self, document))]
    async fn insert_one(&self, database: &str, collection: &str, document: &Document) -> StoreResult<()> {
        self.client
            .database(database)
            .collection::<Document>(collection)
            .insert_one(document)
            .await
            .map(|_| ())
            .map_err(StoreError::write)
    }

    #[instrument(skip(self))]
    async fn collection_stats(&self, database: &str, collection: &str) -> StoreResult<CollectionStats> {
        let reply = self
            .client
            .database(database)
            .run_command(doc! { "collStats": collection })
            .await
            .map_err(StoreError::stats)?;

        CollectionStats::from_document(&reply)
    }

    #[instrument(skip(self))]
    async fn drop_database(&self, database: &str) -> StoreResult<()> {
        self.client
            .database(database)
            .drop()
            .await
            .map_err(StoreError::drop_failed)
    }

    async fn close(self) {
        self.client.shutdown().await;
        debug!("Connection closed");
    }
}

/// Map a benchmark compressor onto the driver's, at the driver's default level
fn driver_compressor(compressor: Compressor) -> DriverCompressor {
    match compressor {
        Compressor::Snappy => DriverCompressor::Snappy,
        Compressor::Zlib => DriverCompressor::Zlib { level: None },
        Compressor::Zstd => DriverCompressor::Zstd { level: None },
    }
}

fn is_namespace_not_found(err: &mongodb::error::Error) -> bool {
    matches!(err.kind.as_ref(), ErrorKind::Command(command) if command.code == NAMESPACE_NOT_FOUND)
}
