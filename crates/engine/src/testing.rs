//! Scripted in-memory backend for engine tests

use async_trait::async_trait;
use mongodb::bson::Document;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wirebench_core::config::Compressor;
use wirebench_store::{Backend, CollectionStats, Connection, StoreError, StoreResult};

/// Which step should misbehave, and for which compressor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Connect,
    Drop,
    Insert,
    Stats,
    HangInsert,
}

#[derive(Clone, Default)]
pub struct ScriptedBackend {
    storage: HashMap<Compressor, u64>,
    faults: HashMap<Compressor, Fault>,
    insert_delay: Duration,
    log: Arc<Mutex<Vec<String>>>,
}

impl ScriptedBackend {
    /// Reports `storage` bytes per compressor; unscripted compressors report half the payload
    pub fn with_storage(storage: &[(Compressor, u64)]) -> Self {
        Self {
            storage: storage.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn fail(mut self, compressor: Compressor, fault: Fault) -> Self {
        self.faults.insert(compressor, fault);
        self
    }

    pub fn insert_delay(mut self, delay: Duration) -> Self {
        self.insert_delay = delay;
        self
    }

    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn record(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }
}

fn label(compressors: &[Compressor]) -> String {
    if compressors.is_empty() {
        "none".to_string()
    } else {
        compressors.iter().map(Compressor::id).collect::<Vec<_>>().join(",")
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    type Connection = ScriptedConnection;

    async fn connect(&self, compressors: &[Compressor]) -> StoreResult<ScriptedConnection> {
        self.record(format!("connect {}", label(compressors)));

        let compressor = compressors.first().copied();
        if compressor.and_then(|c| self.faults.get(&c)) == Some(&Fault::Connect) {
            return Err(StoreError::connection("connection refused"));
        }

        Ok(ScriptedConnection {
            backend: self.clone(),
            compressor,
            sizes: Mutex::new(HashMap::new()),
        })
    }
}

pub struct ScriptedConnection {
    backend: ScriptedBackend,
    compressor: Option<Compressor>,
    sizes: Mutex<HashMap<String, u64>>,
}

impl ScriptedConnection {
    fn fault(&self) -> Option<Fault> {
        self.compressor.and_then(|c| self.backend.faults.get(&c).copied())
    }
}

#[async_trait]
impl Connection for ScriptedConnection {
    async fn drop_collection(&self, _database: &str, collection: &str) -> StoreResult<()> {
        self.backend.record(format!("drop {}", collection));
        if self.fault() == Some(Fault::Drop) {
            return Err(StoreError::drop_failed("not authorized"));
        }
        self.sizes.lock().unwrap().remove(collection);
        Ok(())
    }

    async fn insert_one(&self, _database: &str, collection: &str, document: &Document) -> StoreResult<()> {
        self.backend.record(format!("insert {}", collection));
        match self.fault() {
            Some(Fault::Insert) => return Err(StoreError::write("document too large")),
            Some(Fault::HangInsert) => tokio::time::sleep(Duration::from_secs(60)).await,
            _ => {}
        }
        if !self.backend.insert_delay.is_zero() {
            tokio::time::sleep(self.backend.insert_delay).await;
        }

        let mut encoded = Vec::new();
        document.to_writer(&mut encoded).map_err(StoreError::write)?;

        let storage = self
            .compressor
            .and_then(|c| self.backend.storage.get(&c).copied())
            .unwrap_or(encoded.len() as u64 / 2);
        self.sizes.lock().unwrap().insert(collection.to_string(), storage);
        Ok(())
    }

    async fn collection_stats(&self, _database: &str, collection: &str) -> StoreResult<CollectionStats> {
        self.backend.record(format!("stats {}", collection));
        if self.fault() == Some(Fault::Stats) {
            return Err(StoreError::stats("reply has no storageSize field"));
        }
        let storage_size = self.sizes.lock().unwrap().get(collection).copied().unwrap_or(0);
        Ok(CollectionStats {
            storage_size,
            size: 0,
            count: u64::from(storage_size > 0),
        })
    }

    async fn drop_database(&self, database: &str) -> StoreResult<()> {
        self.backend.record(format!("drop_database {}", database));
        Ok(())
    }

    async fn close(self) {
        self.backend.record(format!("close {}", label(self.compressor.as_slice())));
    }
}
