//! Backend collaborator contract
//!
//! The engine only ever sees these two traits. A [`Backend`] hands out fresh
//! connections, each negotiating the compressors it was asked for; the
//! compressor is a session-level setting, so connections are never shared
//! between measurements.

use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
use serde::Serialize;
use wirebench_core::config::Compressor;

/// Something that can open compressor-restricted sessions
#[async_trait]
pub trait Backend: Send + Sync {
    /// Session type handed out by [`Backend::connect`]
    type Connection: Connection;

    /// Open a session negotiating exactly `compressors` (none when empty)
    async fn connect(&self, compressors: &[Compressor]) -> StoreResult<Self::Connection>;
}

/// One open session against the backend
#[async_trait]
pub trait Connection: Send + Sync {
    /// Drop a collection; a missing collection is not an error
    async fn drop_collection(&self, database: &str, collection: &str) -> StoreResult<()>;

    /// Insert a single document
    async fn insert_one(&self, database: &str, collection: &str, document: &Document) -> StoreResult<()>;

    /// Backend-reported storage statistics for a collection
    async fn collection_stats(&self, database: &str, collection: &str) -> StoreResult<CollectionStats>;

    /// Drop a whole database
    async fn drop_database(&self, database: &str) -> StoreResult<()>;

    /// Release the session
    async fn close(self);
}

/// Subset of the `collStats` reply the benchmark relies on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CollectionStats {
    /// Bytes allocated on disk, after compression
    pub storage_size: u64,
    /// Uncompressed data size
    pub size: u64,
    /// Number of documents
    pub count: u64,
}

impl CollectionStats {
    /// Parse a `collStats` reply
    ///
    /// `storageSize` is mandatory; `size` and `count` default to zero.
    pub fn from_document(reply: &Document) -> StoreResult<Self> {
        let storage_size = match reply.get("storageSize") {
            Some(value) => non_negative(value).ok_or_else(|| {
                StoreError::stats(format!("storageSize has unexpected value {value}"))
            })?,
            None => return Err(StoreError::stats("reply has no storageSize field")),
        };

        Ok(Self {
            storage_size,
            size: reply.get("size").and_then(non_negative).unwrap_or(0),
            count: reply.get("count").and_then(non_negative).unwrap_or(0),
        })
    }
}

/// Numeric field as an unsigned byte count; the server picks the width
fn non_negative(value: &Bson) -> Option<u64> {
    match value {
        Bson::Int32(v) => u64::try_from(*v).ok(),
        Bson::Int64(v) => u64::try_from(*v).ok(),
        Bson::Double(v) if v.is_finite() && *v >= 0.0 => Some(*v as u64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_stats_accept_any_integer_width() {
        let int32 = CollectionStats::from_document(&doc! { "storageSize": 4096_i32 }).unwrap();
        let int64 = CollectionStats::from_document(&doc! { "storageSize": 2_209_000_i64 }).unwrap();
        let double = CollectionStats::from_document(&doc! { "storageSize": 8192.0 }).unwrap();

        assert_eq!(int32.storage_size, 4096);
        assert_eq!(int64.storage_size, 2_209_000);
        assert_eq!(double.storage_size, 8192);
    }

    #[test]
    fn test_stats_optional_fields() {
        let stats = CollectionStats::from_document(&doc! {
            "ns": "compression_demo.test_zstd",
            "size": 4_700_000_i64,
            "count": 1_i32,
            "storageSize": 2_209_000_i64,
            "ok": 1.0,
        })
        .unwrap();

        assert_eq!(
            stats,
            CollectionStats {
                storage_size: 2_209_000,
                size: 4_700_000,
                count: 1,
            }
        );
    }

    #[test]
    fn test_stats_missing_storage_size() {
        let err = CollectionStats::from_document(&doc! { "ok": 1.0 }).unwrap_err();
        assert!(matches!(err, StoreError::Stats(_)));
    }

    #[test]
    fn test_stats_unexpected_shape() {
        for reply in [
            doc! { "storageSize": "large" },
            doc! { "storageSize": -1_i64 },
            doc! { "storageSize": f64::NAN },
        ] {
            assert!(matches!(
                CollectionStats::from_document(&reply),
                Err(StoreError::Stats(_))
            ));
        }
    }
}
