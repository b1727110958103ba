//! Canonical encoded size of a document

use crate::document::TestDocument;
use crate::error::Result;
use crate::metrics::bytes_to_mb;
use bson::Document;
use tracing::debug;

/// Length of the document's canonical BSON encoding in bytes
pub fn encoded_len(document: &Document) -> Result<u64> {
    let mut buf = Vec::new();
    document.to_writer(&mut buf)?;
    Ok(buf.len() as u64)
}

/// A document ready to be inserted, together with its baseline size
///
/// Built once per benchmark and shared read-only by every run.
#[derive(Debug, Clone)]
pub struct Payload {
    document: Document,
    original_size: u64,
}

impl Payload {
    /// Probe the size of an already encoded document
    pub fn new(document: Document) -> Result<Self> {
        let original_size = encoded_len(&document)?;
        debug!(original_size, "Probed payload size");
        Ok(Self {
            document,
            original_size,
        })
    }

    /// Encode a synthetic document and probe its size
    pub fn from_test_document(document: &TestDocument) -> Result<Self> {
        Self::new(document.to_bson()?)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Encoded size in bytes
    pub fn original_size(&self) -> u64 {
        self.original_size
    }

    pub fn original_size_mb(&self) -> f64 {
        bytes_to_mb(self.original_size)
    }
}
