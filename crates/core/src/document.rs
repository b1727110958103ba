//! Synthetic test document
//!
//! The document mixes three content classes so that reduction percentages
//! land somewhere meaningful instead of at 0% or 100%:
//!
//! - one sentence repeated tens of thousands of times (compresses extremely well)
//! - thousands of structurally identical product records (compresses well)
//! - a block of seeded pseudo-random bytes (barely compresses)
//!
//! Only `_id` and `timestamp` differ between two documents generated from the
//! same [`DocumentShape`]; both are fixed width, so the encoded size does not
//! move between invocations.

use crate::config::DocumentShape;
use crate::error::Result;
use bson::oid::ObjectId;
use bson::spec::BinarySubtype;
use bson::{Binary, DateTime, Document};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;

const REPEATED_SENTENCE: &str = "This is highly compressible repetitive text pattern. ";

const ITEM_DESCRIPTION: &str =
    "This is a repeated item description that compresses efficiently with wire compression algorithms";

const ITEM_TAGS: &[&str] = &["electronics", "home", "kitchen", "premium"];
const ITEM_CATEGORIES: &[&str] = &["main", "featured", "bestseller"];
const ITEM_FEATURES: &[&str] = &["wireless", "bluetooth", "rechargeable", "smart"];
const REVIEW_STARS: [i32; 5] = [100, 200, 300, 250, 150];

/// Version tag stored in every generated document
pub const DOCUMENT_VERSION: &str = "1.0";

/// The payload persisted once per algorithm
#[derive(Debug, Clone, Serialize)]
pub struct TestDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub description: String,
    pub timestamp: DateTime,
    pub version: String,
    pub repetitive_text: String,
    pub product_items: Vec<ProductItem>,
    pub binary_data: Binary,
    pub metadata: DocumentMetadata,
}

/// One near-duplicate product record
#[derive(Debug, Clone, Serialize)]
pub struct ProductItem {
    pub id: i64,
    pub name: String,
    pub description: &'static str,
    pub price: f64,
    pub metadata: ItemMetadata,
    pub reviews: ReviewSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemMetadata {
    pub tags: &'static [&'static str],
    pub categories: &'static [&'static str],
    pub features: &'static [&'static str],
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewSummary {
    pub average_rating: f64,
    pub total_reviews: i32,
    pub stars: [i32; 5],
}

/// Descriptive flags attached to the document
#[derive(Debug, Clone, Serialize)]
pub struct DocumentMetadata {
    pub created_by: &'static str,
    pub document_type: &'static str,
    pub size_category: &'static str,
    pub compression_test: bool,
}

impl TestDocument {
    /// Build a document with the given composition
    pub fn generate(shape: &DocumentShape) -> Self {
        let product_items = (0..shape.item_count).map(ProductItem::numbered).collect();

        Self {
            id: ObjectId::new(),
            description: "Large synthetic document for wire compression testing".to_string(),
            timestamp: DateTime::now(),
            version: DOCUMENT_VERSION.to_string(),
            repetitive_text: REPEATED_SENTENCE.repeat(shape.text_repeat),
            product_items,
            binary_data: Binary {
                subtype: BinarySubtype::Generic,
                bytes: pseudo_random_bytes(shape.binary_len, shape.binary_seed),
            },
            metadata: DocumentMetadata {
                created_by: "wirebench",
                document_type: "performance_test",
                size_category: "multi-megabyte",
                compression_test: true,
            },
        }
    }

    /// Convert into the backend's native document form
    pub fn to_bson(&self) -> Result<Document> {
        Ok(bson::to_document(self)?)
    }
}

impl ProductItem {
    fn numbered(index: usize) -> Self {
        Self {
            id: index as i64,
            name: format!("Product_Item_Number_{}", index),
            description: ITEM_DESCRIPTION,
            price: index as f64 * 1.99,
            metadata: ItemMetadata {
                tags: ITEM_TAGS,
                categories: ITEM_CATEGORIES,
                features: ITEM_FEATURES,
            },
            reviews: ReviewSummary {
                average_rating: 4.5,
                total_reviews: 150,
                stars: REVIEW_STARS,
            },
        }
    }
}

/// Near-uniform bytes from a seeded generator
fn pseudo_random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    StdRng::seed_from_u64(seed).fill_bytes(&mut bytes);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::size::encoded_len;

    #[test]
    fn test_shape_is_respected() {
        let shape = DocumentShape::tiny();
        let doc = TestDocument::generate(&shape);

        assert_eq!(doc.product_items.len(), shape.item_count);
        assert_eq!(doc.binary_data.bytes.len(), shape.binary_len);
        assert_eq!(doc.repetitive_text.len(), REPEATED_SENTENCE.len() * shape.text_repeat);
        assert_eq!(doc.product_items[3].name, "Product_Item_Number_3");
        assert!((doc.product_items[3].price - 5.97).abs() < 1e-9);
    }

    #[test]
    fn test_bson_field_order() {
        let doc = TestDocument::generate(&DocumentShape::tiny()).to_bson().unwrap();
        let keys: Vec<_> = doc.keys().map(String::as_str).collect();

        assert_eq!(
            keys,
            [
                "_id",
                "description",
                "timestamp",
                "version",
                "repetitive_text",
                "product_items",
                "binary_data",
                "metadata",
            ]
        );
        assert!(doc.get_object_id("_id").is_ok());
        assert!(doc.get_datetime("timestamp").is_ok());
        assert!(doc.get_binary_generic("binary_data").is_ok());
        assert_eq!(doc.get_array("product_items").unwrap().len(), 5);
    }

    #[test]
    fn test_encoded_size_is_stable() {
        let shape = DocumentShape {
            text_repeat: 500,
            item_count: 50,
            binary_len: 4096,
            ..DocumentShape::default()
        };

        let first = encoded_len(&TestDocument::generate(&shape).to_bson().unwrap()).unwrap();
        let second = encoded_len(&TestDocument::generate(&shape).to_bson().unwrap()).unwrap();

        assert!(first.abs_diff(second) <= 32, "{} vs {}", first, second);
    }

    #[test]
    fn test_binary_block_is_seeded() {
        let shape = DocumentShape::tiny();
        let a = TestDocument::generate(&shape);
        let b = TestDocument::generate(&shape);
        assert_eq!(a.binary_data.bytes, b.binary_data.bytes);
        assert_ne!(a.id, b.id);

        let reseeded = DocumentShape {
            binary_seed: 7,
            ..shape
        };
        let c = TestDocument::generate(&reseeded);
        assert_ne!(a.binary_data.bytes, c.binary_data.bytes);
    }

    #[test]
    fn test_binary_block_is_not_trivially_repetitive() {
        let bytes = pseudo_random_bytes(4096, 1);
        let mut seen = [false; 256];
        for b in &bytes {
            seen[*b as usize] = true;
        }
        assert!(seen.iter().filter(|s| **s).count() > 200);
    }
}
