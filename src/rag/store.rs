//! DocumentStore trait — abstract interface for the retrieval backend.
//!
//! The primary implementation is `SqliteDocStore` in the `sqlite` module.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::errors::EngineError;

/// A stored document with metadata. Immutable once written; re-indexing the
/// same text appends a new record rather than replacing this one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDocument {
    /// Unique document identifier.
    pub doc_id: String,
    /// The raw text content.
    pub content: String,
    /// Optional metadata (JSON object).
    pub metadata: Option<Value>,
}

impl StoredDocument {
    pub fn new(content: String, metadata: Option<Value>) -> Self {
        Self {
            doc_id: uuid::Uuid::new_v4().to_string(),
            content,
            metadata,
        }
    }
}

/// Result of a similarity search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSearchResult {
    pub document: StoredDocument,
    /// Cosine similarity score (higher = better).
    pub score: f32,
}

/// Abstract trait for retrieval backends.
///
/// Implementations must make batch inserts atomic: a concurrent search may
/// see the corpus before or after a batch, never in between.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert documents with their embedding vectors in one logical batch.
    async fn insert_batch(
        &self,
        items: Vec<(StoredDocument, Vec<f32>)>,
    ) -> Result<(), EngineError>;

    /// Total number of stored documents.
    async fn count(&self) -> Result<usize, EngineError>;

    /// Documents most similar to the query embedding, best first.
    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<DocumentSearchResult>, EngineError>;
}
