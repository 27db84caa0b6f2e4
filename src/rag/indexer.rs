//! Indexing pipeline: raw texts + optional metadata in, embedded document
//! rows in the store out.

use std::sync::Arc;

use serde_json::Value;

use super::store::{DocumentStore, StoredDocument};
use crate::core::errors::EngineError;
use crate::llm::Embedder;

pub struct Indexer {
    store: Arc<dyn DocumentStore>,
    embedder: Arc<dyn Embedder>,
}

impl Indexer {
    pub fn new(store: Arc<dyn DocumentStore>, embedder: Arc<dyn Embedder>) -> Self {
        Self { store, embedder }
    }

    /// Embed and store a batch of documents. Metadata is matched to
    /// documents by position; missing entries become empty objects.
    ///
    /// Indexing zero documents is a successful no-op. Returns the number of
    /// documents written; the store count reflects them as soon as this
    /// returns.
    pub async fn index(
        &self,
        documents: Vec<String>,
        metadatas: Option<Vec<Value>>,
    ) -> Result<usize, EngineError> {
        if documents.is_empty() {
            return Ok(0);
        }

        let embeddings = self.embedder.embed(&documents).await?;
        if embeddings.len() != documents.len() {
            return Err(EngineError::Retrieval(format!(
                "embedder returned {} vectors for {} documents",
                embeddings.len(),
                documents.len()
            )));
        }

        let items: Vec<(StoredDocument, Vec<f32>)> = documents
            .into_iter()
            .enumerate()
            .zip(embeddings)
            .map(|((i, content), embedding)| {
                let metadata = metadatas
                    .as_ref()
                    .and_then(|m| m.get(i).cloned())
                    .unwrap_or_else(|| Value::Object(Default::default()));
                (StoredDocument::new(content, Some(metadata)), embedding)
            })
            .collect();

        let written = items.len();
        self.store.insert_batch(items).await?;

        tracing::info!("indexed {} documents", written);
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::rag::sqlite::SqliteDocStore;

    struct FixedEmbedder;

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EngineError> {
            Ok(inputs
                .iter()
                .map(|text| vec![text.len() as f32, 1.0])
                .collect())
        }
    }

    /// Misbehaving embedder that drops the last vector.
    struct ShortEmbedder;

    #[async_trait]
    impl Embedder for ShortEmbedder {
        async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EngineError> {
            Ok(inputs
                .iter()
                .take(inputs.len().saturating_sub(1))
                .map(|_| vec![1.0, 0.0])
                .collect())
        }
    }

    async fn indexer_with_store() -> (tempfile::TempDir, Indexer, Arc<dyn DocumentStore>) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store: Arc<dyn DocumentStore> = Arc::new(
            SqliteDocStore::open(dir.path().join("rag.db"))
                .await
                .expect("open store"),
        );
        let indexer = Indexer::new(store.clone(), Arc::new(FixedEmbedder));
        (dir, indexer, store)
    }

    #[tokio::test]
    async fn empty_input_is_a_noop() {
        let (_dir, indexer, store) = indexer_with_store().await;
        let written = indexer.index(Vec::new(), None).await.unwrap();
        assert_eq!(written, 0);
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn count_reflects_batch_immediately() {
        let (_dir, indexer, store) = indexer_with_store().await;
        let written = indexer
            .index(vec!["a".to_string(), "bb".to_string()], None)
            .await
            .unwrap();
        assert_eq!(written, 2);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn embedding_count_mismatch_fails_without_writing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store: Arc<dyn DocumentStore> = Arc::new(
            SqliteDocStore::open(dir.path().join("rag.db"))
                .await
                .expect("open store"),
        );
        let indexer = Indexer::new(store.clone(), Arc::new(ShortEmbedder));

        let err = indexer
            .index(vec!["a".to_string(), "b".to_string()], None)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Retrieval(_)));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn metadata_is_matched_by_position() {
        let (_dir, indexer, store) = indexer_with_store().await;
        indexer
            .index(
                vec!["with meta".to_string(), "without meta".to_string()],
                Some(vec![json!({"source": "notes"})]),
            )
            .await
            .unwrap();

        let hits = store.search(&[9.0, 1.0], 2).await.unwrap();
        let with_meta = hits
            .iter()
            .find(|h| h.document.content == "with meta")
            .unwrap();
        let without_meta = hits
            .iter()
            .find(|h| h.document.content == "without meta")
            .unwrap();

        assert_eq!(
            with_meta.document.metadata.as_ref().unwrap()["source"],
            "notes"
        );
        assert_eq!(
            without_meta.document.metadata.as_ref().unwrap(),
            &json!({})
        );
    }
}
