//! The retrieval-augmented answering engine.
//!
//! Owns conversation state, decides grounded-vs-direct mode fresh on every
//! call, and degrades to direct answering whenever the retrieval side is
//! unavailable or fails mid-request. Only a direct-mode generation failure
//! surfaces to the caller.

use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use super::conversation::{Conversations, Role, Turn};
use crate::core::config::Settings;
use crate::core::errors::EngineError;
use crate::llm::{Embedder, GroqProvider, HttpEmbedder, TextGenerator};
use crate::rag::prompt::{compose_prompt, source_preview, TOP_K};
use crate::rag::{DocumentStore, Indexer, SqliteDocStore};

/// Outcome of one chat call.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub answer: String,
    pub conversation_id: String,
    /// Previews of the retrieved documents; empty in direct mode.
    pub sources: Vec<String>,
}

pub struct ChatEngine {
    generator: Arc<dyn TextGenerator>,
    embedder: Arc<dyn Embedder>,
    store: Option<Arc<dyn DocumentStore>>,
    indexer: Option<Indexer>,
    conversations: Conversations,
}

impl std::fmt::Debug for ChatEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatEngine")
            .field("generator", &self.generator.name())
            .field("grounded", &self.store.is_some())
            .finish_non_exhaustive()
    }
}

impl ChatEngine {
    /// Build the engine from runtime settings.
    ///
    /// A missing API key is fatal: the engine is not constructed and the
    /// chat routes stay unavailable until restart. A store that fails to
    /// open only disables indexing and grounded answering.
    pub async fn from_settings(settings: &Settings) -> Result<Self, EngineError> {
        let api_key = settings
            .groq_api_key
            .clone()
            .ok_or_else(|| EngineError::Config("GROQ_API_KEY not found in environment".to_string()))?;

        let generator = Arc::new(GroqProvider::new(
            settings.groq_base_url.clone(),
            api_key,
            settings.groq_model.clone(),
            settings.temperature,
            settings.request_timeout_secs,
        )?);

        let embedder = Arc::new(HttpEmbedder::new(
            settings.embeddings_base_url.clone(),
            settings.embeddings_model.clone(),
            settings.request_timeout_secs,
        )?);

        let store: Option<Arc<dyn DocumentStore>> =
            match SqliteDocStore::open(settings.rag_db_path()).await {
                Ok(store) => Some(Arc::new(store)),
                Err(err) => {
                    tracing::warn!(
                        "could not open document store: {}; answering in direct mode only",
                        err
                    );
                    None
                }
            };

        Ok(Self::with_parts(generator, embedder, store))
    }

    /// Assemble an engine from explicit capabilities. Also the seam the
    /// tests use to substitute providers.
    pub fn with_parts(
        generator: Arc<dyn TextGenerator>,
        embedder: Arc<dyn Embedder>,
        store: Option<Arc<dyn DocumentStore>>,
    ) -> Self {
        let indexer = store
            .clone()
            .map(|store| Indexer::new(store, embedder.clone()));

        Self {
            generator,
            embedder,
            store,
            indexer,
            conversations: Conversations::new(),
        }
    }

    /// Run the indexing pipeline. Fails with `StoreUnavailable` when the
    /// store never came up; indexing zero documents is a successful no-op.
    pub async fn index_documents(
        &self,
        documents: Vec<String>,
        metadatas: Option<Vec<Value>>,
    ) -> Result<usize, EngineError> {
        match &self.indexer {
            Some(indexer) => indexer.index(documents, metadatas).await,
            None => Err(EngineError::StoreUnavailable(
                "document store was not initialized; indexing is disabled".to_string(),
            )),
        }
    }

    /// Answer one user message within a conversation.
    pub async fn chat(
        &self,
        message: &str,
        conversation_id: Option<String>,
    ) -> Result<ChatReply, EngineError> {
        let conversation_id = conversation_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        self.conversations
            .append(&conversation_id, Turn::new(Role::User, message.to_string()))
            .await;

        // Mode is decided fresh per call: the corpus may have grown since
        // the last turn of this conversation.
        let (answer, sources) = if self.retrieval_ready().await {
            match self.answer_grounded(message).await {
                Ok(result) => result,
                Err(err) => {
                    tracing::warn!(
                        "grounded answering failed ({}); falling back to direct mode",
                        err
                    );
                    (self.generator.generate(message).await?, Vec::new())
                }
            }
        } else {
            (self.generator.generate(message).await?, Vec::new())
        };

        self.conversations
            .append(
                &conversation_id,
                Turn::new(Role::Assistant, answer.clone()),
            )
            .await;

        Ok(ChatReply {
            answer,
            conversation_id,
            sources,
        })
    }

    /// Ordered turn sequence for a conversation; empty for unknown ids.
    pub async fn history(&self, conversation_id: &str) -> Vec<Turn> {
        self.conversations.history(conversation_id).await
    }

    async fn retrieval_ready(&self) -> bool {
        let Some(store) = &self.store else {
            return false;
        };
        match store.count().await {
            Ok(count) => count > 0,
            Err(err) => {
                tracing::warn!("readiness check failed ({}); answering in direct mode", err);
                false
            }
        }
    }

    async fn answer_grounded(&self, message: &str) -> Result<(String, Vec<String>), EngineError> {
        let store = self.store.as_ref().ok_or_else(|| {
            EngineError::Retrieval("document store not configured".to_string())
        })?;

        let query = [message.to_string()];
        let query_embedding = self
            .embedder
            .embed(&query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                EngineError::Retrieval("embedder returned no vector for the query".to_string())
            })?;

        let hits = store.search(&query_embedding, TOP_K).await?;
        if hits.is_empty() {
            return Ok((self.generator.generate(message).await?, Vec::new()));
        }

        let contexts: Vec<String> = hits.iter().map(|h| h.document.content.clone()).collect();
        let prompt = compose_prompt(&contexts, message);
        let answer = self.generator.generate(&prompt).await?;
        let sources = hits
            .iter()
            .map(|h| source_preview(&h.document.content))
            .collect();

        Ok((answer, sources))
    }
}
