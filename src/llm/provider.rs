use async_trait::async_trait;

use crate::core::errors::EngineError;

/// Generative capability. Stateless: all context must be in the prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// return the provider name (e.g. "groq")
    fn name(&self) -> &str;

    /// single-shot completion for the given prompt
    async fn generate(&self, prompt: &str) -> Result<String, EngineError>;
}

/// Embedding capability: maps each input text to a fixed-length vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EngineError>;
}
