pub mod embeddings;
pub mod groq;
pub mod provider;

pub use embeddings::HttpEmbedder;
pub use groq::GroqProvider;
pub use provider::{Embedder, TextGenerator};
