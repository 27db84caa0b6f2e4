pub mod chat;
pub mod core;
pub mod gpa;
pub mod llm;
pub mod rag;
pub mod server;
pub mod state;
