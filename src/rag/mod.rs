//! Retrieval side of the answering engine.
//!
//! This module provides:
//! - `DocumentStore`: the storage/similarity-search capability
//! - `SqliteDocStore`: the in-process SQLite implementation
//! - `Indexer`: the embed-and-store pipeline
//! - prompt composition for grounded answers

pub mod indexer;
pub mod prompt;
pub mod sqlite;
pub mod store;

pub use indexer::Indexer;
pub use sqlite::SqliteDocStore;
pub use store::{DocumentSearchResult, DocumentStore, StoredDocument};
