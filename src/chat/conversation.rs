//! In-memory conversation state.
//!
//! One mutex per conversation id: appends for the same conversation are
//! serialized, different conversations never contend. State lives for the
//! process lifetime only.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in a conversation. Append-only, never edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn new(role: Role, content: String) -> Self {
        Self {
            role,
            content,
            timestamp: Utc::now(),
        }
    }
}

type TurnLog = Arc<Mutex<Vec<Turn>>>;

#[derive(Default)]
pub struct Conversations {
    inner: RwLock<HashMap<String, TurnLog>>,
}

impl Conversations {
    pub fn new() -> Self {
        Self::default()
    }

    /// The turn log for `id`, created empty on first reference.
    pub async fn log_for(&self, id: &str) -> TurnLog {
        if let Some(log) = self.inner.read().await.get(id) {
            return log.clone();
        }

        let mut map = self.inner.write().await;
        map.entry(id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(Vec::new())))
            .clone()
    }

    pub async fn append(&self, id: &str, turn: Turn) {
        let log = self.log_for(id).await;
        log.lock().await.push(turn);
    }

    /// Snapshot of the turn sequence. Empty for unknown ids; a lookup never
    /// creates a conversation.
    pub async fn history(&self, id: &str) -> Vec<Turn> {
        let log = match self.inner.read().await.get(id) {
            Some(log) => log.clone(),
            None => return Vec::new(),
        };
        let snapshot = log.lock().await.clone();
        snapshot
    }
}
