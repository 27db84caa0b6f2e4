use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::chat::ChatEngine;
use crate::core::config::Settings;
use crate::core::errors::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    /// None when engine construction failed at startup; the chat routes
    /// answer 503 until the process is restarted with valid configuration.
    pub chat: Option<Arc<ChatEngine>>,
    #[allow(dead_code)]
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Build the shared state. Engine construction failure is logged and
    /// degrades the chat routes; it never prevents the server from starting.
    pub async fn initialize(settings: Settings) -> Arc<Self> {
        let chat = match ChatEngine::from_settings(&settings).await {
            Ok(engine) => {
                tracing::info!("chat engine initialized");
                Some(Arc::new(engine))
            }
            Err(err) => {
                tracing::warn!(
                    "chat engine initialization failed: {}; chat endpoints will be unavailable",
                    err
                );
                None
            }
        };

        Arc::new(AppState {
            settings,
            chat,
            started_at: Utc::now(),
        })
    }

    /// Assemble state from parts, used by the integration tests.
    pub fn with_engine(settings: Settings, chat: Option<Arc<ChatEngine>>) -> Arc<Self> {
        Arc::new(AppState {
            settings,
            chat,
            started_at: Utc::now(),
        })
    }

    pub fn engine(&self) -> Result<&Arc<ChatEngine>, ApiError> {
        self.chat.as_ref().ok_or_else(|| {
            ApiError::ServiceUnavailable(
                "chat engine is not initialized; check your GROQ_API_KEY and configuration"
                    .to_string(),
            )
        })
    }
}
