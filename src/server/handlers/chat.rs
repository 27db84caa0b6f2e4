use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::core::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub conversation_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub conversation_id: String,
    pub sources: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct IndexDocumentsRequest {
    pub documents: Vec<String>,
    pub metadatas: Option<Vec<Value>>,
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let engine = state.engine()?;

    if payload.message.trim().is_empty() {
        return Err(ApiError::BadRequest("message must not be empty".to_string()));
    }

    let reply = engine
        .chat(&payload.message, payload.conversation_id)
        .await?;

    Ok(Json(ChatResponse {
        response: reply.answer,
        conversation_id: reply.conversation_id,
        sources: reply.sources,
    }))
}

pub async fn index_documents(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<IndexDocumentsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let engine = state.engine()?;

    if let Some(metadatas) = &payload.metadatas {
        if metadatas.len() > payload.documents.len() {
            return Err(ApiError::BadRequest(
                "more metadata entries than documents".to_string(),
            ));
        }
    }

    let count = engine
        .index_documents(payload.documents, payload.metadatas)
        .await?;

    Ok(Json(json!({
        "message": format!("Successfully indexed {} documents", count),
    })))
}

pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(conversation_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let engine = state.engine()?;
    let history = engine.history(&conversation_id).await;

    Ok(Json(json!({
        "conversation_id": conversation_id,
        "history": history,
    })))
}
