//! End-to-end tests over the HTTP surface, using an ephemeral listener and
//! mock generative/embedding providers.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use studyhub_backend::chat::ChatEngine;
use studyhub_backend::core::config::Settings;
use studyhub_backend::core::errors::EngineError;
use studyhub_backend::llm::{Embedder, TextGenerator};
use studyhub_backend::rag::{DocumentStore, SqliteDocStore};
use studyhub_backend::server::router::router;
use studyhub_backend::state::AppState;

struct CannedGenerator;

#[async_trait]
impl TextGenerator for CannedGenerator {
    fn name(&self) -> &str {
        "canned"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, EngineError> {
        Ok("a helpful answer".to_string())
    }
}

struct FixedEmbedder;

#[async_trait]
impl Embedder for FixedEmbedder {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EngineError> {
        Ok(inputs.iter().map(|_| vec![0.5, 0.5]).collect())
    }
}

fn test_settings(data_dir: PathBuf) -> Settings {
    Settings {
        groq_api_key: Some("test-key".to_string()),
        groq_base_url: "http://127.0.0.1:1".to_string(),
        groq_model: "llama-3.1-8b-instant".to_string(),
        temperature: 0.7,
        embeddings_base_url: "http://127.0.0.1:1".to_string(),
        embeddings_model: "nomic-embed-text".to_string(),
        request_timeout_secs: 5,
        data_dir,
        port: 0,
    }
}

async fn spawn_app(state: Arc<AppState>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let app = router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server");
    });
    format!("http://{}", addr)
}

async fn spawn_with_engine() -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store: Arc<dyn DocumentStore> = Arc::new(
        SqliteDocStore::open(dir.path().join("rag.db"))
            .await
            .expect("open store"),
    );
    let engine = ChatEngine::with_parts(
        Arc::new(CannedGenerator),
        Arc::new(FixedEmbedder),
        Some(store),
    );
    let state = AppState::with_engine(test_settings(dir.path().to_path_buf()), Some(Arc::new(engine)));
    let base_url = spawn_app(state).await;
    (dir, base_url)
}

#[tokio::test]
async fn health_reports_rag_availability() {
    let (_dir, base_url) = spawn_with_engine().await;
    let client = reqwest::Client::new();

    let body: Value = client
        .get(format!("{}/api/health", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["rag_available"], true);
}

#[tokio::test]
async fn chat_routes_answer_503_without_engine() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = AppState::with_engine(test_settings(dir.path().to_path_buf()), None);
    let base_url = spawn_app(state).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/chat", base_url))
        .json(&json!({"message": "hello"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 503);

    let health: Value = client
        .get(format!("{}/api/health", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["rag_available"], false);
}

#[tokio::test]
async fn gpa_endpoint_computes_and_validates() {
    let (_dir, base_url) = spawn_with_engine().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/gpa/calculate", base_url))
        .json(&json!({
            "courses": [
                {"name": "Math", "credits": 3.0, "grade": "A"},
                {"name": "History", "credits": 3.0, "grade": "B+"}
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["gpa"], 3.65);
    assert_eq!(body["total_credits"], 6.0);

    let res = client
        .post(format!("{}/api/gpa/calculate", base_url))
        .json(&json!({
            "courses": [{"name": "Alchemy", "credits": 3.0, "grade": "Z"}]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
}

#[tokio::test]
async fn blank_message_is_rejected() {
    let (_dir, base_url) = spawn_with_engine().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/chat", base_url))
        .json(&json!({"message": "   "}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
}

#[tokio::test]
async fn chat_index_chat_flow_moves_to_grounded_mode() {
    let (_dir, base_url) = spawn_with_engine().await;
    let client = reqwest::Client::new();

    // no documents yet: direct mode, empty sources
    let first: Value = client
        .post(format!("{}/api/chat", base_url))
        .json(&json!({"message": "What is the capital of France?"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first["sources"].as_array().unwrap().len(), 0);
    let conversation_id = first["conversation_id"].as_str().unwrap().to_string();
    assert!(!conversation_id.is_empty());

    // index one document
    let indexed: Value = client
        .post(format!("{}/api/chat/index-documents", base_url))
        .json(&json!({"documents": ["Paris is the capital of France."]}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(indexed["message"], "Successfully indexed 1 documents");

    // same conversation, now grounded
    let second: Value = client
        .post(format!("{}/api/chat", base_url))
        .json(&json!({
            "message": "What is the capital of France?",
            "conversation_id": conversation_id,
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(second["conversation_id"], conversation_id.as_str());
    let sources = second["sources"].as_array().unwrap();
    assert!(!sources.is_empty());
    assert!(sources[0]
        .as_str()
        .unwrap()
        .starts_with("Paris is the capital of France."));

    // two round trips leave exactly four ordered turns
    let history: Value = client
        .get(format!("{}/api/chat/history/{}", base_url, conversation_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let turns = history["history"].as_array().unwrap();
    assert_eq!(turns.len(), 4);
    let roles: Vec<&str> = turns
        .iter()
        .map(|t| t["role"].as_str().unwrap())
        .collect();
    assert_eq!(roles, vec!["user", "assistant", "user", "assistant"]);
}

#[tokio::test]
async fn indexing_zero_documents_is_a_noop() {
    let (_dir, base_url) = spawn_with_engine().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/chat/index-documents", base_url))
        .json(&json!({"documents": []}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Successfully indexed 0 documents");
}

#[tokio::test]
async fn history_of_unknown_conversation_is_empty_not_an_error() {
    let (_dir, base_url) = spawn_with_engine().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/chat/history/never-seen", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["history"].as_array().unwrap().len(), 0);
}
