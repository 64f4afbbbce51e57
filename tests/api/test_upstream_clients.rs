// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Real Gemini and Qdrant clients against an in-process fake upstream

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use memory_gateway::{
    api::{create_router, AppState},
    config::GatewayConfig,
    embeddings::{EmbeddingError, EmbeddingProvider, GeminiEmbeddingClient},
    vector::{QdrantClient, SimilaritySearch, StoreError, VectorPoint, VectorStore},
    vision::{GeminiVisionClient, ImageInput, VisionProvider},
};
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

use super::common::{json_request, send};

const GEMINI_KEY: &str = "gemini-secret";
const QDRANT_KEY: &str = "qdrant-secret";
const TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
struct Recorded {
    method: Method,
    path: String,
    query: HashMap<String, String>,
    api_key: Option<String>,
    body: serde_json::Value,
}

type Recorder = Arc<Mutex<Vec<Recorded>>>;

async fn fake_upstream(
    State(recorder): State<Recorder>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let query = url::form_urlencoded::parse(uri.query().unwrap_or("").as_bytes())
        .into_owned()
        .collect();
    recorder.lock().unwrap().push(Recorded {
        method,
        path: path.clone(),
        query,
        api_key: headers
            .get("api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null),
    });

    if path.contains("/collections/missing/") {
        return (
            StatusCode::NOT_FOUND,
            "Not found: Collection `missing` doesn't exist!",
        )
            .into_response();
    }
    if path.ends_with(":embedContent") {
        return Json(json!({"embedding": {"values": [0.1, 0.2, 0.3]}})).into_response();
    }
    if path.ends_with(":generateContent") {
        return Json(json!({
            "candidates": [{
                "content": {"parts": [{"text": "A diagram of the solar system"}], "role": "model"}
            }]
        }))
        .into_response();
    }
    if path.ends_with("/points/search") {
        return Json(json!({
            "result": [{"id": "7c9e6679-7425-40de-944b-e07fc1f90ae7", "version": 3,
                        "score": 0.87, "payload": {"text": "Alice likes tea"}}],
            "status": "ok",
            "time": 0.001
        }))
        .into_response();
    }
    if path.ends_with("/points") {
        return Json(json!({
            "result": {"operation_id": 1, "status": "completed"},
            "status": "ok",
            "time": 0.001
        }))
        .into_response();
    }
    StatusCode::NOT_FOUND.into_response()
}

async fn spawn_upstream() -> (SocketAddr, Recorder) {
    let recorder: Recorder = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .fallback(fake_upstream)
        .with_state(recorder.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, recorder)
}

#[tokio::test]
async fn test_gemini_embedding_request_shape() {
    let (addr, recorder) = spawn_upstream().await;
    let client = GeminiEmbeddingClient::new(
        &format!("http://{}/v1beta/", addr),
        GEMINI_KEY,
        "embedding-001",
        TIMEOUT,
    )
    .unwrap();

    let vector = client.embed("Alice likes tea").await.unwrap();
    assert_eq!(vector, vec![0.1_f32, 0.2, 0.3]);

    let recorded = recorder.lock().unwrap()[0].clone();
    assert_eq!(recorded.method, Method::POST);
    assert_eq!(recorded.path, "/v1beta/models/embedding-001:embedContent");
    assert_eq!(recorded.query.get("key").map(String::as_str), Some(GEMINI_KEY));
    assert_eq!(recorded.body["model"], "models/embedding-001");
    assert_eq!(recorded.body["content"]["parts"][0]["text"], "Alice likes tea");
}

#[tokio::test]
async fn test_gemini_vision_request_shape() {
    let (addr, recorder) = spawn_upstream().await;
    let client = GeminiVisionClient::new(
        &format!("http://{}/v1beta", addr),
        GEMINI_KEY,
        "gemini-1.5-flash",
        TIMEOUT,
    )
    .unwrap();

    let image = ImageInput::new(&b"\x89PNG"[..], "image/png");
    let description = client.describe(&image).await.unwrap();
    assert_eq!(description, "A diagram of the solar system");

    let recorded = recorder.lock().unwrap()[0].clone();
    assert_eq!(
        recorded.path,
        "/v1beta/models/gemini-1.5-flash:generateContent"
    );
    assert_eq!(recorded.query.get("key").map(String::as_str), Some(GEMINI_KEY));
    let parts = &recorded.body["contents"][0]["parts"];
    assert_eq!(parts[0]["text"], memory_gateway::vision::ANALYSIS_PROMPT);
    assert_eq!(parts[1]["inline_data"]["mime_type"], "image/png");
    assert_eq!(parts[1]["inline_data"]["data"], "iVBORw==");
}

#[tokio::test]
async fn test_qdrant_upsert_waits_and_authenticates() {
    let (addr, recorder) = spawn_upstream().await;
    let client =
        QdrantClient::new(&format!("http://{}", addr), Some(QDRANT_KEY.to_string()), TIMEOUT)
            .unwrap();

    let id = Uuid::new_v4();
    let point = VectorPoint {
        id,
        vector: vec![0.5, 0.5],
        payload: json!({"text": "hello", "source": "chat"}),
    };
    client.upsert("people", point).await.unwrap();

    let recorded = recorder.lock().unwrap()[0].clone();
    assert_eq!(recorded.method, Method::PUT);
    assert_eq!(recorded.path, "/collections/people/points");
    assert_eq!(recorded.query.get("wait").map(String::as_str), Some("true"));
    assert_eq!(recorded.api_key.as_deref(), Some(QDRANT_KEY));
    assert_eq!(recorded.body["points"][0]["id"], id.to_string());
    assert_eq!(recorded.body["points"][0]["vector"], json!([0.5, 0.5]));
    assert_eq!(recorded.body["points"][0]["payload"]["source"], "chat");
}

#[tokio::test]
async fn test_qdrant_search_without_api_key() {
    let (addr, recorder) = spawn_upstream().await;
    let client = QdrantClient::new(&format!("http://{}", addr), None, TIMEOUT).unwrap();

    let response = client
        .search(
            "people",
            SimilaritySearch {
                vector: vec![0.1, 0.9],
                limit: 2,
                with_payload: true,
            },
        )
        .await
        .unwrap();
    assert_eq!(response["result"][0]["score"], 0.87);

    let recorded = recorder.lock().unwrap()[0].clone();
    assert_eq!(recorded.method, Method::POST);
    assert_eq!(recorded.path, "/collections/people/points/search");
    assert_eq!(recorded.api_key, None);
    assert_eq!(recorded.body["limit"], 2);
    assert_eq!(recorded.body["with_payload"], true);
}

#[tokio::test]
async fn test_qdrant_error_status_is_preserved() {
    let (addr, _) = spawn_upstream().await;
    let client = QdrantClient::new(&format!("http://{}", addr), None, TIMEOUT).unwrap();

    let point = VectorPoint {
        id: Uuid::new_v4(),
        vector: vec![1.0],
        payload: json!({}),
    };
    match client.upsert("missing", point).await.unwrap_err() {
        StoreError::Status { status, message } => {
            assert_eq!(status, 404);
            assert!(message.contains("doesn't exist"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_upstream_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = GeminiEmbeddingClient::new(
        &format!("http://{}/v1beta", addr),
        GEMINI_KEY,
        "embedding-001",
        TIMEOUT,
    )
    .unwrap();

    match client.embed("hello").await.unwrap_err() {
        EmbeddingError::Transport(message) => assert!(!message.contains(GEMINI_KEY)),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_configured_gateway_end_to_end() {
    let (addr, recorder) = spawn_upstream().await;
    let base = format!("http://{}", addr);
    let env: HashMap<&str, String> = HashMap::from([
        ("QDRANT_URL", base.clone()),
        ("QDRANT_API_KEY", QDRANT_KEY.to_string()),
        ("GEMINI_API_KEY", GEMINI_KEY.to_string()),
        ("GEMINI_BASE_URL", format!("{}/v1beta", base)),
        ("SERVICE_API_KEY", "front-door".to_string()),
    ]);
    let config = GatewayConfig::from_lookup(|name: &str| env.get(name).cloned()).unwrap();

    let state = AppState::from_config(&config).unwrap();
    let app = create_router(state, config.max_upload_bytes);

    let body = json!({
        "text": "Alice likes tea",
        "metadata": {"collection": "people", "source": "chat", "timestamp": "2024-05-01T10:00:00Z"}
    });
    let (status, response) = send(app, json_request("/save-memory/", Some("front-door"), body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["collection"], "people");

    let recorded = recorder.lock().unwrap().clone();
    assert_eq!(recorded.len(), 2);
    assert!(recorded[0].path.ends_with(":embedContent"));
    assert_eq!(recorded[1].path, "/collections/people/points");
    assert_eq!(recorded[1].body["points"][0]["id"], response["id"]);
    assert_eq!(recorded[1].body["points"][0]["vector"], json!([0.1, 0.2, 0.3]));
}
