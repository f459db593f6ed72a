//! Pinecone client against a local fake of the control and data planes.

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use ragchat_rag::{PineconeConfig, PineconeVectorStore, RagError, VectorStore};
use serde_json::{Value, json};

#[derive(Clone)]
struct Fake {
    base: String,
    describes: Arc<Mutex<Vec<String>>>,
    queries: Arc<Mutex<Vec<Value>>>,
}

async fn spawn_fake() -> (Fake, tokio::task::JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind fake pinecone");
    let addr = listener.local_addr().expect("fake addr");
    let fake = Fake {
        base: format!("http://{}", addr),
        describes: Arc::default(),
        queries: Arc::default(),
    };

    let router = Router::new()
        .route("/indexes/{name}", get(describe))
        .route("/query", post(query))
        .with_state(fake.clone());
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("fake server run");
    });
    (fake, handle)
}

fn authorized(headers: &HeaderMap) -> bool {
    headers.get("Api-Key").and_then(|v| v.to_str().ok()) == Some("test-key")
}

async fn describe(
    State(fake): State<Fake>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"code": "UNAUTHENTICATED", "message": "Invalid API Key"}})),
        );
    }
    fake.describes.lock().unwrap().push(name.clone());
    if name != "medical-chatbot" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": {"code": "NOT_FOUND", "message": format!("Resource {name} not found")}
            })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "name": name,
            "dimension": 384,
            "metric": "cosine",
            "host": fake.base,
            "spec": {"serverless": {"cloud": "aws", "region": "us-east-1"}},
            "status": {"ready": true, "state": "Ready"}
        })),
    )
}

async fn query(
    State(fake): State<Fake>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    assert!(authorized(&headers));
    fake.queries.lock().unwrap().push(body);
    Json(json!({
        "matches": [
            {
                "id": "a",
                "score": 0.92,
                "values": [],
                "metadata": {
                    "text": "Acne is a skin condition.",
                    "source": "Data/Medical_book.pdf",
                    "page": 40.0
                }
            },
            {
                "id": "b",
                "score": 0.85,
                "values": [],
                "metadata": {"source": "Data/Medical_book.pdf"}
            },
            {
                "id": "c",
                "score": 0.80,
                "values": [],
                "metadata": {"text": "Acne appears on the face."}
            }
        ],
        "namespace": ""
    }))
}

fn store(fake: &Fake, api_key: &str) -> PineconeVectorStore {
    PineconeVectorStore::new(PineconeConfig::new(api_key).with_control_plane_url(&fake.base))
        .expect("store")
}

#[tokio::test]
async fn describe_index_reports_dimension_and_host() {
    let (fake, handle) = spawn_fake().await;

    let description = store(&fake, "test-key").describe_index("medical-chatbot").await.unwrap();

    assert_eq!(description.dimension, 384);
    assert_eq!(description.host, fake.base);
    assert_eq!(description.metric.as_deref(), Some("cosine"));
    assert!(description.status.unwrap().ready);

    handle.abort();
}

#[tokio::test]
async fn search_queries_top_k_and_reads_text_metadata() {
    let (fake, handle) = spawn_fake().await;
    let store = store(&fake, "test-key");

    let results = store.search("medical-chatbot", &[0.1, 0.2], 3).await.unwrap();

    // the match without text is skipped, order kept
    let texts: Vec<&str> = results.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, ["Acne is a skin condition.", "Acne appears on the face."]);
    assert_eq!(results[0].id, "a");
    assert!((results[0].score - 0.92).abs() < 1e-6);
    assert_eq!(
        results[0].metadata.get("source").map(String::as_str),
        Some("Data/Medical_book.pdf")
    );
    assert!(!results[0].metadata.contains_key("text"));

    let queries = fake.queries.lock().unwrap().clone();
    assert_eq!(queries.len(), 1);
    let q = &queries[0];
    assert_eq!(q["topK"], 3);
    assert_eq!(q["includeMetadata"], true);
    assert_eq!(q["vector"].as_array().map(Vec::len), Some(2));
    assert!(q.get("namespace").is_none());

    handle.abort();
}

#[tokio::test]
async fn host_is_resolved_once() {
    let (fake, handle) = spawn_fake().await;
    let store = store(&fake, "test-key");

    store.search("medical-chatbot", &[0.1], 3).await.unwrap();
    store.search("medical-chatbot", &[0.2], 3).await.unwrap();

    assert_eq!(fake.describes.lock().unwrap().len(), 1);
    assert_eq!(fake.queries.lock().unwrap().len(), 2);

    handle.abort();
}

#[tokio::test]
async fn namespace_is_forwarded() {
    let (fake, handle) = spawn_fake().await;
    let store = PineconeVectorStore::new(
        PineconeConfig::new("test-key").with_control_plane_url(&fake.base).with_namespace("books"),
    )
    .unwrap();

    store.search("medical-chatbot", &[0.1], 3).await.unwrap();
    assert_eq!(fake.queries.lock().unwrap()[0]["namespace"], "books");

    handle.abort();
}

#[tokio::test]
async fn missing_index_is_a_vector_store_error() {
    let (fake, handle) = spawn_fake().await;

    let err = store(&fake, "test-key").search("unknown", &[0.1], 3).await.unwrap_err();

    match err {
        RagError::VectorStoreError { backend, message } => {
            assert_eq!(backend, "pinecone");
            assert!(message.contains("404"), "{message}");
            assert!(message.contains("Resource unknown not found"), "{message}");
        }
        other => panic!("expected VectorStoreError, got {other:?}"),
    }

    handle.abort();
}

#[tokio::test]
async fn bad_api_key_is_reported() {
    let (fake, handle) = spawn_fake().await;

    let err = store(&fake, "wrong").describe_index("medical-chatbot").await.unwrap_err();
    assert!(err.to_string().contains("Invalid API Key"), "{err}");
    assert!(err.is_retrieval());

    handle.abort();
}
