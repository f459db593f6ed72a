use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use ragchat_model::{OllamaConfig, OllamaModel};
use ragchat_rag::{
    EmbeddingProvider, IndexDescription, OllamaEmbeddingProvider, PineconeConfig,
    PineconeVectorStore, RagPipeline,
};
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::{
    config::AppConfig,
    error::ApiError,
    protocol::{ChatRequest, ChatResponse},
};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<RagPipeline>,
}

impl AppState {
    pub fn new(pipeline: RagPipeline) -> Self {
        Self { pipeline: Arc::new(pipeline) }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8000 }
    }
}

pub fn app_router(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/chat", post(chat))
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Wire the Ollama and Pinecone clients into a pipeline.
///
/// The index is described once up front so a bad key or index name stops
/// startup instead of failing the first request.
pub async fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let mut llm_config = OllamaConfig::new(&config.ollama_base_url, &config.ollama_model);
    if let Some(temperature) = config.ollama_temperature {
        llm_config = llm_config.with_temperature(temperature);
    }
    let llm = OllamaModel::new(llm_config).context("invalid Ollama chat configuration")?;

    let embedder = OllamaEmbeddingProvider::new(&config.ollama_base_url)
        .context("invalid Ollama embedding configuration")?
        .with_model(&config.embedding_model)
        .with_dimensions(config.embedding_dimensions);

    let mut pinecone = PineconeConfig::new(&config.pinecone_api_key)
        .with_control_plane_url(&config.pinecone_control_plane_url);
    if let Some(namespace) = &config.pinecone_namespace {
        pinecone = pinecone.with_namespace(namespace);
    }
    let store = PineconeVectorStore::new(pinecone).context("invalid Pinecone configuration")?;

    let index = store
        .describe_index(&config.rag.index_name)
        .await
        .with_context(|| format!("failed to describe index '{}'", config.rag.index_name))?;
    check_index(&index, &embedder);
    info!(
        index = %index.name,
        host = %index.host,
        top_k = config.rag.top_k,
        "vector index resolved"
    );

    let pipeline = RagPipeline::builder()
        .config(config.rag.clone())
        .llm(Arc::new(llm))
        .embedding_provider(Arc::new(embedder))
        .vector_store(Arc::new(store))
        .build()?;

    Ok(AppState::new(pipeline))
}

/// Log why `index` may not serve queries embedded by `embedder`. Returns
/// `false` if anything was logged.
pub fn check_index(index: &IndexDescription, embedder: &dyn EmbeddingProvider) -> bool {
    let mut ok = true;
    if index.dimension != embedder.dimensions() {
        warn!(
            index = %index.name,
            index_dimension = index.dimension,
            embedding_dimension = embedder.dimensions(),
            "index dimension does not match the embedding model"
        );
        ok = false;
    }
    if let Some(status) = index.status.as_ref().filter(|s| !s.ready) {
        warn!(index = %index.name, state = ?status.state, "index is not ready");
        ok = false;
    }
    ok
}

pub async fn run_server(config: ServerConfig, state: AppState) -> anyhow::Result<()> {
    let app = app_router(state);
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| "invalid host/port for ragchat server")?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("ragchat listening on http://{}", addr);
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    info!("ragchat stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "ragchat",
    }))
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    info!(history_turns = request.chat_history.len(), "chat request");
    let answer = state.pipeline.answer(&request.question, &request.chat_history).await?;
    Ok(Json(ChatResponse { answer }))
}
