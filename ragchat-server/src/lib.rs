//! HTTP front end for the ragchat pipeline.
//!
//! `POST /chat` takes `{"question", "chat_history"}` and returns `{"answer"}`.
//! Failures come back as `{"error": {"code", "message"}}` with a 5xx status.

pub mod config;
pub mod error;
pub mod protocol;
pub mod server;
pub mod telemetry;

pub use config::{AppConfig, ConfigError};
pub use error::ApiError;
pub use protocol::{ChatRequest, ChatResponse, ErrorBody, ErrorResponse};
pub use server::{AppState, ServerConfig, app_router, build_state, run_server};
