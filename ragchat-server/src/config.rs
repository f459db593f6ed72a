//! Startup configuration read from the environment.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `PINECONE_API_KEY` | required |
//! | `PINECONE_CONTROL_PLANE_URL` | `https://api.pinecone.io` |
//! | `PINECONE_NAMESPACE` | default namespace |
//! | `OLLAMA_BASE_URL` | `http://localhost:11434` |
//! | `OLLAMA_MODEL` | `mistral` |
//! | `OLLAMA_TEMPERATURE` | model default |
//! | `OLLAMA_EMBEDDING_MODEL` | `all-minilm` |
//! | `OLLAMA_EMBEDDING_DIMENSIONS` | `384` |
//! | `RAGCHAT_INDEX_NAME` | `medical-chatbot` |
//! | `RAGCHAT_TOP_K` | `3` |
//! | `RAGCHAT_HOST` | `0.0.0.0` |
//! | `RAGCHAT_PORT` | `8000` |

use std::str::FromStr;

use ragchat_model::ollama::{DEFAULT_OLLAMA_BASE_URL, DEFAULT_OLLAMA_MODEL};
use ragchat_rag::RagConfig;
use ragchat_rag::ollama::{DEFAULT_EMBEDDING_DIMENSIONS, DEFAULT_EMBEDDING_MODEL};
use ragchat_rag::pinecone::DEFAULT_CONTROL_PLANE_URL;
use thiserror::Error;

use crate::server::ServerConfig;

/// A missing or unusable configuration value.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var}={value:?} is invalid: {reason}")]
    Invalid { var: &'static str, value: String, reason: String },
}

/// Everything the server needs to start.
#[derive(Clone, PartialEq)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub rag: RagConfig,
    pub pinecone_api_key: String,
    pub pinecone_control_plane_url: String,
    pub pinecone_namespace: Option<String>,
    pub ollama_base_url: String,
    pub ollama_model: String,
    pub ollama_temperature: Option<f32>,
    pub embedding_model: String,
    pub embedding_dimensions: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("server", &self.server)
            .field("rag", &self.rag)
            .field("pinecone_api_key", &"<redacted>")
            .field("pinecone_control_plane_url", &self.pinecone_control_plane_url)
            .field("pinecone_namespace", &self.pinecone_namespace)
            .field("ollama_base_url", &self.ollama_base_url)
            .field("ollama_model", &self.ollama_model)
            .field("ollama_temperature", &self.ollama_temperature)
            .field("embedding_model", &self.embedding_model)
            .field("embedding_dimensions", &self.embedding_dimensions)
            .finish()
    }
}

impl AppConfig {
    /// Read the process environment, after loading `.env` if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let pinecone_api_key =
            var("PINECONE_API_KEY").ok_or(ConfigError::Missing("PINECONE_API_KEY"))?;

        let defaults = RagConfig::default();
        let top_k: usize = parse(&var, "RAGCHAT_TOP_K", defaults.top_k)?;
        let index_name = or("RAGCHAT_INDEX_NAME", &defaults.index_name);
        let rag = RagConfig::builder().index_name(index_name).top_k(top_k).build().map_err(|e| {
            ConfigError::Invalid {
                var: "RAGCHAT_TOP_K",
                value: top_k.to_string(),
                reason: e.to_string(),
            }
        })?;

        let server_defaults = ServerConfig::default();
        let server = ServerConfig {
            host: or("RAGCHAT_HOST", &server_defaults.host),
            port: parse(&var, "RAGCHAT_PORT", server_defaults.port)?,
        };

        Ok(Self {
            server,
            rag,
            pinecone_api_key,
            pinecone_control_plane_url: or(
                "PINECONE_CONTROL_PLANE_URL",
                DEFAULT_CONTROL_PLANE_URL,
            ),
            pinecone_namespace: var("PINECONE_NAMESPACE"),
            ollama_base_url: or("OLLAMA_BASE_URL", DEFAULT_OLLAMA_BASE_URL),
            ollama_model: or("OLLAMA_MODEL", DEFAULT_OLLAMA_MODEL),
            ollama_temperature: parse_optional(&var, "OLLAMA_TEMPERATURE")?,
            embedding_model: or("OLLAMA_EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
            embedding_dimensions: parse(
                &var,
                "OLLAMA_EMBEDDING_DIMENSIONS",
                DEFAULT_EMBEDDING_DIMENSIONS,
            )?,
        })
    }
}

fn parse<T, V>(var: &V, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    V: Fn(&str) -> Option<String>,
{
    Ok(parse_optional(var, key)?.unwrap_or(default))
}

fn parse_optional<T, V>(var: &V, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    V: Fn(&str) -> Option<String>,
{
    let Some(value) = var(key) else {
        return Ok(None);
    };
    match value.trim().parse::<T>() {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => Err(ConfigError::Invalid { var: key, reason: e.to_string(), value }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let env: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_need_only_the_api_key() {
        let config = load(&[("PINECONE_API_KEY", "pcsk_test")]).unwrap();

        assert_eq!(config.pinecone_api_key, "pcsk_test");
        assert_eq!(config.rag, RagConfig::default());
        assert_eq!(config.rag.top_k, 3);
        assert_eq!(config.rag.index_name, "medical-chatbot");
        assert_eq!(config.ollama_base_url, "http://localhost:11434");
        assert_eq!(config.ollama_model, "mistral");
        assert_eq!(config.embedding_model, "all-minilm");
        assert_eq!(config.embedding_dimensions, 384);
        assert_eq!(config.ollama_temperature, None);
        assert_eq!(config.pinecone_namespace, None);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn missing_or_blank_api_key_fails() {
        assert_eq!(load(&[]).unwrap_err(), ConfigError::Missing("PINECONE_API_KEY"));
        assert_eq!(
            load(&[("PINECONE_API_KEY", "  ")]).unwrap_err(),
            ConfigError::Missing("PINECONE_API_KEY")
        );
    }

    #[test]
    fn overrides_are_applied() {
        let config = load(&[
            ("PINECONE_API_KEY", "k"),
            ("RAGCHAT_TOP_K", "5"),
            ("RAGCHAT_INDEX_NAME", "dermatology"),
            ("RAGCHAT_PORT", "9001"),
            ("OLLAMA_MODEL", "llama3.1:8b"),
            ("OLLAMA_TEMPERATURE", "0.2"),
            ("PINECONE_NAMESPACE", "dermatology-2024"),
        ])
        .unwrap();

        assert_eq!(config.ollama_temperature, Some(0.2));
        assert_eq!(config.pinecone_namespace.as_deref(), Some("dermatology-2024"));

        assert_eq!(config.rag.top_k, 5);
        assert_eq!(config.rag.index_name, "dermatology");
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.ollama_model, "llama3.1:8b");
    }

    #[test]
    fn invalid_numbers_name_the_variable() {
        let err = load(&[("PINECONE_API_KEY", "k"), ("RAGCHAT_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "RAGCHAT_PORT", .. }));

        let err = load(&[("PINECONE_API_KEY", "k"), ("RAGCHAT_TOP_K", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "RAGCHAT_TOP_K", .. }));

        let err = load(&[("PINECONE_API_KEY", "k"), ("OLLAMA_TEMPERATURE", "warm")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "OLLAMA_TEMPERATURE", .. }));
    }

    #[test]
    fn debug_hides_api_key() {
        let config = load(&[("PINECONE_API_KEY", "pcsk_secret")]).unwrap();
        assert!(!format!("{config:?}").contains("pcsk_secret"));
    }
}
