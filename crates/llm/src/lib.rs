//! LLM provider integration.
//!
//! A small provider-agnostic layer over the two supported backends:
//! Ollama (local, the default) and OpenAI. The rest of the workspace
//! only sees [`LlmClient`] and the request/response types.

pub mod client;
pub mod ollama;
pub mod openai;

pub use client::{LlmClient, LlmRequest, LlmResponse, LlmStream, LlmStreamChunk, LlmUsage};
pub use ollama::OllamaClient;
pub use openai::OpenAiClient;

use std::sync::Arc;

use promptcraft_core::{AppError, AppResult};

/// Build a client for the configured provider.
///
/// `endpoint` overrides the provider's default base URL. OpenAI
/// requires an API key; Ollama ignores one.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> AppResult<Arc<dyn LlmClient>> {
    match provider.to_lowercase().as_str() {
        "ollama" => {
            let base_url = endpoint.unwrap_or(ollama::DEFAULT_BASE_URL);
            Ok(Arc::new(OllamaClient::with_base_url(base_url)))
        }
        "openai" => {
            let Some(key) = api_key else {
                return Err(AppError::Config(
                    "openai provider requires an API key".to_string(),
                ));
            };
            let base_url = endpoint.unwrap_or(openai::DEFAULT_BASE_URL);
            Ok(Arc::new(OpenAiClient::new(base_url, key)))
        }
        other => Err(AppError::Config(format!("unknown provider '{other}'"))),
    }
}
