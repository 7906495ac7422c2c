//! Ollama backend (local runtime, newline-delimited JSON streaming).

use futures::StreamExt;
use promptcraft_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmStream, LlmStreamChunk, LlmUsage};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    model: String,
    response: String,
    done: bool,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug)]
pub struct OllamaClient {
    base_url: String,
    http: reqwest::Client,
}

impl OllamaClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    fn to_generate_request(&self, request: &LlmRequest, stream: bool) -> GenerateRequest {
        GenerateRequest {
            model: request.model.clone(),
            prompt: request.prompt.clone(),
            system: request.system.clone(),
            temperature: request.temperature,
            num_predict: request.max_tokens,
            stream,
        }
    }

    async fn send(&self, body: &GenerateRequest) -> AppResult<reqwest::Response> {
        let url = format!("{}/api/generate", self.base_url);
        debug!(url = %url, model = %body.model, "calling ollama");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("request to ollama failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::Llm(format!(
                "ollama returned {status}: {}",
                detail.trim()
            )));
        }

        Ok(response)
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmClient for OllamaClient {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        let body = self.to_generate_request(request, false);
        let response = self.send(&body).await?;

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("invalid ollama response: {e}")))?;

        Ok(LlmResponse {
            content: parsed.response,
            model: parsed.model,
            usage: LlmUsage::new(
                parsed.prompt_eval_count.unwrap_or(0),
                parsed.eval_count.unwrap_or(0),
            ),
        })
    }

    async fn stream(&self, request: &LlmRequest) -> AppResult<LlmStream> {
        let body = self.to_generate_request(request, true);
        let response = self.send(&body).await?;

        // Ollama streams one JSON object per line.
        let stream = response
            .bytes_stream()
            .map(|result| {
                let bytes =
                    result.map_err(|e| AppError::Llm(format!("ollama stream error: {e}")))?;
                let text = String::from_utf8_lossy(&bytes).into_owned();
                let chunks: Vec<AppResult<LlmStreamChunk>> = text
                    .lines()
                    .filter(|line| !line.trim().is_empty())
                    .map(|line| {
                        let parsed: GenerateResponse = serde_json::from_str(line)
                            .map_err(|e| AppError::Llm(format!("bad ollama chunk: {e}")))?;
                        let usage = parsed.done.then(|| {
                            LlmUsage::new(
                                parsed.prompt_eval_count.unwrap_or(0),
                                parsed.eval_count.unwrap_or(0),
                            )
                        });
                        Ok(LlmStreamChunk {
                            content: parsed.response,
                            done: parsed.done,
                            usage,
                        })
                    })
                    .collect();
                Ok(futures::stream::iter(chunks))
            })
            .flat_map(|result: AppResult<_>| match result {
                Ok(chunks) => chunks.boxed(),
                Err(e) => futures::stream::iter(vec![Err(e)]).boxed(),
            });

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url() {
        let client = OllamaClient::new();
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
        assert_eq!(client.provider_name(), "ollama");
    }

    #[test]
    fn test_request_mapping() {
        let client = OllamaClient::new();
        let request = LlmRequest::new("hi", "llama3.2")
            .with_temperature(0.3)
            .with_max_tokens(64);
        let body = client.to_generate_request(&request, true);
        assert_eq!(body.model, "llama3.2");
        assert_eq!(body.num_predict, Some(64));
        assert!(body.stream);
    }
}
