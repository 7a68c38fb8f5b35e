// src/providers/ollama.rs

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::OllamaConfig;
use crate::errors::{AnalyzeError, Result};
use crate::providers::{LlmProvider, ModelReply, TokenUsage};
use crate::upload::DataUrl;

/// A provider for local Ollama vision models (llava, qwen2.5vl, ...).
pub struct OllamaProvider {
    client: Client,
    config: OllamaConfig,
}

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    images: Vec<&'a str>,
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

impl OllamaProvider {
    /// Creates a new `OllamaProvider`.
    pub fn new(client: Client, config: OllamaConfig) -> Self {
        Self { client, config }
    }
}

impl LlmProvider for OllamaProvider {
    /// Calls /api/generate with the raw base64 payload; Ollama takes no MIME type.
    async fn generate(&self, model: &str, prompt: &str, image: &DataUrl) -> Result<ModelReply> {
        let url = format!("{}/api/generate", self.config.api_base.trim_end_matches('/'));

        log::info!("📡 Calling Ollama: {} with model: {}", url, model);

        let body = OllamaRequest {
            model,
            prompt,
            images: vec![image.data.as_str()],
            stream: false,
        };

        let start = Instant::now();

        let resp = self.client.post(&url).json(&body).send().await?;

        let status = resp.status();
        let latency_ms = start.elapsed().as_millis() as u64;

        log::info!("📥 Ollama response status: {} ({}ms)", status, latency_ms);

        if !status.is_success() {
            let error_body = resp
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error body".to_string());
            return Err(AnalyzeError::ApiError {
                status: status.as_u16(),
                body: error_body,
            });
        }

        let ollama_resp: OllamaResponse = resp.json().await?;
        if ollama_resp.response.is_empty() {
            return Err(AnalyzeError::EmptyResponse);
        }

        Ok(ModelReply {
            text: ollama_resp.response,
            latency_ms,
            usage: TokenUsage {
                input_tokens: ollama_resp.prompt_eval_count,
                output_tokens: ollama_resp.eval_count,
            },
        })
    }
}
