// src/providers/gemini.rs

use reqwest::Client;
use serde_json::json;
use std::time::Instant;

use crate::config::GeminiConfig;
use crate::errors::{AnalyzeError, Result};
use crate::providers::{LlmProvider, ModelReply, TokenUsage};
use crate::upload::DataUrl;

/// A provider for interacting with Google's Gemini models.
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Creates a new `GeminiProvider`.
    pub fn new(client: Client, config: GeminiConfig) -> Self {
        Self { client, config }
    }
}

impl LlmProvider for GeminiProvider {
    /// Calls generateContent with the prompt and the image as inline data.
    async fn generate(&self, model: &str, prompt: &str, image: &DataUrl) -> Result<ModelReply> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            model
        );

        log::info!("📡 Calling Gemini: {} with model: {}", url, model);

        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [
                    {"text": prompt},
                    {"inline_data": {"mime_type": image.mime_type, "data": image.data}}
                ]
            }]
        });

        let start = Instant::now();

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let latency_ms = start.elapsed().as_millis() as u64;

        log::info!("📥 Gemini response status: {} ({}ms)", status, latency_ms);

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

        let response_json: serde_json::Value = resp.json().await?;

        if let Some(error) = response_json.get("error") {
            return Err(AnalyzeError::ApiResponse(error.to_string()));
        }

        let text = response_json
            .get("candidates")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.get(0))
            .and_then(|p| p.get("text"))
            .and_then(|t| t.as_str())
            .ok_or_else(|| AnalyzeError::UnexpectedResponse(response_json.to_string()))?;

        if text.is_empty() {
            return Err(AnalyzeError::EmptyResponse);
        }

        let usage_count = |key: &str| {
            response_json
                .get("usageMetadata")
                .and_then(|u| u.get(key))
                .and_then(|n| n.as_u64())
                .map(|n| n as u32)
        };
        let usage = TokenUsage {
            input_tokens: usage_count("promptTokenCount"),
            output_tokens: usage_count("candidatesTokenCount"),
        };

        Ok(ModelReply { text: text.to_string(), latency_ms, usage })
    }
}
