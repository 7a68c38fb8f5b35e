// src/providers/anthropic.rs

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::AnthropicConfig;
use crate::errors::{AnalyzeError, Result};
use crate::providers::{LlmProvider, ModelReply, TokenUsage};
use crate::upload::DataUrl;

/// A provider for interacting with Anthropic Claude models.
pub struct AnthropicProvider {
    client: Client,
    config: AnthropicConfig,
}

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: Vec<RequestBlock<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum RequestBlock<'a> {
    Image { source: ImageSource<'a> },
    Text { text: &'a str },
}

#[derive(Serialize)]
struct ImageSource<'a> {
    #[serde(rename = "type")]
    source_type: &'a str,
    media_type: &'a str,
    data: &'a str,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    usage: ApiUsage,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiUsage {
    input_tokens: u32,
    output_tokens: u32,
}

impl AnthropicProvider {
    /// Creates a new `AnthropicProvider`.
    pub fn new(client: Client, config: AnthropicConfig) -> Self {
        Self { client, config }
    }
}

impl LlmProvider for AnthropicProvider {
    /// Calls the messages API with a base64 image block followed by the prompt.
    async fn generate(&self, model: &str, prompt: &str, image: &DataUrl) -> Result<ModelReply> {
        let url = format!("{}/v1/messages", self.config.api_base.trim_end_matches('/'));

        log::info!("📡 Calling Anthropic: {} with model: {}", url, model);

        let body = AnthropicRequest {
            model,
            messages: vec![Message {
                role: "user",
                content: vec![
                    RequestBlock::Image {
                        source: ImageSource {
                            source_type: "base64",
                            media_type: &image.mime_type,
                            data: &image.data,
                        },
                    },
                    RequestBlock::Text { text: prompt },
                ],
            }],
            max_tokens: 4096,
            temperature: Some(0.2),
        };

        let start = Instant::now();

        let resp = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let latency_ms = start.elapsed().as_millis() as u64;

        log::info!("📥 Anthropic response status: {} ({}ms)", status, latency_ms);

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

        let anthropic_resp: AnthropicResponse = resp.json().await?;

        let usage = TokenUsage {
            input_tokens: Some(anthropic_resp.usage.input_tokens),
            output_tokens: Some(anthropic_resp.usage.output_tokens),
        };

        let text = anthropic_resp
            .content
            .into_iter()
            .find(|block| block.content_type == "text")
            .and_then(|block| block.text)
            .ok_or_else(|| AnalyzeError::UnexpectedResponse("No text content in response".to_string()))?;

        if text.is_empty() {
            return Err(AnalyzeError::EmptyResponse);
        }

        Ok(ModelReply { text, latency_ms, usage })
    }
}
