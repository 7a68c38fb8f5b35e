// src/providers/mod.rs

use crate::errors::Result;
use crate::upload::DataUrl;

pub mod anthropic;
pub mod gemini;
pub mod ollama;
pub mod openai;

/// Token counts reported by the provider, when it reports them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TokenUsage {
    pub input_tokens: Option<u32>,
    pub output_tokens: Option<u32>,
}

/// Text produced by a model together with call metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelReply {
    pub text: String,
    pub latency_ms: u64,
    pub usage: TokenUsage,
}

/// A common trait for multimodal Large Language Model (LLM) providers.
/// This allows for a unified interface to different model backends like OpenAI, Anthropic, Gemini and Ollama.
///
/// Note: We're not using async_trait here, so implementers must handle async directly.
pub trait LlmProvider: Send + Sync {
    /// Sends a single user message made of a text prompt and one image.
    ///
    /// # Arguments
    /// * `model` - The specific model to use for generation (e.g., "gpt-4o", "claude-sonnet-4", "llava").
    /// * `prompt` - The instruction text.
    /// * `image` - The image the instruction refers to.
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        image: &DataUrl,
    ) -> impl std::future::Future<Output = Result<ModelReply>> + Send;
}
