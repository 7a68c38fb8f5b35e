// src/analyzer.rs
use crate::config::AppConfig;
use crate::errors::{AnalyzeError, Result};
use crate::extract::extract_first_json_object;
use crate::providers::{
    anthropic::AnthropicProvider, gemini::GeminiProvider, ollama::OllamaProvider,
    openai::OpenAIProvider, LlmProvider, ModelReply,
};
use crate::upload::DataUrl;
use serde_json::Value;
use std::time::Instant;

/// Instruction sent alongside every graph image.
pub const ANALYSIS_PROMPT: &str = r#"Analiza esta gráfica matemática y proporciona:
1. La ecuación matemática que representa (en formato LaTeX si es posible, pero sin los delimitadores $$)
2. El tipo de función (lineal, cuadrática, exponencial, trigonométrica, etc.)
3. Un análisis paso a paso de cómo llegaste a esa ecuación (mínimo 4 pasos detallados)

Responde ÚNICAMENTE con un JSON válido en este formato exacto:
{
  "equation": "ecuación aquí",
  "graphType": "tipo de función",
  "steps": [
    {
      "title": "Título del paso",
      "description": "Descripción detallada",
      "formula": "fórmula opcional"
    }
  ]
}"#;

/// Parses a model string like "provider:model_name" and returns the provider and model.
/// Defaults to "openai" if no provider is specified.
pub fn parse_model_string(model_str: &str) -> (String, String) {
    match model_str.split_once(':') {
        Some((provider, model)) => (provider.to_string(), model.to_string()),
        None => ("openai".to_string(), model_str.to_string()),
    }
}

/// Call the appropriate provider based on the provider name
async fn call_provider(
    config: &AppConfig,
    client: &reqwest::Client,
    provider_name: &str,
    model_name: &str,
    prompt: &str,
    image: &DataUrl,
) -> Result<ModelReply> {
    match provider_name {
        "openai" => {
            let openai_config = config.openai.as_ref()
                .ok_or_else(|| AnalyzeError::ProviderNotFound("openai".to_string()))?;
            let provider = OpenAIProvider::new(client.clone(), openai_config.clone());
            provider.generate(model_name, prompt, image).await
        }
        "anthropic" => {
            let anthropic_config = config.anthropic.as_ref()
                .ok_or_else(|| AnalyzeError::ProviderNotFound("anthropic".to_string()))?;
            let provider = AnthropicProvider::new(client.clone(), anthropic_config.clone());
            provider.generate(model_name, prompt, image).await
        }
        "gemini" => {
            let gemini_config = config.gemini.as_ref()
                .ok_or_else(|| AnalyzeError::ProviderNotFound("gemini".to_string()))?;
            let provider = GeminiProvider::new(client.clone(), gemini_config.clone());
            provider.generate(model_name, prompt, image).await
        }
        "ollama" => {
            let ollama_config = config.ollama.as_ref()
                .ok_or_else(|| AnalyzeError::ProviderNotFound("ollama".to_string()))?;
            let provider = OllamaProvider::new(client.clone(), ollama_config.clone());
            provider.generate(model_name, prompt, image).await
        }
        _ => Err(AnalyzeError::ProviderNotFound(provider_name.to_string())),
    }
}

/// Sends the graph to the configured model and returns the JSON object found in its reply.
///
/// The object is returned as parsed; checking it has the expected fields is
/// left to the client.
pub async fn analyze_graph(
    config: &AppConfig,
    client: &reqwest::Client,
    image: &DataUrl,
) -> Result<Value> {
    let start = Instant::now();
    let (provider_name, model_name) = parse_model_string(&config.model);

    log::info!(
        "🎯 Analyzing {} image ({} base64 chars) with {}",
        image.mime_type,
        image.data.len(),
        config.model
    );

    let reply = call_provider(config, client, &provider_name, &model_name, ANALYSIS_PROMPT, image)
        .await
        .map_err(|e| AnalyzeError::ModelFailure {
            model: config.model.clone(),
            source: Box::new(e),
        })?;

    log::info!(
        "✅ Model replied in {}ms (tokens in: {:?}, out: {:?})",
        reply.latency_ms,
        reply.usage.input_tokens,
        reply.usage.output_tokens
    );
    log::debug!("Model output:\n{}", reply.text);

    let result = extract_first_json_object(&reply.text)?;

    log::info!("⏱️  Total analysis time: {}ms", start.elapsed().as_millis());

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_model_string() {
        assert_eq!(
            parse_model_string("gemini:gemini-2.5-flash"),
            ("gemini".to_string(), "gemini-2.5-flash".to_string())
        );
        assert_eq!(
            parse_model_string("gpt-4o"),
            ("openai".to_string(), "gpt-4o".to_string())
        );
        assert_eq!(
            parse_model_string("ollama:llava:13b"),
            ("ollama".to_string(), "llava:13b".to_string())
        );
    }

    #[test]
    fn test_prompt_names_every_result_key() {
        for key in ["\"equation\"", "\"graphType\"", "\"steps\"", "\"title\"", "\"description\"", "\"formula\""] {
            assert!(ANALYSIS_PROMPT.contains(key), "prompt is missing {}", key);
        }
        assert!(ANALYSIS_PROMPT.contains("mínimo 4 pasos"));
    }
}
