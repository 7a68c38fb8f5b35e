// src/config.rs
use serde::Deserialize;
use std::path::{Path, PathBuf};
use crate::analyzer::parse_model_string;
use crate::errors::{AnalyzeError, Result};

pub const DEFAULT_MODEL: &str = "openai:gpt-4o";
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Configuration for OpenAI-compatible chat completion endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenAIConfig {
    pub api_base: String,
    pub api_key: String,
}

/// Configuration for the Anthropic provider.
#[derive(Debug, Clone, PartialEq)]
pub struct AnthropicConfig {
    pub api_base: String,
    pub api_key: String,
}

/// Configuration for the Gemini provider.
#[derive(Debug, Clone, PartialEq)]
pub struct GeminiConfig {
    pub api_base: String,
    pub api_key: String,
}

/// Configuration for the Ollama provider.
#[derive(Debug, Clone, PartialEq)]
pub struct OllamaConfig {
    pub api_base: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for the JSON body of `/api/analyze`, which carries the encoded image.
    pub max_image_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

/// High-level application configuration.
///
/// Built from an optional TOML file overlaid with environment variables;
/// the environment always wins.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openai: Option<OpenAIConfig>,
    pub anthropic: Option<AnthropicConfig>,
    pub gemini: Option<GeminiConfig>,
    pub ollama: Option<OllamaConfig>,
    /// Model used for every analysis, in `provider:model_name` form.
    pub model: String,
    /// No timeout when unset: a hung model call keeps the request open.
    pub model_timeout_secs: Option<u64>,
    pub server: ServerConfig,
}

/// On-disk shape of `config.toml`. Every field is optional.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub model_timeout_secs: Option<u64>,
    #[serde(default)]
    pub server: FileServer,
    #[serde(default)]
    pub openai: Option<FileProvider>,
    #[serde(default)]
    pub anthropic: Option<FileProvider>,
    #[serde(default)]
    pub gemini: Option<FileProvider>,
    #[serde(default)]
    pub ollama: Option<FileProvider>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileServer {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub max_image_bytes: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileProvider {
    pub api_key: Option<String>,
    pub api_base: Option<String>,
}

impl FileConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }
}

impl AppConfig {
    /// Load configuration from the config file (if any) and environment variables.
    pub fn load() -> Result<Self> {
        Self::load_from(config_file_path().as_deref(), |key| std::env::var(key).ok())
    }

    /// Reads `path` when it exists, then overlays `lookup`. A missing file is not an error.
    pub fn load_from<F>(path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match path {
            Some(path) if path.exists() => {
                log::info!("Loading configuration from {}", path.display());
                FileConfig::from_path(path)?
            }
            _ => FileConfig::default(),
        };
        Self::from_sources(file, lookup)
    }

    /// Merge a file config with a variable lookup. Empty variables count as unset.
    pub fn from_sources<F>(file: FileConfig, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let section = |section: &Option<FileProvider>, key_var: &str, base_var: &str| {
            let api_key = var(key_var).or_else(|| section.as_ref().and_then(|s| s.api_key.clone()));
            let api_base = var(base_var).or_else(|| section.as_ref().and_then(|s| s.api_base.clone()));
            (api_key, api_base)
        };

        let openai = match section(&file.openai, "OPENAI_API_KEY", "OPENAI_API_BASE") {
            (Some(api_key), api_base) => Some(OpenAIConfig {
                api_base: api_base.unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
                api_key,
            }),
            _ => None,
        };

        let anthropic = match section(&file.anthropic, "ANTHROPIC_API_KEY", "ANTHROPIC_API_BASE") {
            (Some(api_key), api_base) => Some(AnthropicConfig {
                api_base: api_base.unwrap_or_else(|| "https://api.anthropic.com".to_string()),
                api_key,
            }),
            _ => None,
        };

        let gemini = match section(&file.gemini, "GEMINI_API_KEY", "GEMINI_API_BASE") {
            (Some(api_key), api_base) => Some(GeminiConfig {
                api_base: api_base
                    .unwrap_or_else(|| "https://generativelanguage.googleapis.com".to_string()),
                api_key,
            }),
            _ => None,
        };

        let ollama = var("OLLAMA_API_BASE")
            .or_else(|| file.ollama.as_ref().and_then(|s| s.api_base.clone()))
            .map(|api_base| OllamaConfig { api_base });

        if openai.is_none() && anthropic.is_none() && gemini.is_none() && ollama.is_none() {
            return Err(AnalyzeError::Config(
                "No LLM providers configured. Please set OPENAI_API_KEY, ANTHROPIC_API_KEY, GEMINI_API_KEY or OLLAMA_API_BASE.".to_string()
            ));
        }

        let model = var("ANALYZE_MODEL")
            .or(file.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let model_timeout_secs = match var("MODEL_TIMEOUT_SECS") {
            Some(raw) => Some(parse_number::<u64>("MODEL_TIMEOUT_SECS", &raw)?),
            None => file.model_timeout_secs,
        };

        let defaults = ServerConfig::default();
        let server = ServerConfig {
            host: var("SERVER_HOST").or(file.server.host).unwrap_or(defaults.host),
            port: match var("SERVER_PORT") {
                Some(raw) => parse_number("SERVER_PORT", &raw)?,
                None => file.server.port.unwrap_or(defaults.port),
            },
            max_image_bytes: match var("MAX_IMAGE_BYTES") {
                Some(raw) => parse_number("MAX_IMAGE_BYTES", &raw)?,
                None => file.server.max_image_bytes.unwrap_or(defaults.max_image_bytes),
            },
        };

        let config = AppConfig { openai, anthropic, gemini, ollama, model, model_timeout_secs, server };
        config.ensure_model_provider()?;
        Ok(config)
    }

    /// Names of the providers that have a configuration section.
    pub fn providers(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.openai.is_some() {
            names.push("openai");
        }
        if self.anthropic.is_some() {
            names.push("anthropic");
        }
        if self.gemini.is_some() {
            names.push("gemini");
        }
        if self.ollama.is_some() {
            names.push("ollama");
        }
        names
    }

    fn ensure_model_provider(&self) -> Result<()> {
        let (provider, model) = parse_model_string(&self.model);
        if model.is_empty() {
            return Err(AnalyzeError::Config(format!("Model '{}' has no model name", self.model)));
        }
        if !self.providers().contains(&provider.as_str()) {
            return Err(AnalyzeError::Config(format!(
                "Model '{}' uses provider '{}', which is not configured",
                self.model, provider
            )));
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| AnalyzeError::Config(format!("{} must be a non-negative integer, got '{}'", key, raw)))
}

/// `GRAPHLENS_CONFIG` if set, otherwise `<config dir>/graphlens/config.toml`.
pub fn config_file_path() -> Option<PathBuf> {
    match std::env::var("GRAPHLENS_CONFIG") {
        Ok(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => dirs::config_dir().map(|dir| dir.join("graphlens").join("config.toml")),
    }
}
