use anyhow::{Context, Result};

use crate::llm_client::LlmSettings;
use crate::pipeline::PipelineSettings;

/// Service configuration loaded from environment variables.
///
/// `LLM_API_KEY` is deliberately optional: a missing key does not stop the
/// server from starting, it surfaces as a `ConfigurationError` on each request.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmSettings,
    pub pipeline: PipelineSettings,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let llm_defaults = LlmSettings::default();
        let pipeline_defaults = PipelineSettings::default();

        let llm = LlmSettings {
            api_key: optional_env("LLM_API_KEY"),
            base_url: optional_env("LLM_BASE_URL").unwrap_or(llm_defaults.base_url),
            timeout_secs: parse_env("LLM_TIMEOUT_SECS", llm_defaults.timeout_secs)?,
        };

        let pipeline = PipelineSettings {
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", pipeline_defaults.max_upload_bytes)?,
            structuring_model: optional_env("LLM_STRUCTURING_MODEL")
                .unwrap_or(pipeline_defaults.structuring_model),
            vision_model: optional_env("LLM_VISION_MODEL")
                .unwrap_or(pipeline_defaults.vision_model),
            generate_bio: parse_env("GENERATE_BIO", pipeline_defaults.generate_bio)?,
            ..pipeline_defaults
        };

        Ok(Config {
            llm,
            pipeline,
            port: parse_env("PORT", 8080u16)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads a variable, treating an empty value the same as an unset one.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}
