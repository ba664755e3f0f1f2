use anyhow::{Context, Result};

use crate::pipeline::extract::ExtractionMode;

/// Application configuration loaded from environment variables.
/// Constructed once at startup and passed explicitly into constructors —
/// no ambient globals, so tests can build their own instances.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub extraction_mode: ExtractionMode,
    pub include_refinement: bool,
    pub retry_backoff_secs: u64,
    pub max_text_chars: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-pro".to_string()),
            extraction_mode: std::env::var("EXTRACTION_MODE")
                .unwrap_or_else(|_| "combined".to_string())
                .parse()
                .map_err(|e: anyhow::Error| {
                    e.context("EXTRACTION_MODE must be 'combined' or 'split'")
                })?,
            include_refinement: std::env::var("INCLUDE_REFINEMENT")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
                .unwrap_or(true),
            retry_backoff_secs: std::env::var("RETRY_BACKOFF_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse::<u64>()
                .context("RETRY_BACKOFF_SECS must be a number of seconds")?,
            max_text_chars: std::env::var("MAX_TEXT_CHARS")
                .unwrap_or_else(|_| "50000".to_string())
                .parse::<usize>()
                .context("MAX_TEXT_CHARS must be a character count")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
