use anyhow::{Context, Result};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Resume-processing backend, without a trailing slash.
    pub backend_url: String,
    pub backend_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            backend_url: resolve_backend_url(std::env::var("RESUME_MATCHER_BACKEND_URL").ok()),
            backend_timeout_secs: std::env::var("BACKEND_TIMEOUT_SECS")
                .unwrap_or_else(|_| "120".to_string())
                .parse::<u64>()
                .context("BACKEND_TIMEOUT_SECS must be a whole number of seconds")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Trims the configured URL, falls back to the local default when blank, and
/// strips one trailing slash so paths can be appended directly.
pub fn resolve_backend_url(raw: Option<String>) -> String {
    let trimmed = raw.as_deref().map(str::trim).unwrap_or_default();
    let base = if trimmed.is_empty() {
        DEFAULT_BACKEND_URL
    } else {
        trimmed
    };
    base.strip_suffix('/').unwrap_or(base).to_string()
}
