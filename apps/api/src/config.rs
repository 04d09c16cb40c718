use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Application configuration loaded from environment variables.
/// Everything has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// In-memory snapshot store when unset.
    pub redis_url: Option<String>,
    pub snapshot_key: String,
    pub anthropic_api_key: Option<String>,
    pub enable_llm_scoring: bool,
    pub scoring_variation: f64,
    pub max_resume_bytes: usize,
    pub tick_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process
    /// environment.
    pub fn from_source(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let anthropic_api_key = non_empty("ANTHROPIC_API_KEY");
        let enable_llm_scoring = parse_or(&get, "ENABLE_LLM_SCORING", false)?;
        if enable_llm_scoring && anthropic_api_key.is_none() {
            bail!("ENABLE_LLM_SCORING is set but ANTHROPIC_API_KEY is missing");
        }

        Ok(Config {
            port: parse_or(&get, "PORT", 8080u16).context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            redis_url: non_empty("REDIS_URL"),
            snapshot_key: non_empty("SNAPSHOT_KEY").unwrap_or_else(|| "interview:snapshot".to_string()),
            anthropic_api_key,
            enable_llm_scoring,
            scoring_variation: parse_or(&get, "SCORING_VARIATION", 10.0f64)?,
            max_resume_bytes: parse_or(&get, "MAX_RESUME_BYTES", 5 * 1024 * 1024usize)?,
            tick_interval: Duration::from_millis(parse_or(&get, "TICK_INTERVAL_MS", 1000u64)?),
        })
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        _ => Ok(default),
    }
}
