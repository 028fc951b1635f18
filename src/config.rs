use std::path::PathBuf;

use anyhow::{Context, Result};

pub const DEFAULT_CATALOG_PATH: &str = "discography.json";
pub const DEFAULT_MEDIA_STORE_PATH: &str = "media-links.json";
pub const DEFAULT_COUNTDOWN_SECONDS: f64 = 30.0;
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub catalog_path: PathBuf,
    pub media_store_path: PathBuf,
    /// How long each song stays on screen in the countdown
    pub countdown_seconds: f64,
    pub song_list: SongListConfig,
}

/// Settings for the generative song-list service
#[derive(Debug, Clone)]
pub struct SongListConfig {
    /// Without a key the service is never called
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl Default for SongListConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
        }
    }
}

/// Load configuration from `.env` and environment
pub fn load_config() -> Result<Config> {
    // Load `.env` file if present
    dotenv::dotenv().ok();
    config_from(|key| std::env::var(key).ok())
}

/// Build a config from any variable lookup; unset variables take defaults
pub fn config_from<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let countdown_seconds = match var("COUNTDOWN_SECONDS") {
        Some(raw) => parse_seconds(&raw)
            .with_context(|| format!("COUNTDOWN_SECONDS must be a positive number, got '{raw}'"))?,
        None => DEFAULT_COUNTDOWN_SECONDS,
    };

    Ok(Config {
        catalog_path: var("CATALOG_PATH")
            .unwrap_or_else(|| DEFAULT_CATALOG_PATH.to_string())
            .into(),
        media_store_path: var("MEDIA_STORE_PATH")
            .unwrap_or_else(|| DEFAULT_MEDIA_STORE_PATH.to_string())
            .into(),
        countdown_seconds,
        song_list: SongListConfig {
            api_key: var("GEMINI_API_KEY"),
            base_url: var("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            model: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
        },
    })
}

fn parse_seconds(raw: &str) -> Result<f64> {
    let seconds: f64 = raw.trim().parse()?;
    if !seconds.is_finite() || seconds <= 0.0 {
        anyhow::bail!("out of range");
    }
    Ok(seconds)
}
