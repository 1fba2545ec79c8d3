//! Runtime configuration, read from the environment (after `.env` is loaded).

use std::{path::PathBuf, time::Duration};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Canned replies instead of calling the model.
    pub demo_mode: bool,
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub max_output_tokens: u32,
    pub request_timeout: Duration,
    /// Where completed conversations are written.
    pub data_dir: PathBuf,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            demo_mode: false,
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_output_tokens: 500,
            request_timeout: Duration::from_secs(30),
            data_dir: PathBuf::from("data"),
            port: 8000,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unparseable numeric values fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            demo_mode: non_empty("DEMO_MODE").is_some_and(|v| v.eq_ignore_ascii_case("true")),
            api_key: non_empty("GEMINI_API_KEY"),
            api_base: non_empty("GEMINI_API_BASE").unwrap_or(defaults.api_base),
            model: non_empty("GEMINI_MODEL").unwrap_or(defaults.model),
            max_output_tokens: non_empty("GENERATION_MAX_TOKENS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_output_tokens),
            request_timeout: non_empty("GENERATION_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            data_dir: non_empty("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            port: non_empty("PORT").and_then(|v| v.parse().ok()).unwrap_or(defaults.port),
        }
    }
}
