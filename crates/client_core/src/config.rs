use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use shared::domain::Language;
use tracing::warn;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "translator.toml";
pub const DEFAULT_ENDPOINT: &str = "https://google-translator9.p.rapidapi.com/v2";
pub const DEFAULT_API_HOST: &str = "google-translator9.p.rapidapi.com";
pub const DEFAULT_REVEAL_INTERVAL_MS: u64 = 18;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_key: String,
    pub endpoint: String,
    pub api_host: String,
    pub reveal_interval_ms: u64,
    pub source_lang: Language,
    pub target_lang: Language,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: DEFAULT_ENDPOINT.into(),
            api_host: DEFAULT_API_HOST.into(),
            reveal_interval_ms: DEFAULT_REVEAL_INTERVAL_MS,
            source_lang: Language::En,
            target_lang: Language::Hi,
        }
    }
}

impl Settings {
    pub fn reveal_interval(&self) -> Duration {
        Duration::from_millis(self.reveal_interval_ms)
    }

    pub fn endpoint_url(&self) -> anyhow::Result<Url> {
        Url::parse(self.endpoint.trim())
            .with_context(|| format!("invalid translation endpoint '{}'", self.endpoint))
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_key: Option<String>,
    endpoint: Option<String>,
    api_host: Option<String>,
    reveal_interval_ms: Option<u64>,
    source_lang: Option<String>,
    target_lang: Option<String>,
}

/// Defaults, overlaid by the TOML file at `path` (if readable), overlaid by
/// `env`. Values that fail to parse are ignored.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => apply_file(&mut settings, file_cfg),
            Err(err) => warn!(path = %path.display(), "ignoring unreadable config file: {err}"),
        }
    }

    if let Some(v) = env("RAPIDAPI_KEY") {
        settings.api_key = v;
    }
    if let Some(v) = env("APP__RAPIDAPI_KEY") {
        settings.api_key = v;
    }

    if let Some(v) = env("APP__ENDPOINT") {
        settings.endpoint = v;
    }
    if let Some(v) = env("APP__API_HOST") {
        settings.api_host = v;
    }

    if let Some(v) = env("APP__REVEAL_INTERVAL_MS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.reveal_interval_ms = parsed;
        }
    }

    if let Some(lang) = env("APP__SOURCE_LANG").and_then(|v| v.parse().ok()) {
        settings.source_lang = lang;
    }
    if let Some(lang) = env("APP__TARGET_LANG").and_then(|v| v.parse().ok()) {
        settings.target_lang = lang;
    }

    settings
}

fn apply_file(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.api_key {
        settings.api_key = v;
    }
    if let Some(v) = file_cfg.endpoint {
        settings.endpoint = v;
    }
    if let Some(v) = file_cfg.api_host {
        settings.api_host = v;
    }
    if let Some(v) = file_cfg.reveal_interval_ms {
        settings.reveal_interval_ms = v;
    }
    if let Some(lang) = file_cfg.source_lang.and_then(|v| v.parse().ok()) {
        settings.source_lang = lang;
    }
    if let Some(lang) = file_cfg.target_lang.and_then(|v| v.parse().ok()) {
        settings.target_lang = lang;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
