use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::stroke::{StrokeStyle, Tool};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image-preview";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Runtime configuration for the application
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Key for the image-generation service
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
    /// Where downloaded results are written (native only)
    pub download_dir: PathBuf,
    pub default_tool: Tool,
    pub default_color: String,
    pub default_line_width: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_owned(),
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            timeout_secs: 120,
            download_dir: PathBuf::from("."),
            default_tool: Tool::Pen,
            default_color: "#FFFFFF".to_owned(),
            default_line_width: 5,
        }
    }
}

impl AppConfig {
    /// Defaults overridden by environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by variables captured at compile time.
    ///
    /// Used by the web build, which has no process environment. A key set
    /// while building is embedded in the wasm binary and readable by anyone
    /// who downloads it.
    pub fn from_build_env() -> Self {
        Self::from_lookup(|key| {
            let value = match key {
                "GEMINI_API_KEY" => option_env!("GEMINI_API_KEY"),
                "API_KEY" => option_env!("API_KEY"),
                "DRAW_TO_IMAGE_MODEL" => option_env!("DRAW_TO_IMAGE_MODEL"),
                "DRAW_TO_IMAGE_ENDPOINT" => option_env!("DRAW_TO_IMAGE_ENDPOINT"),
                _ => None,
            };
            value.map(str::to_owned)
        })
    }

    /// Build a config from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        config.api_key = non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY"));
        if let Some(model) = non_empty("DRAW_TO_IMAGE_MODEL") {
            config.model = model;
        }
        if let Some(endpoint) = non_empty("DRAW_TO_IMAGE_ENDPOINT") {
            config.endpoint = endpoint.trim_end_matches('/').to_owned();
        }
        if let Some(timeout) = non_empty("DRAW_TO_IMAGE_TIMEOUT_SECS") {
            match timeout.trim().parse() {
                Ok(secs) => config.timeout_secs = secs,
                Err(err) => log::warn!("Ignoring DRAW_TO_IMAGE_TIMEOUT_SECS={}: {}", timeout, err),
            }
        }
        if let Some(dir) = non_empty("DRAW_TO_IMAGE_DOWNLOAD_DIR") {
            config.download_dir = PathBuf::from(dir);
        }

        if config.api_key.is_none() {
            log::warn!("No API key configured; image generation will be unavailable");
        }
        // api_key is never serialized
        log::debug!("Config: {}", serde_json::to_string(&config).unwrap_or_default());
        config
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Initial stroke style, falling back to the built-in default on a bad color
    pub fn default_style(&self) -> StrokeStyle {
        match StrokeStyle::from_hex(self.default_tool, &self.default_color, self.default_line_width) {
            Ok(style) => style,
            Err(err) => {
                log::warn!("{}", err);
                StrokeStyle::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(config.api_key, None);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.default_style(), StrokeStyle::default());
    }

    #[test]
    fn test_gemini_key_wins_over_api_key() {
        let config = AppConfig::from_lookup(lookup(&[("API_KEY", "a"), ("GEMINI_API_KEY", "b")]));
        assert_eq!(config.api_key.as_deref(), Some("b"));

        let config = AppConfig::from_lookup(lookup(&[("API_KEY", "a"), ("GEMINI_API_KEY", " ")]));
        assert_eq!(config.api_key.as_deref(), Some("a"));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DRAW_TO_IMAGE_ENDPOINT", "http://localhost:8080/"),
            ("DRAW_TO_IMAGE_TIMEOUT_SECS", "30"),
            ("DRAW_TO_IMAGE_MODEL", "other-model"),
        ]));
        assert_eq!(config.endpoint, "http://localhost:8080");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.model, "other-model");
    }

    #[test]
    fn test_serialized_config_omits_key() {
        let config = AppConfig::from_lookup(lookup(&[("API_KEY", "secret")]));
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));

        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.api_key, None);
        assert_eq!(parsed.model, config.model);
    }

    #[test]
    fn test_bad_timeout_keeps_default() {
        let config = AppConfig::from_lookup(lookup(&[("DRAW_TO_IMAGE_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.timeout_secs, 120);
    }
}
