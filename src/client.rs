//! Explicit configuration for the model client.
//!
//! There is no process-wide client: build a [`TaleConfig`] once (usually via
//! [`TaleConfig::from_env`]) and pass it to [`ExecCtx::from_config`](crate::ExecCtx::from_config).

use crate::error::{Result, TaleError};
use std::time::Duration;

/// Default Gemini model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
/// Default Gemini API host.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
/// Secondary API key variable, checked when [`API_KEY_VAR`] is unset.
pub const FALLBACK_API_KEY_VAR: &str = "API_KEY";
pub const MODEL_VAR: &str = "WEATHER_TALES_MODEL";
pub const BASE_URL_VAR: &str = "WEATHER_TALES_BASE_URL";

/// Configuration for story requests.
#[derive(Clone)]
pub struct TaleConfig {
    /// Gemini API key, sent as `x-goog-api-key`.
    pub api_key: String,

    /// Model identifier (e.g. `"gemini-2.5-flash"`).
    pub model: String,

    /// API host, without the `/v1beta` path.
    pub base_url: String,

    /// Sampling temperature. `None` leaves the provider default.
    pub temperature: Option<f64>,

    /// Output token cap. `None` leaves the provider default.
    pub max_output_tokens: Option<u32>,

    /// HTTP request timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for TaleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaleConfig")
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Keep at most the first six characters of a secret.
pub(crate) fn redact(key: &str) -> String {
    match key.get(..6) {
        Some(head) if key.len() > 6 => format!("{}***", head),
        _ => "***".to_string(),
    }
}

impl TaleConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: None,
            max_output_tokens: None,
            timeout: Duration::from_secs(60),
        }
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = get(API_KEY_VAR)
            .or_else(|| get(FALLBACK_API_KEY_VAR))
            .ok_or_else(|| {
                TaleError::InvalidConfig(format!(
                    "missing API key: set {} (or {})",
                    API_KEY_VAR, FALLBACK_API_KEY_VAR
                ))
            })?;

        let mut config = Self::new(api_key);
        if let Some(model) = get(MODEL_VAR) {
            config.model = model;
        }
        if let Some(url) = get(BASE_URL_VAR) {
            config.base_url = url;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_temperature(mut self, temp: f64) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reject configurations that cannot produce a working request.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(TaleError::InvalidConfig("API key is empty".into()));
        }
        if self.model.trim().is_empty() {
            return Err(TaleError::InvalidConfig("model is empty".into()));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(TaleError::InvalidConfig(format!(
                "base URL must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(TaleError::InvalidConfig(format!(
                    "temperature must be within 0.0..=2.0, got {}",
                    t
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = TaleConfig::new("key");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.temperature.is_none());
        assert!(config.max_output_tokens.is_none());
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_config_builder() {
        let config = TaleConfig::new("key")
            .with_model("gemini-2.5-pro")
            .with_temperature(0.3)
            .with_max_output_tokens(1024)
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.temperature, Some(0.3));
        assert_eq!(config.max_output_tokens, Some(1024));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn from_lookup_requires_key() {
        let err = TaleConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, TaleError::InvalidConfig(_)));

        let err = TaleConfig::from_lookup(lookup(&[(API_KEY_VAR, "  ")])).unwrap_err();
        assert!(matches!(err, TaleError::InvalidConfig(_)));
    }

    #[test]
    fn from_lookup_prefers_primary_key() {
        let config = TaleConfig::from_lookup(lookup(&[
            (API_KEY_VAR, "primary"),
            (FALLBACK_API_KEY_VAR, "fallback"),
        ]))
        .unwrap();
        assert_eq!(config.api_key, "primary");

        let config = TaleConfig::from_lookup(lookup(&[(FALLBACK_API_KEY_VAR, "fallback")])).unwrap();
        assert_eq!(config.api_key, "fallback");
    }

    #[test]
    fn from_lookup_overrides() {
        let config = TaleConfig::from_lookup(lookup(&[
            (API_KEY_VAR, "k"),
            (MODEL_VAR, "gemini-2.0-flash"),
            (BASE_URL_VAR, "http://localhost:8080"),
        ]))
        .unwrap();
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.base_url, "http://localhost:8080");
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(TaleConfig::new("k").with_base_url("ftp://x").validate().is_err());
        assert!(TaleConfig::new("k").with_temperature(3.5).validate().is_err());
        assert!(TaleConfig::new("k").with_model("").validate().is_err());
        assert!(TaleConfig::new("k").validate().is_ok());
    }

    #[test]
    fn debug_redacts_key() {
        let rendered = format!("{:?}", TaleConfig::new("AIzaSyVerySecret"));
        assert!(rendered.contains("AIzaSy***"));
        assert!(!rendered.contains("VerySecret"));
        assert_eq!(redact("short"), "***");
    }
}
