//! Execution context for story requests.
//!
//! [`ExecCtx`] carries the HTTP client, model backend, base URL, model
//! settings and optional event handler. Build it once from a
//! [`TaleConfig`] and hand it to a [`StoryTeller`](crate::StoryTeller).

use crate::backend::{Backend, GeminiBackend};
use crate::client::TaleConfig;
use crate::error::{Result, TaleError};
use crate::events::EventHandler;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Shared execution context for story requests.
///
/// # Example
///
/// ```
/// use weather_tales::{ExecCtx, TaleConfig};
///
/// let ctx = ExecCtx::from_config(&TaleConfig::new("AIza-test-key")).unwrap();
/// assert_eq!(ctx.base_url, "https://generativelanguage.googleapis.com");
/// ```
pub struct ExecCtx {
    /// HTTP client (cheap to clone -- uses `Arc` internally).
    pub client: Client,
    /// Provider host, normalized without version path.
    pub base_url: String,
    /// Model backend. Default: [`GeminiBackend`].
    pub backend: Arc<dyn Backend>,
    /// Model, temperature and token settings used to build requests.
    pub config: TaleConfig,
    /// Optional event handler for lifecycle events.
    pub event_handler: Option<Arc<dyn EventHandler>>,
}

impl ExecCtx {
    /// Create a builder seeded from `config`.
    pub fn builder(config: TaleConfig) -> ExecCtxBuilder {
        ExecCtxBuilder {
            client: None,
            backend: None,
            event_handler: None,
            timeout: None,
            config,
        }
    }

    /// Validate `config` and build a context that talks to Gemini.
    pub fn from_config(config: &TaleConfig) -> Result<Self> {
        config.validate()?;
        Self::builder(config.clone()).build()
    }
}

impl std::fmt::Debug for ExecCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecCtx")
            .field("base_url", &self.base_url)
            .field("backend", &self.backend.name())
            .field("model", &self.config.model)
            .field("has_event_handler", &self.event_handler.is_some())
            .finish()
    }
}

/// Builder for [`ExecCtx`].
pub struct ExecCtxBuilder {
    client: Option<Client>,
    backend: Option<Arc<dyn Backend>>,
    event_handler: Option<Arc<dyn EventHandler>>,
    timeout: Option<Duration>,
    config: TaleConfig,
}

impl ExecCtxBuilder {
    /// Set the HTTP client. If not set, a default client is created.
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the model backend. Default: [`GeminiBackend`] with the config's key.
    pub fn backend(mut self, backend: Arc<dyn Backend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Set the event handler.
    pub fn event_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    /// Override the request timeout from the config.
    ///
    /// Ignored when a custom `Client` is provided via `.client()`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the execution context.
    pub fn build(self) -> Result<ExecCtx> {
        let timeout = self.timeout.unwrap_or(self.config.timeout);
        let client = match self.client {
            Some(c) => c,
            None => Client::builder().timeout(timeout).build().map_err(|e| {
                TaleError::InvalidConfig(format!("failed to build HTTP client: {}", e))
            })?,
        };
        let backend = self
            .backend
            .unwrap_or_else(|| Arc::new(GeminiBackend::new(self.config.api_key.clone())));
        Ok(ExecCtx {
            client,
            base_url: normalize_base_url(&self.config.base_url),
            backend,
            config: self.config,
            event_handler: self.event_handler,
        })
    }
}

/// Strip known API path suffixes from a base URL.
/// This prevents double-pathing when the backend appends its own path.
/// e.g., "https://generativelanguage.googleapis.com/v1beta" -> "https://generativelanguage.googleapis.com"
fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    for suffix in &["/v1beta/models", "/v1beta", "/v1/models", "/v1"] {
        if let Some(stripped) = trimmed.strip_suffix(suffix) {
            return stripped.to_string();
        }
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockBackend;

    #[test]
    fn test_normalize_base_url_strips_version() {
        assert_eq!(
            normalize_base_url("https://generativelanguage.googleapis.com/v1beta"),
            "https://generativelanguage.googleapis.com"
        );
        assert_eq!(
            normalize_base_url("https://generativelanguage.googleapis.com/v1beta/models/"),
            "https://generativelanguage.googleapis.com"
        );
        assert_eq!(normalize_base_url("http://localhost:8080/v1"), "http://localhost:8080");
    }

    #[test]
    fn test_normalize_base_url_preserves_clean() {
        assert_eq!(normalize_base_url("http://localhost:8080"), "http://localhost:8080");
        assert_eq!(normalize_base_url("http://localhost:8080/"), "http://localhost:8080");
    }

    #[test]
    fn test_default_backend_is_gemini() {
        let ctx = ExecCtx::builder(TaleConfig::new("k")).build().unwrap();
        assert_eq!(ctx.backend.name(), "gemini");
    }

    #[test]
    fn test_custom_backend_and_timeout() {
        let ctx = ExecCtx::builder(TaleConfig::new("k"))
            .backend(Arc::new(MockBackend::fixed("x")))
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap();
        assert_eq!(ctx.backend.name(), "mock");
    }

    #[test]
    fn test_from_config_validates() {
        let bad = TaleConfig::new("k").with_base_url("localhost");
        assert!(matches!(ExecCtx::from_config(&bad), Err(TaleError::InvalidConfig(_))));
    }

    #[test]
    fn test_debug_hides_key() {
        let ctx = ExecCtx::from_config(&TaleConfig::new("AIzaSyVerySecret")).unwrap();
        let rendered = format!("{:?}", ctx);
        assert!(!rendered.contains("VerySecret"));
        assert!(rendered.contains("gemini-2.5-flash"));
    }
}
