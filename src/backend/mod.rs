//! Backend trait and normalized request/response types.
//!
//! The [`Backend`] trait abstracts over the model provider, translating
//! between the normalized [`GenerateRequest`]/[`GenerateResponse`] types and
//! the provider's HTTP API. Built-in implementations: [`GeminiBackend`] and
//! [`MockBackend`].
//!
//! ## Architecture
//!
//! ```text
//! StoryTeller ──► GenerateRequest ──► Backend::generate() ──► GenerateResponse
//!                                            │
//!                                 ┌──────────┴──────────┐
//!                           GeminiBackend           MockBackend
//!               /v1beta/models/{m}:generateContent   canned replies
//!                     google_search grounding
//! ```

pub mod gemini;
pub mod mock;

pub use gemini::GeminiBackend;
pub use mock::MockBackend;

use crate::client::TaleConfig;
use crate::error::Result;
use crate::types::GroundingChunk;
use async_trait::async_trait;
use reqwest::Client;

/// A normalized model request.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Model identifier (e.g. `"gemini-2.5-flash"`).
    pub model: String,

    /// The full prompt text.
    pub prompt: String,

    /// Ask the provider to ground the answer with live web search.
    pub search_grounding: bool,

    /// Sampling temperature, if overridden.
    pub temperature: Option<f64>,

    /// Output token cap, if overridden.
    pub max_output_tokens: Option<u32>,
}

impl GenerateRequest {
    /// A grounded request for `prompt` using the model and sampling settings in `config`.
    pub fn grounded(config: &TaleConfig, prompt: impl Into<String>) -> Self {
        Self {
            model: config.model.clone(),
            prompt: prompt.into(),
            search_grounding: true,
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        }
    }
}

/// A normalized model response.
#[derive(Debug, Clone, Default)]
pub struct GenerateResponse {
    /// Generated text. `None` when the provider returned no text parts.
    pub text: Option<String>,

    /// Grounding citations attached to the answer, in provider order.
    pub grounding: Vec<GroundingChunk>,

    /// HTTP status code (for diagnostics/logging).
    pub status: u16,

    /// Provider-specific metadata (token counts, model version, search queries).
    pub metadata: Option<serde_json::Value>,
}

/// Abstraction over model providers.
///
/// # Object Safety
///
/// This trait is object-safe and designed to be used as `Arc<dyn Backend>`.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Execute one non-streaming generation call.
    async fn generate(
        &self,
        client: &Client,
        base_url: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse>;

    /// Human-readable name for logging and diagnostics.
    fn name(&self) -> &'static str;
}
