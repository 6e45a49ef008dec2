//! Backend for the Gemini `generateContent` API.
//!
//! [`GeminiBackend`] translates a [`GenerateRequest`] into
//! `POST {base}/v1beta/models/{model}:generateContent` with the
//! `google_search` tool enabled, and reads the first candidate's text plus
//! its grounding chunks.
//!
//! JSON response mode and response schemas are never requested: the API
//! rejects them when search grounding is on.

use super::{Backend, GenerateRequest, GenerateResponse};
use crate::client::redact;
use crate::error::{Result, TaleError};
use crate::types::GroundingChunk;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

const API_VERSION: &str = "v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Backend for Google's Gemini API.
///
/// # Example
///
/// ```
/// use weather_tales::backend::GeminiBackend;
///
/// let backend = GeminiBackend::new("AIza...");
/// assert!(backend.has_api_key());
/// ```
#[derive(Clone)]
pub struct GeminiBackend {
    api_key: String,
}

impl std::fmt::Debug for GeminiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiBackend")
            .field("api_key", &redact(&self.api_key))
            .finish()
    }
}

/// Wire shape of a `generateContent` response. Only the fields we read.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
    #[serde(default)]
    usage_metadata: Option<Value>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCandidate {
    #[serde(default)]
    content: Option<WireContent>,
    #[serde(default)]
    finish_reason: Option<String>,
    #[serde(default)]
    grounding_metadata: Option<WireGrounding>,
}

#[derive(Debug, Default, Deserialize)]
struct WireContent {
    #[serde(default)]
    parts: Vec<WirePart>,
}

#[derive(Debug, Default, Deserialize)]
struct WirePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireGrounding {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
    #[serde(default)]
    web_search_queries: Vec<String>,
}

impl GeminiBackend {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Endpoint URL for a model.
    fn endpoint(base_url: &str, model: &str) -> String {
        format!(
            "{}/{}/models/{}:generateContent",
            base_url.trim_end_matches('/'),
            API_VERSION,
            model
        )
    }

    /// Build the JSON body for `generateContent`.
    fn build_body(request: &GenerateRequest) -> Value {
        let mut body = json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": request.prompt}],
            }],
        });

        if request.search_grounding {
            body["tools"] = json!([{"google_search": {}}]);
        }

        let mut generation = serde_json::Map::new();
        if let Some(t) = request.temperature {
            generation.insert("temperature".into(), json!(t));
        }
        if let Some(n) = request.max_output_tokens {
            generation.insert("maxOutputTokens".into(), json!(n));
        }
        if !generation.is_empty() {
            body["generationConfig"] = Value::Object(generation);
        }

        body
    }

    /// Turn a decoded response into the normalized form.
    ///
    /// Text is the concatenation of the first candidate's non-thought text
    /// parts; `None` if there are none.
    fn normalize(wire: WireResponse, status: u16) -> GenerateResponse {
        let WireResponse {
            candidates,
            usage_metadata,
            model_version,
        } = wire;

        let first = candidates.into_iter().next().unwrap_or_default();

        let texts: Vec<String> = first
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter(|p| !p.thought)
            .filter_map(|p| p.text)
            .collect();
        let text = if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        };

        let grounding = first.grounding_metadata.unwrap_or_default();

        let mut meta = serde_json::Map::new();
        if let Some(v) = usage_metadata {
            meta.insert("usage".into(), v);
        }
        if let Some(v) = model_version {
            meta.insert("model_version".into(), json!(v));
        }
        if let Some(v) = first.finish_reason {
            meta.insert("finish_reason".into(), json!(v));
        }
        if !grounding.web_search_queries.is_empty() {
            meta.insert(
                "web_search_queries".into(),
                json!(grounding.web_search_queries),
            );
        }

        GenerateResponse {
            text,
            grounding: grounding.grounding_chunks,
            status,
            metadata: if meta.is_empty() {
                None
            } else {
                Some(Value::Object(meta))
            },
        }
    }
}

#[async_trait]
impl Backend for GeminiBackend {
    async fn generate(
        &self,
        client: &Client,
        base_url: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse> {
        let url = Self::endpoint(base_url, &request.model);
        let body = Self::build_body(request);

        tracing::debug!(
            url = %url,
            model = %request.model,
            grounded = request.search_grounding,
            "sending generateContent request"
        );

        let resp = client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();

        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            tracing::warn!(status, "Gemini returned an error status");
            return Err(TaleError::Http { status, body: text });
        }

        let wire: WireResponse = resp.json().await?;
        let response = Self::normalize(wire, status);
        tracing::debug!(
            status,
            has_text = response.text.is_some(),
            grounding_chunks = response.grounding.len(),
            "received generateContent response"
        );
        Ok(response)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}
