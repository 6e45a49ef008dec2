//! Mock backend for testing without a live model.
//!
//! [`MockBackend`] returns pre-configured responses in order, allowing
//! deterministic tests and offline demos.
//!
//! # Example
//!
//! ```
//! use weather_tales::backend::MockBackend;
//!
//! let mock = MockBackend::fixed("Forecast: sunny\nOnce upon a time...");
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use reqwest::Client;

use super::{Backend, GenerateRequest, GenerateResponse};
use crate::error::{Result, TaleError};
use crate::types::GroundingChunk;

/// One canned reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Succeed with this text (or no text) and these grounding chunks.
    Answer {
        text: Option<String>,
        grounding: Vec<GroundingChunk>,
    },
    /// Fail with an HTTP error carrying this status and body.
    Fail { status: u16, body: String },
}

/// A test backend that returns canned replies in order.
///
/// Cycles back to the beginning when all replies have been consumed.
#[derive(Debug)]
pub struct MockBackend {
    replies: Vec<MockReply>,
    index: AtomicUsize,
    calls: AtomicUsize,
}

impl MockBackend {
    /// Create a mock backend with the given canned replies.
    pub fn new(replies: Vec<MockReply>) -> Self {
        assert!(!replies.is_empty(), "MockBackend requires at least one reply");
        Self {
            replies,
            index: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a mock that always returns the same text with no citations.
    pub fn fixed(text: impl Into<String>) -> Self {
        Self::grounded(text, Vec::new())
    }

    /// Create a mock that always returns the same text and citations.
    pub fn grounded(text: impl Into<String>, grounding: Vec<GroundingChunk>) -> Self {
        Self::new(vec![MockReply::Answer {
            text: Some(text.into()),
            grounding,
        }])
    }

    /// Create a mock whose answer carries no text at all.
    pub fn silent() -> Self {
        Self::new(vec![MockReply::Answer {
            text: None,
            grounding: Vec::new(),
        }])
    }

    /// Create a mock that always fails with the given status.
    pub fn failing(status: u16, body: impl Into<String>) -> Self {
        Self::new(vec![MockReply::Fail {
            status,
            body: body.into(),
        }])
    }

    /// Number of `generate` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    fn next_reply(&self) -> MockReply {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let idx = self.index.fetch_add(1, Ordering::Relaxed) % self.replies.len();
        self.replies[idx].clone()
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn generate(
        &self,
        _client: &Client,
        _base_url: &str,
        _request: &GenerateRequest,
    ) -> Result<GenerateResponse> {
        match self.next_reply() {
            MockReply::Answer { text, grounding } => Ok(GenerateResponse {
                text,
                grounding,
                status: 200,
                metadata: None,
            }),
            MockReply::Fail { status, body } => Err(TaleError::Http { status, body }),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerateRequest {
        GenerateRequest {
            model: "test".to_string(),
            prompt: "test".to_string(),
            search_grounding: true,
            temperature: None,
            max_output_tokens: None,
        }
    }

    #[tokio::test]
    async fn test_mock_fixed_response() {
        let mock = MockBackend::fixed("Hello!");
        let client = Client::new();
        let resp = mock.generate(&client, "http://unused", &request()).await.unwrap();
        assert_eq!(resp.text.as_deref(), Some("Hello!"));
        assert_eq!(resp.status, 200);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_cycles_replies() {
        let mock = MockBackend::new(vec![
            MockReply::Answer {
                text: Some("first".into()),
                grounding: vec![],
            },
            MockReply::Fail {
                status: 503,
                body: "overloaded".into(),
            },
        ]);
        let client = Client::new();
        let r1 = mock.generate(&client, "http://unused", &request()).await;
        let r2 = mock.generate(&client, "http://unused", &request()).await;
        let r3 = mock.generate(&client, "http://unused", &request()).await;
        assert_eq!(r1.unwrap().text.as_deref(), Some("first"));
        assert!(matches!(r2, Err(TaleError::Http { status: 503, .. })));
        assert_eq!(r3.unwrap().text.as_deref(), Some("first")); // cycles
        assert_eq!(mock.calls(), 3);
    }

    #[tokio::test]
    async fn test_mock_grounding_passthrough() {
        let mock = MockBackend::grounded("x", vec![GroundingChunk::web("u", "t")]);
        let client = Client::new();
        let resp = mock.generate(&client, "http://unused", &request()).await.unwrap();
        assert_eq!(resp.grounding, vec![GroundingChunk::web("u", "t")]);
    }

    #[test]
    fn test_mock_silent_blocking() {
        let mock = MockBackend::silent();
        let client = Client::new();
        let resp = tokio_test::block_on(mock.generate(&client, "http://unused", &request())).unwrap();
        assert!(resp.text.is_none());
    }
}
