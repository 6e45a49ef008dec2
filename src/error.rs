use thiserror::Error;

/// Message shown to the user whenever a story could not be produced.
pub const STORY_FAILED_MESSAGE: &str = "Failed to weave the story. Please try again.";

/// Errors produced by the story teller and its components.
#[derive(Error, Debug)]
pub enum TaleError {
    /// Low-level HTTP transport failure (connection refused, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing failed at the serde level.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The provider answered with a non-success status code.
    #[error("HTTP {status}: {body}")]
    Http {
        /// HTTP status code (e.g. 400, 429, 500).
        status: u16,
        /// Response body text.
        body: String,
    },

    /// Invalid configuration detected at build time (missing API key, bad URL).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The story request itself was rejected before any call was made.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Another story is still being generated by the same teller.
    #[error("A story is already being generated")]
    Busy,

    /// The model invocation failed.
    ///
    /// Displays as the single user-facing message; the underlying cause is
    /// available through [`std::error::Error::source`].
    #[error("{}", STORY_FAILED_MESSAGE)]
    StoryFailed(#[source] Box<TaleError>),

    /// Catch-all for other errors.
    #[error("{0}")]
    Other(String),
}

impl TaleError {
    /// Wrap any error into the single user-facing failure category.
    pub fn story_failed(cause: TaleError) -> Self {
        match cause {
            already @ TaleError::StoryFailed(_) => already,
            other => TaleError::StoryFailed(Box::new(other)),
        }
    }
}

impl From<anyhow::Error> for TaleError {
    fn from(err: anyhow::Error) -> Self {
        TaleError::Other(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TaleError>;
