//! # Weather Tales
//!
//! Short stories inspired by the real weather at a place.
//!
//! A [`StoryRequest`] (location, genre, mood) becomes one prompt that asks
//! Gemini, with Google Search grounding, to look up the current weather and
//! 3-day forecast and write a story around them. The answer opens with six
//! `Label: value` lines which are pulled out into a [`StoryResult`] next to
//! the story body and its cited sources.
//!
//! ## Core Concepts
//!
//! - **[`prompt::build_prompt`]** — pure prompt construction.
//! - **[`output_parser::extract`]** — pure, never-failing extraction of
//!   label lines, story body and deduplicated citations.
//! - **[`Backend`]** — object-safe trait over the model provider;
//!   [`GeminiBackend`] for real calls, [`MockBackend`] for tests.
//! - **[`ExecCtx`]** — HTTP client, backend and [`TaleConfig`], built once.
//! - **[`StoryTeller`]** — runs one request at a time and maps any provider
//!   failure to a single user-facing error.
//!
//! ## Quick Start
//!
//! ```no_run
//! use weather_tales::{ExecCtx, Genre, Mood, StoryRequest, StoryTeller, TaleConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TaleConfig::from_env()?;
//!     let teller = StoryTeller::new(ExecCtx::from_config(&config)?);
//!
//!     let request = StoryRequest::new("Kyoto", Genre::Poetry, Mood::Reflective)?;
//!     let story = teller.tell(&request).await?;
//!     println!("{}", weather_tales::render::render_text(&story));
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod client;
pub mod error;
pub mod events;
pub mod exec_ctx;
pub mod output_parser;
pub mod prompt;
pub mod render;
pub mod teller;
pub mod types;

pub use backend::{Backend, GeminiBackend, GenerateRequest, GenerateResponse, MockBackend};
pub use client::TaleConfig;
pub use error::{Result, TaleError, STORY_FAILED_MESSAGE};
pub use exec_ctx::{ExecCtx, ExecCtxBuilder};
pub use output_parser::extract;
pub use prompt::build_prompt;
pub use render::OutputFormat;
pub use teller::StoryTeller;
pub use types::{
    Citation, Coordinates, Genre, GroundingChunk, Mood, StoryRequest, StoryResult, WeatherLayers,
    WebSource,
};
