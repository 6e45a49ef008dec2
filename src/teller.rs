//! The story request lifecycle: prompt, one model call, extraction.

use crate::backend::GenerateRequest;
use crate::error::{Result, TaleError};
use crate::events::{emit, Event};
use crate::exec_ctx::ExecCtx;
use crate::output_parser;
use crate::prompt::build_prompt;
use crate::types::{StoryRequest, StoryResult};
use std::sync::atomic::{AtomicBool, Ordering};

/// Turns [`StoryRequest`]s into [`StoryResult`]s, one at a time.
///
/// A teller refuses to start a second story while one is in flight
/// ([`TaleError::Busy`]). Nothing is retried: any failure of the model call
/// is logged and returned as [`TaleError::StoryFailed`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use weather_tales::{ExecCtx, Genre, MockBackend, Mood, StoryRequest, StoryTeller, TaleConfig};
///
/// # tokio_test::block_on(async {
/// let ctx = ExecCtx::builder(TaleConfig::new("unused"))
///     .backend(Arc::new(MockBackend::fixed("Forecast: snow\nThe owl waited.")))
///     .build()
///     .unwrap();
/// let teller = StoryTeller::new(ctx);
/// let request = StoryRequest::new("Tromsø", Genre::Fantasy, Mood::Cozy).unwrap();
/// let story = teller.tell(&request).await.unwrap();
/// assert_eq!(story.forecast.as_deref(), Some("snow"));
/// assert_eq!(story.content, "The owl waited.");
/// # });
/// ```
#[derive(Debug)]
pub struct StoryTeller {
    ctx: ExecCtx,
    busy: AtomicBool,
}

/// Clears the busy flag when the request ends, however it ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl StoryTeller {
    pub fn new(ctx: ExecCtx) -> Self {
        Self {
            ctx,
            busy: AtomicBool::new(false),
        }
    }

    pub fn ctx(&self) -> &ExecCtx {
        &self.ctx
    }

    /// Whether a story is currently being generated.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Generate one story.
    pub async fn tell(&self, request: &StoryRequest) -> Result<StoryResult> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(TaleError::Busy);
        }
        let _guard = BusyGuard(&self.busy);

        emit(
            &self.ctx.event_handler,
            Event::StoryStart {
                location: request.location().to_string(),
                genre: request.genre(),
                mood: request.mood(),
            },
        );

        let prompt = build_prompt(request);
        let generate = GenerateRequest::grounded(&self.ctx.config, prompt);

        let response = match self
            .ctx
            .backend
            .generate(&self.ctx.client, &self.ctx.base_url, &generate)
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    backend = self.ctx.backend.name(),
                    error = %e,
                    "story generation failed"
                );
                emit(
                    &self.ctx.event_handler,
                    Event::StoryEnd {
                        ok: false,
                        sources: 0,
                    },
                );
                return Err(TaleError::story_failed(e));
            }
        };

        let story = output_parser::extract(response.text.as_deref(), &response.grounding);

        tracing::info!(
            backend = self.ctx.backend.name(),
            sources = story.sources.len(),
            weather = story.weather_description.is_some(),
            forecast = story.forecast.is_some(),
            layers = !story.layers.is_empty(),
            "story extracted"
        );
        if let Some(ref meta) = response.metadata {
            tracing::debug!(metadata = %meta, "provider metadata");
        }

        emit(
            &self.ctx.event_handler,
            Event::StoryEnd {
                ok: true,
                sources: story.sources.len(),
            },
        );
        Ok(story)
    }
}
