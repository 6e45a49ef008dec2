//! Event hooks for the story request lifecycle.
//!
//! Provides an optional, non-intrusive way to observe story generation,
//! e.g. to show a progress indicator while the model is working. Implement
//! [`EventHandler`] or wrap a closure in [`FnEventHandler`].

use crate::types::{Genre, Mood};
use std::sync::Arc;

/// Events emitted by [`StoryTeller`](crate::StoryTeller).
#[derive(Debug, Clone)]
pub enum Event {
    /// A request has been accepted and the model is being called.
    StoryStart {
        location: String,
        genre: Genre,
        mood: Mood,
    },
    /// The request finished.
    StoryEnd {
        /// Whether a story was produced.
        ok: bool,
        /// Number of distinct sources cited (0 on failure).
        sources: usize,
    },
}

/// Handler for story lifecycle events.
///
/// # Example
///
/// ```
/// use weather_tales::events::{Event, EventHandler};
///
/// struct PrintHandler;
///
/// impl EventHandler for PrintHandler {
///     fn on_event(&self, event: Event) {
///         match event {
///             Event::StoryStart { location, .. } => println!("[start] {}", location),
///             Event::StoryEnd { ok, .. } => println!("[end] ok={}", ok),
///         }
///     }
/// }
/// ```
pub trait EventHandler: Send + Sync {
    /// Called when the teller emits an event.
    fn on_event(&self, event: Event);
}

/// Emit an event if a handler is present. No-op otherwise.
pub(crate) fn emit(handler: &Option<Arc<dyn EventHandler>>, event: Event) {
    if let Some(ref h) = handler {
        h.on_event(event);
    }
}

/// An [`EventHandler`] backed by a closure.
///
/// ```
/// use weather_tales::events::{Event, FnEventHandler};
/// use std::sync::Arc;
///
/// let handler = Arc::new(FnEventHandler(|event: Event| {
///     if let Event::StoryStart { .. } = event {
///         eprintln!("Consulting the skies...");
///     }
/// }));
/// ```
pub struct FnEventHandler<F: Fn(Event) + Send + Sync>(pub F);

impl<F: Fn(Event) + Send + Sync> EventHandler for FnEventHandler<F> {
    fn on_event(&self, event: Event) {
        (self.0)(event);
    }
}
