//! # Story Output Parser
//!
//! Turns a raw model answer into a [`StoryResult`]. Parsing is permissive:
//! nothing here fails. Missing labels leave their fields unset and a missing
//! answer falls back to [`NO_STORY`].
//!
//! | Function | Purpose |
//! |----------|---------|
//! | [`extract`] | Full extraction: labels, content, sources |
//! | [`split_labels`] | Label lines only |
//! | [`match_label`] | Test a single line against the label grammar |
//! | [`collect_sources`] | Default and deduplicate grounding citations |

pub mod labels;
pub mod sources;

pub use labels::{match_label, split_labels, LabelField, LABELS};
pub use sources::collect_sources;

use crate::types::{GroundingChunk, StoryResult};

/// Text used when the model returned nothing.
pub const NO_STORY: &str = "No story generated.";

/// Build a [`StoryResult`] from the model's text and grounding chunks.
///
/// # Examples
///
/// ```
/// use weather_tales::output_parser::extract;
///
/// let text = "Weather Context: light drizzle\nForecast: clearing by Friday\n\
///             Layer - Wind: 12mph NE\n\nThe rain fell softly on the cobblestones.";
/// let story = extract(Some(text), &[]);
/// assert_eq!(story.weather_description.as_deref(), Some("light drizzle"));
/// assert_eq!(story.forecast.as_deref(), Some("clearing by Friday"));
/// assert_eq!(story.layers.wind.as_deref(), Some("12mph NE"));
/// assert_eq!(story.content, "The rain fell softly on the cobblestones.");
/// ```
pub fn extract(raw_text: Option<&str>, citations: &[GroundingChunk]) -> StoryResult {
    let text = match raw_text {
        Some(t) if !t.is_empty() => t,
        _ => NO_STORY,
    };

    let mut result = split_labels(text);
    result.sources = collect_sources(citations);
    result
}
