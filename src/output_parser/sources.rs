//! Citation cleanup for grounding metadata.

use crate::types::{Citation, GroundingChunk};
use std::collections::HashSet;

/// URI used when a web citation carries none.
pub const MISSING_URI: &str = "#";
/// Title used when a web citation carries none.
pub const MISSING_TITLE: &str = "Source";

/// Turn raw grounding chunks into displayable citations.
///
/// Chunks without a `web` record are skipped. Missing URIs and titles fall
/// back to [`MISSING_URI`] and [`MISSING_TITLE`]. Duplicate URIs are dropped,
/// keeping the first occurrence in its original position.
///
/// ```
/// use weather_tales::output_parser::collect_sources;
/// use weather_tales::GroundingChunk;
///
/// let chunks = vec![
///     GroundingChunk::web("a", "A1"),
///     GroundingChunk::web("b", "B"),
///     GroundingChunk::web("a", "A2"),
/// ];
/// let sources = collect_sources(&chunks);
/// assert_eq!(sources.len(), 2);
/// assert_eq!(sources[0].title, "A1");
/// ```
pub fn collect_sources(chunks: &[GroundingChunk]) -> Vec<Citation> {
    let mut seen = HashSet::new();
    chunks
        .iter()
        .filter_map(|chunk| chunk.web.as_ref())
        .map(|web| Citation {
            uri: web.uri.clone().unwrap_or_else(|| MISSING_URI.to_string()),
            title: web.title.clone().unwrap_or_else(|| MISSING_TITLE.to_string()),
        })
        .filter(|citation| seen.insert(citation.uri.clone()))
        .collect()
}
