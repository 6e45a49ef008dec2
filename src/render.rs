//! Terminal and machine-readable presentation of a [`StoryResult`].

use crate::error::Result;
use crate::types::StoryResult;
use std::fmt::Write as _;
use std::str::FromStr;

/// Output format for a rendered story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    #[cfg(feature = "yaml")]
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = crate::error::TaleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            #[cfg(feature = "yaml")]
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            other => Err(crate::error::TaleError::InvalidRequest(format!(
                "unknown output format '{}'",
                other
            ))),
        }
    }
}

/// Render a story in the requested format.
pub fn render(story: &StoryResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(story)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(story)?),
        #[cfg(feature = "yaml")]
        OutputFormat::Yaml => serde_yaml::to_string(story)
            .map_err(|e| crate::error::TaleError::Other(format!("YAML encoding failed: {}", e))),
    }
}

/// Plain-text view: weather banners, layers, story, sources.
///
/// Sections whose data is absent are left out entirely.
pub fn render_text(story: &StoryResult) -> String {
    let mut out = String::new();

    if let Some(ref weather) = story.weather_description {
        let _ = writeln!(out, "Current Weather: {}", weather);
    }
    if let Some(ref forecast) = story.forecast {
        let _ = writeln!(out, "3-Day Outlook: {}", forecast);
    }

    let layers = [
        ("Air Quality", &story.layers.air_quality),
        ("UV Index", &story.layers.uv_index),
        ("Wind", &story.layers.wind),
        ("Rain Chance", &story.layers.rain_chance),
    ];
    let present: Vec<String> = layers
        .iter()
        .filter_map(|&(name, value)| value.as_ref().map(|v| format!("{}: {}", name, v)))
        .collect();
    if !present.is_empty() {
        let _ = writeln!(out, "{}", present.join(" | "));
    }

    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(&story.content);
    out.push('\n');

    if !story.sources.is_empty() {
        out.push_str("\nWeather Data Sources\n");
        for source in &story.sources {
            let _ = writeln!(out, "  - {} <{}>", source.title, source.uri);
        }
    }

    out
}
