//! Label-line grammar for weather metadata embedded in story text.
//!
//! The model is asked to open its answer with six `Label: value` lines.
//! [`split_labels`] pulls those lines out of the text and returns the
//! remaining narrative untouched.

use crate::types::StoryResult;

/// Field a label line is written into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelField {
    WeatherDescription,
    Forecast,
    AirQuality,
    UvIndex,
    Wind,
    RainChance,
}

/// Recognized label prefixes, lowercase, in matching order.
///
/// No entry is a prefix of another, so at most one can match a line.
pub const LABELS: &[(&str, LabelField)] = &[
    ("weather context:", LabelField::WeatherDescription),
    ("forecast:", LabelField::Forecast),
    ("layer - air quality:", LabelField::AirQuality),
    ("layer - uv index:", LabelField::UvIndex),
    ("layer - wind:", LabelField::Wind),
    ("layer - rain chance:", LabelField::RainChance),
];

impl LabelField {
    /// Overwrite the slot this field maps to.
    fn assign(self, result: &mut StoryResult, value: String) {
        let slot = match self {
            LabelField::WeatherDescription => &mut result.weather_description,
            LabelField::Forecast => &mut result.forecast,
            LabelField::AirQuality => &mut result.layers.air_quality,
            LabelField::UvIndex => &mut result.layers.uv_index,
            LabelField::Wind => &mut result.layers.wind,
            LabelField::RainChance => &mut result.layers.rain_chance,
        };
        *slot = Some(value);
    }
}

/// Match one line against [`LABELS`].
///
/// The test runs on the trimmed line and ignores ASCII case of the label
/// only. Returns the field and the value with the label and surrounding
/// whitespace removed; the value keeps its original casing.
///
/// ```
/// use weather_tales::output_parser::labels::{match_label, LabelField};
///
/// let (field, value) = match_label("  FORECAST:   Sunny Tomorrow ").unwrap();
/// assert_eq!(field, LabelField::Forecast);
/// assert_eq!(value, "Sunny Tomorrow");
/// assert!(match_label("The forecast: grim").is_none());
/// ```
pub fn match_label(line: &str) -> Option<(LabelField, &str)> {
    let trimmed = line.trim();
    LABELS.iter().find_map(|&(prefix, field)| {
        let head = trimmed.get(..prefix.len())?;
        if head.eq_ignore_ascii_case(prefix) {
            Some((field, trimmed[prefix.len()..].trim()))
        } else {
            None
        }
    })
}

/// Separate label lines from narrative text.
///
/// Returns a [`StoryResult`] whose metadata fields hold the last value seen
/// for each label and whose `content` is every other line joined with `\n`
/// and trimmed. `sources` is left empty.
pub fn split_labels(text: &str) -> StoryResult {
    let mut result = StoryResult::default();
    let mut body: Vec<&str> = Vec::new();

    for line in text.split('\n') {
        match match_label(line) {
            Some((field, value)) => field.assign(&mut result, value.to_string()),
            None => body.push(line),
        }
    }

    result.content = body.join("\n").trim().to_string();
    result
}
