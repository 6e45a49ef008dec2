use crate::error::{Result, TaleError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Narrative genre of the requested story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Genre {
    /// Plain language, capped length. The only genre that adds a style clause.
    #[default]
    #[serde(rename = "Simple Story")]
    Simple,
    Fantasy,
    #[serde(rename = "Sci-Fi")]
    SciFi,
    Mystery,
    Romance,
    Horror,
    Adventure,
    Poetry,
    Noir,
}

impl Genre {
    pub const ALL: [Genre; 9] = [
        Genre::Simple,
        Genre::Fantasy,
        Genre::SciFi,
        Genre::Mystery,
        Genre::Romance,
        Genre::Horror,
        Genre::Adventure,
        Genre::Poetry,
        Genre::Noir,
    ];

    /// Human-readable tag, as substituted into the prompt.
    pub fn label(self) -> &'static str {
        match self {
            Genre::Simple => "Simple Story",
            Genre::Fantasy => "Fantasy",
            Genre::SciFi => "Sci-Fi",
            Genre::Mystery => "Mystery",
            Genre::Romance => "Romance",
            Genre::Horror => "Horror",
            Genre::Adventure => "Adventure",
            Genre::Poetry => "Poetry",
            Genre::Noir => "Noir",
        }
    }

    pub fn is_simple(self) -> bool {
        self == Genre::Simple
    }
}

/// Mood the story should evoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mood {
    Cozy,
    Ominous,
    Melancholic,
    Energetic,
    #[default]
    Whimsical,
    Reflective,
}

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::Cozy,
        Mood::Ominous,
        Mood::Melancholic,
        Mood::Energetic,
        Mood::Whimsical,
        Mood::Reflective,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Mood::Cozy => "Cozy",
            Mood::Ominous => "Ominous",
            Mood::Melancholic => "Melancholic",
            Mood::Energetic => "Energetic",
            Mood::Whimsical => "Whimsical",
            Mood::Reflective => "Reflective",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fold a tag for lenient comparison: lowercase, drop spaces, hyphens, underscores.
fn fold_tag(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for Genre {
    type Err = TaleError;

    fn from_str(s: &str) -> Result<Self> {
        let folded = fold_tag(s);
        if folded == "simple" {
            return Ok(Genre::Simple);
        }
        Genre::ALL
            .into_iter()
            .find(|g| fold_tag(g.label()) == folded)
            .ok_or_else(|| TaleError::InvalidRequest(format!("unknown genre '{}'", s)))
    }
}

impl FromStr for Mood {
    type Err = TaleError;

    fn from_str(s: &str) -> Result<Self> {
        let folded = fold_tag(s);
        Mood::ALL
            .into_iter()
            .find(|m| fold_tag(m.label()) == folded)
            .ok_or_else(|| TaleError::InvalidRequest(format!("unknown mood '{}'", s)))
    }
}

/// A latitude/longitude pair from a device or the command line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Formats as `"<lat>, <lon>"`, the text placed into a request's location.
impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// One story submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryRequest {
    location: String,
    genre: Genre,
    mood: Mood,
}

impl StoryRequest {
    /// Build a request. The location is kept verbatim but must contain
    /// something other than whitespace.
    pub fn new(location: impl Into<String>, genre: Genre, mood: Mood) -> Result<Self> {
        let location = location.into();
        if location.trim().is_empty() {
            return Err(TaleError::InvalidRequest("location must not be empty".into()));
        }
        Ok(Self {
            location,
            genre,
            mood,
        })
    }

    pub fn at_coordinates(coords: Coordinates, genre: Genre, mood: Mood) -> Self {
        Self {
            location: coords.to_string(),
            genre,
            mood,
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn genre(&self) -> Genre {
        self.genre
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }
}

/// A web source cited by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub uri: String,
    pub title: String,
}

/// Raw grounding chunk as returned by the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroundingChunk {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<WebSource>,
}

/// The `web` sub-record of a grounding chunk. Either field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl GroundingChunk {
    pub fn web(uri: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            web: Some(WebSource {
                uri: Some(uri.into()),
                title: Some(title.into()),
            }),
        }
    }
}

/// Optional weather details, each set only when its label line was found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherLayers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub air_quality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uv_index: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rain_chance: Option<String>,
}

impl WeatherLayers {
    pub fn is_empty(&self) -> bool {
        self.air_quality.is_none()
            && self.uv_index.is_none()
            && self.wind.is_none()
            && self.rain_chance.is_none()
    }
}

/// The displayable outcome of one story request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryResult {
    /// Narrative body with every label line removed.
    pub content: String,
    /// Cited web sources, unique by URI, in order of first appearance.
    pub sources: Vec<Citation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast: Option<String>,
    #[serde(default)]
    pub layers: WeatherLayers,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genre_parses_labels_and_slugs() {
        assert_eq!("Sci-Fi".parse::<Genre>().unwrap(), Genre::SciFi);
        assert_eq!("scifi".parse::<Genre>().unwrap(), Genre::SciFi);
        assert_eq!("simple".parse::<Genre>().unwrap(), Genre::Simple);
        assert_eq!("simple-story".parse::<Genre>().unwrap(), Genre::Simple);
        assert_eq!("NOIR".parse::<Genre>().unwrap(), Genre::Noir);
        assert!("western".parse::<Genre>().is_err());
    }

    #[test]
    fn mood_parses_case_insensitively() {
        assert_eq!("ominous".parse::<Mood>().unwrap(), Mood::Ominous);
        assert!("grumpy".parse::<Mood>().is_err());
    }

    #[test]
    fn defaults_match_form() {
        assert_eq!(Genre::default(), Genre::Simple);
        assert_eq!(Mood::default(), Mood::Whimsical);
    }

    #[test]
    fn genre_serializes_as_label() {
        let json = serde_json::to_string(&Genre::Simple).unwrap();
        assert_eq!(json, "\"Simple Story\"");
    }

    #[test]
    fn request_rejects_blank_location() {
        assert!(StoryRequest::new("   ", Genre::Noir, Mood::Cozy).is_err());
        let req = StoryRequest::new(" Lisbon ", Genre::Noir, Mood::Cozy).unwrap();
        assert_eq!(req.location(), " Lisbon ");
    }

    #[test]
    fn coordinates_become_location_text() {
        let req = StoryRequest::at_coordinates(
            Coordinates::new(51.5, -0.12),
            Genre::Fantasy,
            Mood::Cozy,
        );
        assert_eq!(req.location(), "51.5, -0.12");
    }

    #[test]
    fn story_result_serializes_camel_case_and_omits_absent() {
        let result = StoryResult {
            content: "Once.".into(),
            weather_description: Some("fog".into()),
            layers: WeatherLayers {
                uv_index: Some("2".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["weatherDescription"], "fog");
        assert_eq!(value["layers"]["uvIndex"], "2");
        assert!(value.get("forecast").is_none());
        assert!(value["layers"].get("wind").is_none());
    }

    #[test]
    fn grounding_chunk_tolerates_missing_fields() {
        let chunk: GroundingChunk = serde_json::from_str(r#"{"web": {"title": "t"}}"#).unwrap();
        let web = chunk.web.unwrap();
        assert!(web.uri.is_none());
        assert_eq!(web.title.as_deref(), Some("t"));

        let empty: GroundingChunk = serde_json::from_str("{}").unwrap();
        assert!(empty.web.is_none());
    }
}
