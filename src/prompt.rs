use crate::types::StoryRequest;
use std::collections::HashMap;

/// Story instruction sent to the model. Placeholders: `{location}`,
/// `{genre}`, `{mood}`, `{style}`.
pub const STORY_TEMPLATE: &str = "\
I need you to do three things:
1. Find the current real-time weather conditions in {location} right now. specifically looking for:
   - Air Quality (AQI)
   - UV Index
   - Wind Speed & Direction
   - Chance of Rain/Precipitation
2. Find the weather forecast for the next 3 days in {location}.
3. Write a creative short story (approximately 250-300 words) in the {genre} genre that is heavily inspired by those specific weather conditions.

The story should evoke a {mood} mood.
{style}
Incorporate the weather elements (rain, sun, snow, wind, temperature, etc.) directly into the narrative's setting or plot.

Structure the response exactly as follows at the very beginning (keep descriptions brief, max 5-7 words for layers):
Weather Context: [Brief summary of current weather]
Forecast: [Brief summary of the 3-day forecast]
Layer - Air Quality: [Value/Status]
Layer - UV Index: [Value/Status]
Layer - Wind: [Speed & Direction]
Layer - Rain Chance: [Percentage/Probability]

[Then provide the story content below]
";

/// Extra instruction for the simple genre.
pub const SIMPLE_STYLE: &str =
    "Use simple vocabulary, short sentences, and make it easy to understand (max 200 words).";

/// Build the prompt for one story request.
///
/// # Example
///
/// ```
/// use weather_tales::prompt::build_prompt;
/// use weather_tales::{Genre, Mood, StoryRequest};
///
/// let req = StoryRequest::new("Reykjavik", Genre::Noir, Mood::Ominous).unwrap();
/// let prompt = build_prompt(&req);
/// assert!(prompt.contains("in the Noir genre"));
/// assert!(prompt.contains("evoke a Ominous mood"));
/// ```
pub fn build_prompt(request: &StoryRequest) -> String {
    let style = if request.genre().is_simple() {
        SIMPLE_STYLE
    } else {
        ""
    };

    let mut vars = HashMap::new();
    vars.insert("location", request.location());
    vars.insert("genre", request.genre().label());
    vars.insert("mood", request.mood().label());
    vars.insert("style", style);

    let prompt = render(STORY_TEMPLATE, &vars);
    tracing::debug!(
        genre = %request.genre(),
        mood = %request.mood(),
        chars = prompt.len(),
        "built story prompt"
    );
    prompt
}

/// Substitute `{key}` placeholders from `vars` in a single left-to-right pass.
///
/// Substituted text is never re-scanned, so values may themselves contain
/// braces. Use `{{` to insert a literal `{` and `}}` to insert a literal `}`.
/// Placeholders with no matching var are left as written.
///
/// ```
/// use std::collections::HashMap;
/// use weather_tales::prompt::render;
///
/// let vars = HashMap::from([("name", "Alice")]);
/// let result = render("Hello {name}, here is JSON: {{\"key\": \"val\"}}", &vars);
/// assert_eq!(result, r#"Hello Alice, here is JSON: {"key": "val"}"#);
/// ```
pub fn render(template: &str, vars: &HashMap<&str, &str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if let Some(after) = tail.strip_prefix("{{") {
            out.push('{');
            rest = after;
        } else if let Some(after) = tail.strip_prefix("}}") {
            out.push('}');
            rest = after;
        } else if tail.starts_with('{') {
            match tail[1..].find('}') {
                Some(end) => {
                    let key = &tail[1..1 + end];
                    match vars.get(key) {
                        Some(value) => out.push_str(value),
                        None => out.push_str(&tail[..end + 2]),
                    }
                    rest = &tail[end + 2..];
                }
                None => {
                    out.push_str(tail);
                    rest = "";
                }
            }
        } else {
            out.push('}');
            rest = &tail[1..];
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Genre, Mood};

    fn request(location: &str, genre: Genre) -> StoryRequest {
        StoryRequest::new(location, genre, Mood::Cozy).unwrap()
    }

    #[test]
    fn test_render_basic() {
        let vars = HashMap::from([("name", "Alice"), ("thing", "data")]);
        assert_eq!(render("Hello {name}, process {thing}", &vars), "Hello Alice, process data");
    }

    #[test]
    fn test_render_no_placeholders() {
        assert_eq!(render("static prompt", &HashMap::new()), "static prompt");
    }

    #[test]
    fn test_render_escaped_braces() {
        let vars = HashMap::from([("name", "Alice")]);
        let result = render("Hello {name}, JSON: {{\"key\": \"val\"}}", &vars);
        assert_eq!(result, r#"Hello Alice, JSON: {"key": "val"}"#);
    }

    #[test]
    fn test_render_unknown_placeholder_kept() {
        let result = render("keep {missing} as is", &HashMap::new());
        assert_eq!(result, "keep {missing} as is");
    }

    #[test]
    fn test_render_does_not_rescan_values() {
        let vars = HashMap::from([("a", "{b}"), ("b", "nope")]);
        assert_eq!(render("{a} then {b}", &vars), "{b} then nope");
    }

    #[test]
    fn test_render_unterminated_brace() {
        let vars = HashMap::from([("a", "x")]);
        assert_eq!(render("{a} and {oops", &vars), "x and {oops");
    }

    #[test]
    fn simple_genre_adds_style_clause() {
        let prompt = build_prompt(&request("Oslo", Genre::Simple));
        assert!(prompt.contains(SIMPLE_STYLE));
        assert!(prompt.contains("in the Simple Story genre"));
    }

    #[test]
    fn other_genres_omit_style_clause() {
        for genre in Genre::ALL.into_iter().filter(|g| !g.is_simple()) {
            let prompt = build_prompt(&request("Oslo", genre));
            assert!(!prompt.contains("max 200 words"), "{genre} leaked style clause");
            assert!(prompt.contains(&format!("in the {} genre", genre.label())));
        }
    }

    #[test]
    fn location_is_substituted_verbatim() {
        let prompt = build_prompt(&request("  48.85, 2.35 {mood} ", Genre::Noir));
        assert!(prompt.contains("conditions in   48.85, 2.35 {mood}  right now"));
        assert!(prompt.contains("next 3 days in   48.85, 2.35 {mood} ."));
        assert!(prompt.contains("evoke a Cozy mood"));
    }

    #[test]
    fn label_lines_appear_in_order() {
        let prompt = build_prompt(&request("Oslo", Genre::Horror));
        let labels = [
            "Weather Context:",
            "Forecast:",
            "Layer - Air Quality:",
            "Layer - UV Index:",
            "Layer - Wind:",
            "Layer - Rain Chance:",
        ];
        let positions: Vec<usize> = labels
            .iter()
            .map(|l| prompt.find(&format!("\n{}", l)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn prompt_has_no_leftover_placeholders() {
        let prompt = build_prompt(&request("Cairo", Genre::Mystery));
        for key in ["{location}", "{genre}", "{mood}", "{style}"] {
            assert!(!prompt.contains(key));
        }
    }
}
