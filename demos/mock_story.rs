//! Example: generating a story offline with MockBackend.
//!
//! Run with: `cargo run --example mock_story`

use std::sync::Arc;
use weather_tales::render::render_text;
use weather_tales::{
    ExecCtx, Genre, GroundingChunk, MockBackend, Mood, StoryRequest, StoryTeller, TaleConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A canned answer shaped like a grounded Gemini reply
    let mock = MockBackend::grounded(
        "Weather Context: light drizzle, 11°C\n\
         Forecast: clearing by Friday\n\
         Layer - Air Quality: Good (AQI 22)\n\
         Layer - UV Index: 1 (low)\n\
         Layer - Wind: 12mph NE\n\
         Layer - Rain Chance: 70%\n\
         \n\
         The rain fell softly on the cobblestones.\n\
         \n\
         Somewhere above the rooftops, a kite waited for Friday.",
        vec![
            GroundingChunk::web("https://weather.example/lisbon", "Lisbon weather"),
            GroundingChunk::web("https://weather.example/lisbon", "Lisbon weather (again)"),
        ],
    );

    let ctx = ExecCtx::builder(TaleConfig::new("unused"))
        .backend(Arc::new(mock))
        .build()?;
    let teller = StoryTeller::new(ctx);

    let request = StoryRequest::new("Lisbon", Genre::Fantasy, Mood::Whimsical)?;
    let story = teller.tell(&request).await?;

    println!("{}", render_text(&story));
    println!("{}", serde_json::to_string_pretty(&story)?);
    Ok(())
}
