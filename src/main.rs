//! `weather-tales`: write a short story about the weather where you are.
//!
//! Reads `GEMINI_API_KEY` from the environment (or `.env`).

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use weather_tales::client::{API_KEY_VAR, DEFAULT_BASE_URL, DEFAULT_MODEL};
use weather_tales::events::{Event, FnEventHandler};
use weather_tales::render::render;
use weather_tales::{
    Coordinates, ExecCtx, Genre, Mood, OutputFormat, StoryRequest, StoryTeller, TaleConfig,
    TaleError,
};

#[derive(Parser)]
#[command(name = "weather-tales")]
#[command(about = "Your weather, your story.")]
#[command(version)]
struct Cli {
    /// City, landmark, or coordinates
    #[arg(required_unless_present_all = ["lat", "lon"], conflicts_with_all = ["lat", "lon"])]
    location: Option<String>,

    /// Latitude, used together with --lon instead of a location
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Longitude, used together with --lat instead of a location
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Story genre (e.g. simple, fantasy, sci-fi, noir)
    #[arg(short, long, default_value = "Simple Story")]
    genre: Genre,

    /// Story mood (e.g. cozy, ominous, whimsical)
    #[arg(short, long, default_value = "Whimsical")]
    mood: Mood,

    /// Output format: text or json (yaml with the `yaml` feature)
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Gemini API key
    #[arg(long, env = API_KEY_VAR, hide_env_values = true)]
    api_key: Option<String>,

    /// Gemini model
    #[arg(long, env = "WEATHER_TALES_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Gemini API host
    #[arg(long, env = "WEATHER_TALES_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Sampling temperature (0.0 - 2.0)
    #[arg(long)]
    temperature: Option<f64>,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = 60)]
    timeout: u64,

    /// Suppress progress messages on stderr
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn story_request(&self) -> Result<StoryRequest> {
        match (&self.location, self.lat, self.lon) {
            (Some(location), _, _) => Ok(StoryRequest::new(location.clone(), self.genre, self.mood)?),
            (None, Some(lat), Some(lon)) => Ok(StoryRequest::at_coordinates(
                Coordinates::new(lat, lon),
                self.genre,
                self.mood,
            )),
            _ => bail!("a location or both --lat and --lon are required"),
        }
    }

    fn config(&self) -> Result<TaleConfig> {
        let api_key = match &self.api_key {
            Some(key) => key.clone(),
            None => TaleConfig::from_env().context("no API key given")?.api_key,
        };
        let mut config = TaleConfig::new(api_key)
            .with_model(self.model.clone())
            .with_base_url(self.base_url.clone())
            .with_timeout(std::time::Duration::from_secs(self.timeout));
        if let Some(t) = self.temperature {
            config = config.with_temperature(t);
        }
        Ok(config)
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    init_tracing();

    if let Err(e) = run(Cli::parse()).await {
        // Story failures show only the user-facing message; the cause is already logged.
        match e.downcast_ref::<TaleError>() {
            Some(story @ TaleError::StoryFailed(_)) => eprintln!("Error: {}", story),
            _ => eprintln!("Error: {:#}", e),
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

async fn run(cli: Cli) -> Result<()> {
    let request = cli.story_request()?;
    let config = cli.config()?;
    config.validate()?;

    let mut builder = ExecCtx::builder(config);
    if !cli.quiet {
        builder = builder.event_handler(Arc::new(FnEventHandler(|event: Event| {
            if let Event::StoryStart {
                location,
                genre,
                mood,
            } = event
            {
                eprintln!("Weaving a {} {} tale for {}...", mood, genre, location);
            }
        })));
    }
    let teller = StoryTeller::new(builder.build()?);

    let story = teller.tell(&request).await?;
    print!("{}", render(&story, cli.format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_location_genre_and_mood() {
        let cli = Cli::try_parse_from(["weather-tales", "Lisbon", "-g", "sci-fi", "-m", "cozy"]).unwrap();
        let request = cli.story_request().unwrap();
        assert_eq!(request.location(), "Lisbon");
        assert_eq!(request.genre(), Genre::SciFi);
        assert_eq!(request.mood(), Mood::Cozy);
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn defaults_to_simple_whimsical() {
        let cli = Cli::try_parse_from(["weather-tales", "Oslo"]).unwrap();
        assert_eq!(cli.genre, Genre::Simple);
        assert_eq!(cli.mood, Mood::Whimsical);
    }

    #[test]
    fn coordinates_replace_location() {
        let cli = Cli::try_parse_from(["weather-tales", "--lat", "51.5", "--lon", "-0.12"]).unwrap();
        assert_eq!(cli.story_request().unwrap().location(), "51.5, -0.12");
    }

    #[test]
    fn location_and_coordinates_conflict() {
        assert!(Cli::try_parse_from(["weather-tales", "Oslo", "--lat", "1", "--lon", "2"]).is_err());
        assert!(Cli::try_parse_from(["weather-tales", "--lat", "1"]).is_err());
        assert!(Cli::try_parse_from(["weather-tales"]).is_err());
    }

    #[test]
    fn blank_location_is_rejected() {
        let cli = Cli::try_parse_from(["weather-tales", "   "]).unwrap();
        assert!(cli.story_request().is_err());
    }

    #[test]
    fn unknown_genre_is_a_parse_error() {
        assert!(Cli::try_parse_from(["weather-tales", "Oslo", "-g", "western"]).is_err());
    }
}
