use anyhow::bail;
use clap::{Parser, Subcommand};
use weathernow_core::{AppStore, Config, Coordinates, RequestState, UnitSystem};

use crate::{configure, interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weathernow", version, about = "Current weather and 5-day forecast")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key, default city and units.
    Configure,

    /// Show weather for a city, or for the current location if none is given.
    Show {
        /// City to search for, e.g. "London" or "London, GB".
        city: Option<String>,

        /// Use imperial units for this run.
        #[arg(long)]
        imperial: bool,

        /// Latitude to report as the current location.
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude to report as the current location.
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
    },

    /// List autocomplete candidates for a partial city name.
    Suggest {
        text: String,
    },

    /// Interactive session with search, autocomplete and toggles.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure::run(),
            Command::Show { city, imperial, lat, lon } => {
                let mut config = Config::load()?;
                if imperial {
                    config.units = UnitSystem::Imperial;
                }
                if let (Some(lat), Some(lon)) = (lat, lon) {
                    config.location = Some(Coordinates::new(lat, lon));
                }
                show(&config, city.as_deref()).await
            }
            Command::Suggest { text } => suggest(&Config::load()?, &text).await,
            Command::Interactive => interactive::run(&Config::load()?).await,
        }
    }
}

async fn show(config: &Config, city: Option<&str>) -> anyhow::Result<()> {
    let mut store = AppStore::from_config(config);

    match city {
        Some(city) => {
            if !store.search(city) {
                bail!("City name must not be empty");
            }
        }
        None => store.init(),
    }
    store.settle().await;

    let state = store.state();
    if let Some(err) = state.error() {
        if let Some(note) = state.advisory() {
            eprintln!("{note}");
        }
        bail!("{err}");
    }

    print!("{}", render::report(state));
    Ok(())
}

async fn suggest(config: &Config, text: &str) -> anyhow::Result<()> {
    let mut store = AppStore::from_config(config);

    store.update_search_input(text);
    if store.state().suggestion_status.is_loading() {
        store.process_next().await;
    }

    let state = store.state();
    match &state.suggestion_status {
        RequestState::Error(msg) => println!("No suggestions ({msg})."),
        _ if state.suggestions.is_empty() => println!(
            "Type at least {} characters to get suggestions.",
            config.suggestions.min_chars
        ),
        _ => print!("{}", render::suggestions(state)),
    }

    Ok(())
}
