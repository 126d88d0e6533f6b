use anyhow::{Context, Result};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use weathernow_core::{Config, UnitSystem};

/// Prompt for credentials and defaults, then save them.
pub fn run() -> Result<()> {
    let mut config = Config::load()?;

    let mut prompt = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked);
    if config.api_key.is_some() {
        prompt = prompt.with_help_message("Leave empty to keep the stored key");
    }
    let key = prompt.prompt().context("Failed to read API key")?;
    if !key.trim().is_empty() {
        config.set_api_key(key);
    }

    let city = Text::new("Default city:")
        .with_default(&config.default_city)
        .with_help_message("Shown when your location is unavailable")
        .prompt()
        .context("Failed to read default city")?;
    if !city.trim().is_empty() {
        config.default_city = city.trim().to_string();
    }

    let start = match config.units {
        UnitSystem::Metric => 0,
        UnitSystem::Imperial => 1,
    };
    config.units = Select::new("Units:", vec![UnitSystem::Metric, UnitSystem::Imperial])
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read units")?;

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());

    if config.api_key.is_none() {
        println!("No API key stored; set OPENWEATHER_API_KEY before running `weathernow show`.");
    }

    Ok(())
}
