use std::sync::Arc;

use crate::{
    WeatherError,
    model::{ForecastEntry, Place, UnitSystem, WeatherReport},
    provider::WeatherApi,
};

/// Entries per day in a 3-hourly feed.
pub const FORECAST_STRIDE: usize = 8;
pub const FORECAST_DAYS: usize = 5;

/// One entry per 24 hours: indices 0, 8, 16, 24, 32. Short feeds give
/// fewer days.
pub fn sample_forecast(entries: &[ForecastEntry]) -> Vec<ForecastEntry> {
    entries.iter().step_by(FORECAST_STRIDE).take(FORECAST_DAYS).cloned().collect()
}

/// Loads current conditions and the forecast for one place as a unit.
#[derive(Debug, Clone)]
pub struct WeatherOrchestrator {
    api: Arc<dyn WeatherApi>,
}

impl WeatherOrchestrator {
    pub fn new(api: Arc<dyn WeatherApi>) -> Self {
        Self { api }
    }

    /// Both requests run concurrently; either failing fails the whole load.
    pub async fn load_weather(
        &self,
        place: &Place,
        units: UnitSystem,
    ) -> Result<WeatherReport, WeatherError> {
        let (snapshot, entries) = tokio::try_join!(
            self.api.current_weather(place, units),
            self.api.forecast(place, units),
        )?;

        tracing::debug!(%place, %units, entries = entries.len(), "weather loaded");

        Ok(WeatherReport { snapshot, forecast: sample_forecast(&entries), units })
    }
}
