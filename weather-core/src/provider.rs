use crate::{
    Config, WeatherError,
    model::{Coordinates, ForecastEntry, Place, Suggestion, UnitSystem, WeatherSnapshot},
    provider::openweather::OpenWeatherClient,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// Typed access to the geocoding and weather endpoints.
///
/// Each call is a single request; implementations never retry.
#[async_trait]
pub trait WeatherApi: Send + Sync + Debug {
    /// Candidates for a free-form query. An empty result is `NotFound`.
    async fn geocode(&self, query: &str, limit: u8) -> Result<Vec<Suggestion>, WeatherError>;

    /// Named places at a coordinate. An empty result is `NotFound`.
    async fn reverse_geocode(
        &self,
        coords: Coordinates,
        limit: u8,
    ) -> Result<Vec<Suggestion>, WeatherError>;

    async fn current_weather(
        &self,
        place: &Place,
        units: UnitSystem,
    ) -> Result<WeatherSnapshot, WeatherError>;

    /// The full fixed-interval forecast feed, unsampled.
    async fn forecast(
        &self,
        place: &Place,
        units: UnitSystem,
    ) -> Result<Vec<ForecastEntry>, WeatherError>;
}

/// Construct the API client from config.
///
/// A missing key is not an error here; every call then fails with
/// `WeatherError::Unauthorized`.
pub fn client_from_config(config: &Config) -> Arc<dyn WeatherApi> {
    let client = OpenWeatherClient::new(config.resolve_api_key())
        .with_base_urls(&config.endpoints.geo_base_url, &config.endpoints.data_base_url)
        .with_forecast_count(config.forecast_count);

    Arc::new(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn client_without_key_reports_unauthorized() {
        let client =
            OpenWeatherClient::new(None).with_base_urls("http://127.0.0.1:9", "http://127.0.0.1:9");

        let err = client.geocode("London", 5).await.unwrap_err();
        assert!(matches!(err, WeatherError::Unauthorized(_)));

        let err = client
            .current_weather(&Place::name("London"), UnitSystem::Metric)
            .await
            .unwrap_err();
        assert!(matches!(err, WeatherError::Unauthorized(_)));
    }
}
