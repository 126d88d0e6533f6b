use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    WeatherError,
    config::{DEFAULT_DATA_BASE_URL, DEFAULT_GEO_BASE_URL},
    model::{Coordinates, ForecastEntry, Place, Suggestion, UnitSystem, WeatherSnapshot},
};

use super::WeatherApi;

/// OpenWeather geocoding + weather client. Stateless apart from configuration.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: Option<String>,
    http: Client,
    geo_base_url: String,
    data_base_url: String,
    forecast_count: Option<u32>,
}

impl OpenWeatherClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            http: Client::new(),
            geo_base_url: DEFAULT_GEO_BASE_URL.to_string(),
            data_base_url: DEFAULT_DATA_BASE_URL.to_string(),
            forecast_count: None,
        }
    }

    pub fn with_base_urls(mut self, geo_base_url: &str, data_base_url: &str) -> Self {
        self.geo_base_url = geo_base_url.trim_end_matches('/').to_string();
        self.data_base_url = data_base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_forecast_count(mut self, count: Option<u32>) -> Self {
        self.forecast_count = count;
        self
    }

    fn api_key(&self) -> Result<&str, WeatherError> {
        self.api_key.as_deref().ok_or_else(|| {
            WeatherError::Unauthorized(
                "No OpenWeather API key configured.\n\
                 Hint: run `weathernow configure` or set OPENWEATHER_API_KEY."
                    .to_string(),
            )
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        mut query: Vec<(&'static str, String)>,
        what: &str,
    ) -> Result<T, WeatherError> {
        query.push(("appid", self.api_key()?.to_string()));

        tracing::debug!(%url, what, "sending OpenWeather request");

        let res = self
            .http
            .get(url)
            .query(&query)
            .send()
            .await
            .map_err(|e| WeatherError::Transient(format!("Failed to send {what} request: {e}")))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| WeatherError::Transient(format!("Failed to read {what} response: {e}")))?;

        if !status.is_success() {
            tracing::warn!(%status, what, "OpenWeather request failed");
            return Err(WeatherError::from_status(status, what, &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| WeatherError::Malformed(format!("Failed to parse {what} JSON: {e}")))
    }
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: Option<String>,
    dt: Option<i64>,
    main: OwCurrentMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
    temp_max: f64,
    temp_min: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    dt_txt: Option<String>,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

fn condition(weather: &[OwWeather]) -> (String, String) {
    weather
        .first()
        .map(|w| (w.description.clone(), w.icon.clone()))
        .unwrap_or_else(|| ("Unknown".to_string(), String::new()))
}

fn non_empty(list: Vec<Suggestion>, what: &str) -> Result<Vec<Suggestion>, WeatherError> {
    if list.is_empty() {
        Err(WeatherError::NotFound(format!("{what} returned no results")))
    } else {
        Ok(list)
    }
}

#[async_trait]
impl WeatherApi for OpenWeatherClient {
    async fn geocode(&self, query: &str, limit: u8) -> Result<Vec<Suggestion>, WeatherError> {
        let url = format!("{}/direct", self.geo_base_url);
        let list = self
            .get_json(
                &url,
                vec![("q", query.to_string()), ("limit", limit.to_string())],
                "geocoding",
            )
            .await?;

        non_empty(list, "geocoding")
    }

    async fn reverse_geocode(
        &self,
        coords: Coordinates,
        limit: u8,
    ) -> Result<Vec<Suggestion>, WeatherError> {
        let url = format!("{}/reverse", self.geo_base_url);
        let list = self
            .get_json(
                &url,
                vec![
                    ("lat", coords.lat.to_string()),
                    ("lon", coords.lon.to_string()),
                    ("limit", limit.to_string()),
                ],
                "reverse geocoding",
            )
            .await?;

        non_empty(list, "reverse geocoding")
    }

    async fn current_weather(
        &self,
        place: &Place,
        units: UnitSystem,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let url = format!("{}/weather", self.data_base_url);
        let mut query = place.query_params();
        query.push(("units", units.as_str().to_string()));

        let parsed: OwCurrentResponse = self.get_json(&url, query, "current weather").await?;
        let (description, icon) = condition(&parsed.weather);

        Ok(WeatherSnapshot {
            temperature: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            humidity: parsed.main.humidity,
            wind_speed: parsed.wind.speed,
            description,
            icon,
            provider_name: parsed.name.filter(|n| !n.is_empty()),
            observed_at: parsed.dt.and_then(unix_to_utc),
        })
    }

    async fn forecast(
        &self,
        place: &Place,
        units: UnitSystem,
    ) -> Result<Vec<ForecastEntry>, WeatherError> {
        let url = format!("{}/forecast", self.data_base_url);
        let mut query = place.query_params();
        query.push(("units", units.as_str().to_string()));
        if let Some(cnt) = self.forecast_count {
            query.push(("cnt", cnt.to_string()));
        }

        let parsed: OwForecastResponse = self.get_json(&url, query, "forecast").await?;

        parsed
            .list
            .into_iter()
            .map(|entry| {
                let timestamp = unix_to_utc(entry.dt).ok_or_else(|| {
                    WeatherError::Malformed(format!("forecast timestamp {} out of range", entry.dt))
                })?;
                let (description, icon) = condition(&entry.weather);

                Ok(ForecastEntry {
                    timestamp,
                    time_text: entry.dt_txt,
                    temperature: entry.main.temp,
                    high: entry.main.temp_max,
                    low: entry.main.temp_min,
                    humidity: entry.main.humidity,
                    wind_speed: entry.wind.speed,
                    description,
                    icon,
                })
            })
            .collect()
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}
