//! In-memory `WeatherApi` and `GeoProvider` doubles for unit tests.

use async_trait::async_trait;
use chrono::DateTime;
use std::{collections::HashMap, sync::Mutex, time::Duration};

use crate::{
    WeatherError,
    geo::GeoProvider,
    model::{Coordinates, ForecastEntry, Place, Suggestion, UnitSystem, WeatherSnapshot},
    provider::WeatherApi,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Geocode(String),
    Reverse(Coordinates),
    Current(Place, UnitSystem),
    Forecast(Place, UnitSystem),
}

#[derive(Debug)]
pub struct FakeApi {
    calls: Mutex<Vec<Call>>,
    suggestions: HashMap<String, Vec<Suggestion>>,
    reverse: Option<Suggestion>,
    reverse_error: Option<WeatherError>,
    delays: HashMap<String, Duration>,
    current_errors: HashMap<String, WeatherError>,
    forecast_errors: HashMap<String, WeatherError>,
    panics: Vec<String>,
    forecast_len: usize,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            suggestions: HashMap::new(),
            reverse: None,
            reverse_error: None,
            delays: HashMap::new(),
            current_errors: HashMap::new(),
            forecast_errors: HashMap::new(),
            panics: Vec::new(),
            forecast_len: 40,
        }
    }
}

pub fn suggestion(name: &str, country: &str) -> Suggestion {
    Suggestion {
        name: name.to_string(),
        state: None,
        country: country.to_string(),
        lat: 1.0,
        lon: 2.0,
    }
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_suggestions(mut self, query: &str, list: Vec<Suggestion>) -> Self {
        self.suggestions.insert(query.to_string(), list);
        self
    }

    pub fn with_reverse(mut self, hit: Suggestion) -> Self {
        self.reverse = Some(hit);
        self
    }

    pub fn with_reverse_error(mut self, err: WeatherError) -> Self {
        self.reverse_error = Some(err);
        self
    }

    /// Delay for a geocode query or a place (by its display form).
    pub fn with_delay(mut self, key: &str, delay: Duration) -> Self {
        self.delays.insert(key.to_string(), delay);
        self
    }

    pub fn with_current_error(mut self, place: &str, err: WeatherError) -> Self {
        self.current_errors.insert(place.to_string(), err);
        self
    }

    pub fn with_forecast_error(mut self, place: &str, err: WeatherError) -> Self {
        self.forecast_errors.insert(place.to_string(), err);
        self
    }

    /// Current weather for this place panics instead of answering.
    pub fn with_panic(mut self, place: &str) -> Self {
        self.panics.push(place.to_string());
        self
    }

    pub fn with_forecast_len(mut self, len: usize) -> Self {
        self.forecast_len = len;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn geocode_queries(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Geocode(q) => Some(q),
                _ => None,
            })
            .collect()
    }

    pub fn current_calls(&self) -> Vec<(Place, UnitSystem)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Current(p, u) => Some((p, u)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    async fn pause_for(&self, key: &str) {
        if let Some(delay) = self.delays.get(key) {
            tokio::time::sleep(*delay).await;
        }
    }
}

pub fn forecast_entries(len: usize) -> Vec<ForecastEntry> {
    (0..len)
        .map(|i| ForecastEntry {
            timestamp: DateTime::from_timestamp(1_700_000_000 + i as i64 * 3 * 3600, 0).unwrap(),
            time_text: None,
            temperature: i as f64,
            high: i as f64 + 1.0,
            low: i as f64 - 1.0,
            humidity: 50,
            wind_speed: 3.0,
            description: format!("entry {i}"),
            icon: "01d".to_string(),
        })
        .collect()
}

#[async_trait]
impl WeatherApi for FakeApi {
    async fn geocode(&self, query: &str, _limit: u8) -> Result<Vec<Suggestion>, WeatherError> {
        self.record(Call::Geocode(query.to_string()));
        self.pause_for(query).await;
        match self.suggestions.get(query) {
            Some(list) if !list.is_empty() => Ok(list.clone()),
            _ => Err(WeatherError::NotFound(query.to_string())),
        }
    }

    async fn reverse_geocode(
        &self,
        coords: Coordinates,
        _limit: u8,
    ) -> Result<Vec<Suggestion>, WeatherError> {
        self.record(Call::Reverse(coords));
        if let Some(err) = &self.reverse_error {
            return Err(err.clone());
        }
        match &self.reverse {
            Some(hit) => Ok(vec![hit.clone()]),
            None => Err(WeatherError::NotFound("reverse".into())),
        }
    }

    async fn current_weather(
        &self,
        place: &Place,
        units: UnitSystem,
    ) -> Result<WeatherSnapshot, WeatherError> {
        self.record(Call::Current(place.clone(), units));
        let key = place.to_string();
        self.pause_for(&key).await;
        if self.panics.contains(&key) {
            panic!("current weather for {key} blew up");
        }
        if let Some(err) = self.current_errors.get(&key) {
            return Err(err.clone());
        }

        let temperature = match units {
            UnitSystem::Metric => 20.0,
            UnitSystem::Imperial => 68.0,
        };
        Ok(WeatherSnapshot {
            temperature,
            feels_like: temperature - 1.0,
            humidity: 40,
            wind_speed: 4.0,
            description: format!("clear sky over {key}"),
            icon: "01d".to_string(),
            provider_name: Some(key),
            observed_at: None,
        })
    }

    async fn forecast(
        &self,
        place: &Place,
        units: UnitSystem,
    ) -> Result<Vec<ForecastEntry>, WeatherError> {
        self.record(Call::Forecast(place.clone(), units));
        let key = place.to_string();
        self.pause_for(&key).await;
        if let Some(err) = self.forecast_errors.get(&key) {
            return Err(err.clone());
        }
        Ok(forecast_entries(self.forecast_len))
    }
}

#[derive(Debug, Clone)]
pub struct FakeGeo(pub Result<Coordinates, WeatherError>);

#[async_trait]
impl GeoProvider for FakeGeo {
    async fn current_position(&self) -> Result<Coordinates, WeatherError> {
        self.0.clone()
    }
}
