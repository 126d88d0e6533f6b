//! Core library for WeatherNow.
//!
//! This crate defines:
//! - Configuration & API key handling
//! - A typed client for the OpenWeather geocoding and weather endpoints
//! - Place resolution (location fix, typed search, picked suggestion)
//! - Debounced autocomplete and concurrent weather loading
//! - `AppStore`, the state every front end renders from
//!
//! It is used by `weathernow-cli`, but can also be driven by other front ends.

pub mod config;
pub mod error;
pub mod geo;
pub mod location;
pub mod model;
pub mod orchestrator;
pub mod provider;
pub mod store;
pub mod suggest;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{Config, Endpoints, SuggestionSettings};
pub use error::WeatherError;
pub use geo::{FixedGeoProvider, GeoProvider, UnavailableGeoProvider};
pub use location::{LocationResolver, ResolvedPlace};
pub use model::{
    Coordinates, ForecastEntry, Place, RequestState, Suggestion, Theme, UnitSystem,
    WeatherReport, WeatherSnapshot,
};
pub use orchestrator::WeatherOrchestrator;
pub use provider::{WeatherApi, openweather::OpenWeatherClient};
pub use store::{AppState, AppStore, StoreEvent};
pub use suggest::SuggestionEngine;
