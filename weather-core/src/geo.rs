//! Device-location capability.
//!
//! The library does not talk to any positioning hardware itself; front ends
//! supply a [`GeoProvider`] that reports a fix or refuses.

use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

use crate::{Config, WeatherError, model::Coordinates};

#[async_trait]
pub trait GeoProvider: Send + Sync + Debug {
    /// One-shot position request. Denial is `PermissionDenied`.
    async fn current_position(&self) -> Result<Coordinates, WeatherError>;
}

/// Always reports the same coordinates.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeoProvider(pub Coordinates);

#[async_trait]
impl GeoProvider for FixedGeoProvider {
    async fn current_position(&self) -> Result<Coordinates, WeatherError> {
        Ok(self.0)
    }
}

/// No positioning capability on this host.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableGeoProvider;

#[async_trait]
impl GeoProvider for UnavailableGeoProvider {
    async fn current_position(&self) -> Result<Coordinates, WeatherError> {
        Err(WeatherError::LocationUnavailable(
            "no location source configured".to_string(),
        ))
    }
}

/// Fixed provider when the config carries a location, unavailable otherwise.
pub fn geo_from_config(config: &Config) -> Arc<dyn GeoProvider> {
    match config.location {
        Some(coords) => Arc::new(FixedGeoProvider(coords)),
        None => Arc::new(UnavailableGeoProvider),
    }
}
