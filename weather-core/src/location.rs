//! Turning a location fix, a typed query or a picked suggestion into the
//! place the app shows weather for.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    WeatherError,
    geo::GeoProvider,
    model::{Coordinates, Place, Suggestion, coordinate_label},
    provider::WeatherApi,
};

/// A place together with how it is shown and any note about how it was chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPlace {
    pub place: Place,
    pub label: String,
    /// Non-fatal note, e.g. that the location fix was refused.
    pub advisory: Option<String>,
}

impl ResolvedPlace {
    pub fn new(place: Place, label: impl Into<String>) -> Self {
        Self { place, label: label.into(), advisory: None }
    }
}

#[derive(Debug, Clone)]
pub struct LocationResolver {
    api: Arc<dyn WeatherApi>,
    geo: Arc<dyn GeoProvider>,
    default_city: String,
}

impl LocationResolver {
    pub fn new(api: Arc<dyn WeatherApi>, geo: Arc<dyn GeoProvider>, default_city: String) -> Self {
        Self { api, geo, default_city }
    }

    pub fn default_place(&self) -> ResolvedPlace {
        ResolvedPlace::new(Place::Name(self.default_city.clone()), self.default_city.clone())
    }

    /// Startup resolution. Never fails: without a fix the default city is
    /// used and the reason is attached as an advisory.
    pub async fn resolve_initial(&self) -> ResolvedPlace {
        match self.resolve_current().await {
            Ok(resolved) => resolved,
            Err(err) => {
                let reason = match err {
                    WeatherError::PermissionDenied => "Location denied",
                    _ => "Location unavailable",
                };
                warn!(error = %err, default = %self.default_city, "falling back to default city");

                let mut fallback = self.default_place();
                fallback.advisory = Some(format!("{reason}. Showing {}.", self.default_city));
                fallback
            }
        }
    }

    /// Location fix plus a reverse-geocoded label. Denial is an error here.
    pub async fn resolve_current(&self) -> Result<ResolvedPlace, WeatherError> {
        let coords = self.geo.current_position().await?;
        let label = self.label_for(coords).await;
        info!(%label, lat = coords.lat, lon = coords.lon, "resolved current location");

        Ok(ResolvedPlace::new(Place::Coords(coords), label))
    }

    /// `"Name, Country"` for a coordinate, or a formatted coordinate label if
    /// reverse geocoding fails or finds nothing.
    async fn label_for(&self, coords: Coordinates) -> String {
        match self.api.reverse_geocode(coords, 1).await {
            Ok(hits) => match hits.first() {
                Some(hit) => hit.display_label(),
                None => coordinate_label(coords),
            },
            Err(err) => {
                debug!(error = %err, "reverse geocoding failed, using coordinates as label");
                coordinate_label(coords)
            }
        }
    }

    /// Parse a submitted search. Only the text before the first comma is
    /// queried; the whole input becomes the label.
    pub fn resolve_from_text(input: &str) -> Option<ResolvedPlace> {
        let trimmed = input.trim();
        let query = trimmed.split(',').next().unwrap_or_default().trim();
        if query.is_empty() {
            return None;
        }

        Some(ResolvedPlace::new(Place::name(query), trimmed))
    }

    pub fn resolve_from_suggestion(candidate: &Suggestion) -> ResolvedPlace {
        ResolvedPlace::new(Place::name(candidate.name.clone()), candidate.display_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeApi, FakeGeo, suggestion};

    fn resolver(api: FakeApi, geo: Result<Coordinates, WeatherError>) -> LocationResolver {
        LocationResolver::new(Arc::new(api), Arc::new(FakeGeo(geo)), "Bengaluru".into())
    }

    #[tokio::test]
    async fn initial_uses_reverse_geocoded_name() {
        let r = resolver(
            FakeApi::new().with_reverse(suggestion("Paris", "FR")),
            Ok(Coordinates::new(48.8566, 2.3522)),
        );

        let resolved = r.resolve_initial().await;
        assert_eq!(resolved.place, Place::Coords(Coordinates::new(48.8566, 2.3522)));
        assert_eq!(resolved.label, "Paris, FR");
        assert!(resolved.advisory.is_none());
    }

    #[tokio::test]
    async fn empty_reverse_result_falls_back_to_coordinates() {
        let r = resolver(FakeApi::new(), Ok(Coordinates::new(10.123, 20.456)));

        let resolved = r.resolve_initial().await;
        assert_eq!(resolved.label, "Location (10.12, 20.46)");
    }

    #[tokio::test]
    async fn failing_reverse_geocode_falls_back_to_coordinates() {
        let r = resolver(
            FakeApi::new().with_reverse_error(WeatherError::Transient("boom".into())),
            Ok(Coordinates::new(-33.8688, 151.2093)),
        );

        let resolved = r.resolve_current().await.unwrap();
        assert_eq!(resolved.label, "Location (-33.87, 151.21)");
    }

    #[tokio::test]
    async fn denial_falls_back_to_default_with_advisory() {
        let r = resolver(FakeApi::new(), Err(WeatherError::PermissionDenied));

        let resolved = r.resolve_initial().await;
        assert_eq!(resolved.place, Place::name("Bengaluru"));
        assert_eq!(resolved.label, "Bengaluru");
        assert_eq!(resolved.advisory.as_deref(), Some("Location denied. Showing Bengaluru."));
    }

    #[tokio::test]
    async fn unavailable_location_has_its_own_advisory() {
        let r = resolver(FakeApi::new(), Err(WeatherError::LocationUnavailable("none".into())));

        let resolved = r.resolve_initial().await;
        assert_eq!(resolved.place, Place::name("Bengaluru"));
        assert!(resolved.advisory.unwrap().starts_with("Location unavailable"));
    }

    #[tokio::test]
    async fn current_location_surfaces_denial() {
        let r = resolver(FakeApi::new(), Err(WeatherError::PermissionDenied));
        assert_eq!(r.resolve_current().await.unwrap_err(), WeatherError::PermissionDenied);
    }

    #[test]
    fn text_query_stops_at_first_comma() {
        let resolved = LocationResolver::resolve_from_text("  London, GB  ").unwrap();
        assert_eq!(resolved.place, Place::name("London"));
        assert_eq!(resolved.label, "London, GB");

        let resolved = LocationResolver::resolve_from_text("Springfield , IL, US").unwrap();
        assert_eq!(resolved.place, Place::name("Springfield"));
    }

    #[test]
    fn blank_text_is_rejected() {
        assert!(LocationResolver::resolve_from_text("   ").is_none());
        assert!(LocationResolver::resolve_from_text(", FR").is_none());
    }

    #[test]
    fn suggestion_becomes_named_place() {
        let resolved = LocationResolver::resolve_from_suggestion(&suggestion("Tokyo", "JP"));
        assert_eq!(resolved.place, Place::name("Tokyo"));
        assert_eq!(resolved.label, "Tokyo, JP");
    }
}
