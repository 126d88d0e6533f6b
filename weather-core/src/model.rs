use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A geographic fix in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Canonical identity of "where": either a coordinate pair or a city name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Place {
    Coords(Coordinates),
    Name(String),
}

impl Place {
    pub fn name(name: impl Into<String>) -> Self {
        Place::Name(name.into())
    }

    /// Location query parameters understood by the weather endpoints.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            Place::Coords(c) => vec![("lat", c.lat.to_string()), ("lon", c.lon.to_string())],
            Place::Name(name) => vec![("q", name.clone())],
        }
    }
}

impl std::fmt::Display for Place {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Place::Coords(c) => write!(f, "({:.4}, {:.4})", c.lat, c.lon),
            Place::Name(name) => f.write_str(name),
        }
    }
}

/// Label used when a coordinate fix has no reverse-geocoded name.
pub fn coordinate_label(coords: Coordinates) -> String {
    format!("Location ({:.2}, {:.2})", coords.lat, coords.lon)
}

/// Which unit system requests and derived values use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        }
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "°C",
            UnitSystem::Imperial => "°F",
        }
    }

    /// Factor turning the provider's wind speed into the displayed unit.
    ///
    /// Metric responses carry m/s and are shown in km/h; imperial responses
    /// already carry mph.
    pub fn wind_display_factor(&self) -> f64 {
        match self {
            UnitSystem::Metric => 3.6,
            UnitSystem::Imperial => 1.0,
        }
    }

    pub fn wind_unit(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "km/h",
            UnitSystem::Imperial => "mph",
        }
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UnitSystem {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: metric, imperial."
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Current conditions for the active place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    /// As delivered by the provider: m/s (metric) or mph (imperial).
    pub wind_speed: f64,
    pub description: String,
    pub icon: String,
    pub provider_name: Option<String>,
    pub observed_at: Option<DateTime<Utc>>,
}

impl WeatherSnapshot {
    pub fn wind_for_display(&self, units: UnitSystem) -> f64 {
        (self.wind_speed * units.wind_display_factor()).round()
    }
}

/// One entry of the provider's fixed-interval forecast feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub timestamp: DateTime<Utc>,
    pub time_text: Option<String>,
    pub temperature: f64,
    pub high: f64,
    pub low: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub description: String,
    pub icon: String,
}

/// Geocoding candidate, deserialized straight from the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

impl Suggestion {
    /// `"Name, Country"`, the label a place gets once selected.
    pub fn display_label(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }

    /// `"Name, State, Country"`, used when listing candidates.
    pub fn long_label(&self) -> String {
        match self.state.as_deref().filter(|s| !s.is_empty()) {
            Some(state) => format!("{}, {}, {}", self.name, state, self.country),
            None => self.display_label(),
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }
}

/// Current conditions together with the sampled daily forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub snapshot: WeatherSnapshot,
    pub forecast: Vec<ForecastEntry>,
    /// Units the values were requested in.
    pub units: UnitSystem,
}

/// Progress of one fetch pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Success,
    Error(String),
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            RequestState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}
