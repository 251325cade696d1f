use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Provider-internal identifier of a place, required by the weather endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationKey(String);

impl LocationKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the user asked for: a city name or a coordinate pair.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City(String),
    Coordinates { lat: f64, lon: f64 },
}

impl LocationQuery {
    pub fn city(name: impl Into<String>) -> Self {
        Self::City(name.into())
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::City(name) => f.write_str(name),
            Self::Coordinates { lat, lon } => write!(f, "{lat},{lon}"),
        }
    }
}

impl FromStr for LocationQuery {
    type Err = std::convert::Infallible;

    /// `"55.75,37.62"` becomes coordinates, anything else is a city name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some((lat, lon)) = trimmed.split_once(',') {
            if let (Ok(lat), Ok(lon)) = (lat.trim().parse::<f64>(), lon.trim().parse::<f64>()) {
                if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) {
                    return Ok(Self::Coordinates { lat, lon });
                }
            }
        }
        Ok(Self::City(trimmed.to_string()))
    }
}

/// A location key together with the name the provider matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub key: LocationKey,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Conditions {
    Good,
    Bad,
}

impl Conditions {
    pub fn as_str(&self) -> &'static str {
        match self {
            Conditions::Good => "good",
            Conditions::Bad => "bad",
        }
    }
}

impl fmt::Display for Conditions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current-conditions summary for one city at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentSnapshot {
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub wind_speed_kmh: f64,
    pub description: String,
    pub rain_probability: f64,
    pub conditions: Conditions,
}

impl CurrentSnapshot {
    /// e.g. `"bad weather, light snow"`.
    pub fn summary(&self) -> String {
        format!(
            "{} weather, {}",
            self.conditions,
            self.description.to_lowercase()
        )
    }
}

/// One day's aggregated forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub date: NaiveDate,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub wind_speed_kmh: f64,
    pub rain_probability: f64,
    pub humidity_pct: f64,
    pub description: String,
}

impl ForecastEntry {
    pub fn mean_temperature(&self) -> f64 {
        (self.temp_min_c + self.temp_max_c) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentWeather {
    pub location: ResolvedLocation,
    pub snapshot: CurrentSnapshot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CityForecast {
    pub location: ResolvedLocation,
    pub entries: Vec<ForecastEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_coordinates() {
        let q: LocationQuery = "55.75, 37.62".parse().unwrap();
        assert_eq!(
            q,
            LocationQuery::Coordinates {
                lat: 55.75,
                lon: 37.62
            }
        );
    }

    #[test]
    fn non_numeric_input_is_a_city() {
        let q: LocationQuery = " Saint Petersburg ".parse().unwrap();
        assert_eq!(q, LocationQuery::city("Saint Petersburg"));

        let q: LocationQuery = "Washington, DC".parse().unwrap();
        assert_eq!(q, LocationQuery::city("Washington, DC"));
    }

    #[test]
    fn out_of_range_coordinates_fall_back_to_city() {
        let q: LocationQuery = "120,10".parse().unwrap();
        assert_eq!(q, LocationQuery::city("120,10"));
    }

    #[test]
    fn summary_lowercases_description() {
        let snapshot = CurrentSnapshot {
            temperature_c: 2.0,
            humidity_pct: 70.0,
            wind_speed_kmh: 10.0,
            description: "Light Snow".to_string(),
            rain_probability: 58.0,
            conditions: Conditions::Bad,
        };
        assert_eq!(snapshot.summary(), "bad weather, light snow");
    }
}
