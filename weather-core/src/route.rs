//! Route comparison: forecasts for every city on a route, merged onto a
//! shared date axis and split into the four charted metrics.

use std::{collections::BTreeSet, fmt};

use chrono::NaiveDate;
use thiserror::Error;

use crate::{ForecastEntry, LocationQuery, WeatherClient, WeatherError, provider::WeatherProvider};

#[derive(Error, Debug)]
pub enum RouteError {
    #[error("{0}")]
    Validation(String),

    #[error("Error for city {city}: {}", .source.user_message())]
    City {
        city: String,
        #[source]
        source: WeatherError,
    },

    #[error("No data for city {0}")]
    NoData(String),
}

/// Forecast horizons offered for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForecastHorizon {
    #[default]
    One,
    Three,
    Five,
}

impl ForecastHorizon {
    pub fn days(&self) -> usize {
        match self {
            ForecastHorizon::One => 1,
            ForecastHorizon::Three => 3,
            ForecastHorizon::Five => 5,
        }
    }
}

impl TryFrom<u8> for ForecastHorizon {
    type Error = RouteError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ForecastHorizon::One),
            3 => Ok(ForecastHorizon::Three),
            5 => Ok(ForecastHorizon::Five),
            other => Err(RouteError::Validation(format!(
                "Unsupported forecast horizon {other}. Choose 1, 3 or 5 days."
            ))),
        }
    }
}

/// Ordered list of cities: origin, intermediates, destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    cities: Vec<String>,
}

impl Route {
    /// `intermediates` is a comma-separated list; blank entries are dropped.
    pub fn parse(
        origin: &str,
        intermediates: Option<&str>,
        destination: &str,
    ) -> Result<Self, RouteError> {
        let origin = normalize_city(origin);
        let destination = normalize_city(destination);

        if origin.is_empty() || destination.is_empty() {
            return Err(RouteError::Validation(
                "Both the origin and the destination city are required.".to_string(),
            ));
        }

        let mut cities = vec![origin];
        cities.extend(
            intermediates
                .unwrap_or_default()
                .split(',')
                .map(normalize_city)
                .filter(|c| !c.is_empty()),
        );
        cities.push(destination);

        Ok(Self { cities })
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }
}

/// Trims and capitalizes: first letter upper case, the rest lower case.
pub fn normalize_city(name: &str) -> String {
    let mut chars = name.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    MeanTemperature,
    WindSpeed,
    Humidity,
    RainProbability,
}

impl Metric {
    pub const fn all() -> &'static [Metric] {
        &[
            Metric::MeanTemperature,
            Metric::WindSpeed,
            Metric::Humidity,
            Metric::RainProbability,
        ]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Metric::MeanTemperature => "Mean temperature",
            Metric::WindSpeed => "Wind speed",
            Metric::Humidity => "Humidity",
            Metric::RainProbability => "Rain probability",
        }
    }

    pub fn axis_label(&self) -> &'static str {
        match self {
            Metric::MeanTemperature => "Temperature (°C)",
            Metric::WindSpeed => "Wind speed (km/h)",
            Metric::Humidity => "Humidity (%)",
            Metric::RainProbability => "Rain probability (%)",
        }
    }

    pub fn file_stem(&self) -> &'static str {
        match self {
            Metric::MeanTemperature => "temperature",
            Metric::WindSpeed => "wind",
            Metric::Humidity => "humidity",
            Metric::RainProbability => "rain",
        }
    }

    pub fn value(&self, entry: &ForecastEntry) -> f64 {
        match self {
            Metric::MeanTemperature => entry.mean_temperature(),
            Metric::WindSpeed => entry.wind_speed_kmh,
            Metric::Humidity => entry.humidity_pct,
            Metric::RainProbability => entry.rain_probability,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CitySeries {
    pub city: String,
    pub entries: Vec<ForecastEntry>,
}

/// One line of a chart: a value per date of the shared axis, `None` where the
/// city has no entry for that date.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
    pub city: String,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteReport {
    pub dates: Vec<NaiveDate>,
    pub cities: Vec<CitySeries>,
}

impl RouteReport {
    pub fn new(cities: Vec<CitySeries>) -> Self {
        let dates: BTreeSet<NaiveDate> = cities
            .iter()
            .flat_map(|c| c.entries.iter().map(|e| e.date))
            .collect();

        Self {
            dates: dates.into_iter().collect(),
            cities,
        }
    }

    pub fn series(&self, metric: Metric) -> Vec<MetricSeries> {
        self.cities
            .iter()
            .map(|c| MetricSeries {
                city: c.city.clone(),
                values: self
                    .dates
                    .iter()
                    .map(|d| {
                        c.entries
                            .iter()
                            .find(|e| e.date == *d)
                            .map(|e| metric.value(e))
                    })
                    .collect(),
            })
            .collect()
    }

    /// Min and max over all cities for `metric`, if there is any value.
    pub fn range(&self, metric: Metric) -> Option<(f64, f64)> {
        self.cities
            .iter()
            .flat_map(|c| c.entries.iter().map(|e| metric.value(e)))
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Fetch forecasts for every city in route order. The first failing city
/// aborts the whole route.
pub async fn fetch_route<P: WeatherProvider>(
    client: &WeatherClient<P>,
    route: &Route,
    horizon: ForecastHorizon,
) -> Result<RouteReport, RouteError> {
    let mut cities = Vec::with_capacity(route.cities().len());

    for city in route.cities() {
        let forecast = client
            .get_forecast(&LocationQuery::city(city.as_str()), horizon.days())
            .await
            .map_err(|source| {
                tracing::warn!(%city, error = %source, "Route aborted");
                RouteError::City {
                    city: city.clone(),
                    source,
                }
            })?;

        if forecast.entries.is_empty() {
            return Err(RouteError::NoData(city.clone()));
        }

        cities.push(CitySeries {
            city: city.clone(),
            entries: forecast.entries,
        });
    }

    Ok(RouteReport::new(cities))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(day: u32, temp: f64, rain: f64) -> ForecastEntry {
        ForecastEntry {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            temp_min_c: temp - 2.0,
            temp_max_c: temp + 2.0,
            wind_speed_kmh: 10.0,
            rain_probability: rain,
            humidity_pct: 60.0,
            description: "Cloudy".to_string(),
        }
    }

    #[test]
    fn normalize_city_capitalizes() {
        assert_eq!(normalize_city("  moSCOW "), "Moscow");
        assert_eq!(normalize_city("новосибирск"), "Новосибирск");
        assert_eq!(normalize_city("   "), "");
    }

    #[test]
    fn route_keeps_order_and_drops_blank_intermediates() {
        let route =
            Route::parse("moscow", Some(" tver, ,novgorod,"), "saint petersburg").unwrap();
        assert_eq!(route.cities(), ["Moscow", "Tver", "Novgorod", "Saint petersburg"]);
    }

    #[test]
    fn route_requires_both_ends() {
        let err = Route::parse("Moscow", None, " ").unwrap_err();
        assert!(matches!(err, RouteError::Validation(_)));
    }

    #[test]
    fn horizon_accepts_only_offered_values() {
        assert_eq!(ForecastHorizon::try_from(3).unwrap().days(), 3);
        assert!(ForecastHorizon::try_from(2).is_err());
        assert_eq!(ForecastHorizon::default().days(), 1);
    }

    #[test]
    fn report_merges_dates_sorted_and_deduplicated() {
        let report = RouteReport::new(vec![
            CitySeries {
                city: "A".into(),
                entries: vec![entry(2, 10.0, 5.0), entry(3, 12.0, 0.0)],
            },
            CitySeries {
                city: "B".into(),
                entries: vec![entry(1, 0.0, 90.0), entry(2, 1.0, 80.0)],
            },
        ]);

        let days: Vec<u32> = report.dates.iter().map(chrono::Datelike::day).collect();
        assert_eq!(days, vec![1, 2, 3]);

        let temps = report.series(Metric::MeanTemperature);
        assert_eq!(temps[0].values, vec![None, Some(10.0), Some(12.0)]);
        assert_eq!(temps[1].values, vec![Some(0.0), Some(1.0), None]);

        assert_eq!(report.range(Metric::RainProbability), Some((0.0, 90.0)));
    }

    #[test]
    fn city_error_names_city_with_user_message() {
        let err = RouteError::City {
            city: "Tver".to_string(),
            source: WeatherError::location_not_found(200),
        };

        assert_eq!(
            err.to_string(),
            "Error for city Tver: Could not resolve the city name (200)"
        );
    }

    #[test]
    fn empty_report_has_no_range() {
        let report = RouteReport::new(Vec::new());
        assert!(report.dates.is_empty());
        assert_eq!(report.range(Metric::Humidity), None);
    }
}
