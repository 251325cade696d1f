use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{LocationKey, ResolvedLocation, WeatherError};

use super::{DailyForecast, ForecastSpan, HalfDay, NightHalf, Observation, WeatherProvider};

pub const DEFAULT_BASE_URL: &str = "http://dataservice.accuweather.com";
pub const DEFAULT_LANGUAGE: &str = "en-us";

#[derive(Debug, Clone)]
pub struct AccuWeatherProvider {
    api_key: String,
    language: String,
    base_url: String,
    http: Client,
}

impl AccuWeatherProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            language: DEFAULT_LANGUAGE.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, WeatherError> {
        self.http = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    fn forecast_query(&self) -> [(&str, &str); 3] {
        [
            ("language", self.language.as_str()),
            ("details", "true"),
            ("metric", "true"),
        ]
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, WeatherError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(endpoint, %url, "AccuWeather request");

        let res = self
            .http
            .get(&url)
            .query(&[("apikey", self.api_key.as_str())])
            .query(query)
            .send()
            .await
            .inspect_err(|e| {
                tracing::warn!(endpoint, error = %e, "AccuWeather request failed");
            })?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::warn!(
                endpoint,
                status = status.as_u16(),
                body = %truncate_body(&body),
                "AccuWeather returned an error status"
            );
            return Err(WeatherError::Status {
                status: status.as_u16(),
                endpoint,
            });
        }

        serde_json::from_str(&body).map_err(|source| {
            tracing::warn!(endpoint, error = %source, "Failed to parse AccuWeather response");
            WeatherError::Parse { endpoint, source }
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwLocation {
    key: String,
    localized_name: Option<String>,
}

impl From<AwLocation> for ResolvedLocation {
    fn from(loc: AwLocation) -> Self {
        let name = loc.localized_name.unwrap_or_else(|| loc.key.clone());
        ResolvedLocation {
            key: LocationKey::new(loc.key),
            name,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwValue {
    value: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwUnits {
    metric: AwValue,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwCurrentWind {
    speed: AwUnits,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwCurrent {
    weather_text: String,
    has_precipitation: bool,
    temperature: AwUnits,
    relative_humidity: Option<f64>,
    wind: AwCurrentWind,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwTemperatureRange {
    minimum: AwValue,
    maximum: AwValue,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwForecastWind {
    speed: AwValue,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwHumidity {
    average: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwDay {
    rain_probability: f64,
    wind: AwForecastWind,
    #[serde(default)]
    long_phrase: String,
    relative_humidity: Option<AwHumidity>,
}

impl From<AwDay> for HalfDay {
    fn from(h: AwDay) -> Self {
        HalfDay {
            rain_probability: h.rain_probability,
            wind_speed_kmh: h.wind.speed.value,
            phrase: h.long_phrase,
            humidity_pct: h.relative_humidity.and_then(|rh| rh.average),
        }
    }
}

/// Only the night's rain chance and humidity are consumed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwNight {
    rain_probability: f64,
    relative_humidity: Option<AwHumidity>,
}

impl From<AwNight> for NightHalf {
    fn from(h: AwNight) -> Self {
        NightHalf {
            rain_probability: h.rain_probability,
            humidity_pct: h.relative_humidity.and_then(|rh| rh.average),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwDailyForecast {
    date: DateTime<FixedOffset>,
    temperature: AwTemperatureRange,
    day: AwDay,
    night: AwNight,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwForecastResponse {
    daily_forecasts: Vec<AwDailyForecast>,
}

#[async_trait]
impl WeatherProvider for AccuWeatherProvider {
    async fn search_city(&self, name: &str) -> Result<Vec<ResolvedLocation>, WeatherError> {
        let found: Vec<AwLocation> = self
            .get_json("city search", "/locations/v1/search", &[("q", name)])
            .await?;

        Ok(found.into_iter().map(ResolvedLocation::from).collect())
    }

    async fn search_geoposition(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<ResolvedLocation, WeatherError> {
        let q = format!("{lat},{lon}");
        let path = "/locations/v1/cities/geoposition/search";
        let found: AwLocation = self
            .get_json("geoposition search", path, &[("q", q.as_str())])
            .await?;

        Ok(found.into())
    }

    async fn current_conditions(&self, key: &LocationKey) -> Result<Observation, WeatherError> {
        let path = format!("/currentconditions/v1/{key}");
        let current: Vec<AwCurrent> = self
            .get_json("current conditions", &path, &self.forecast_query())
            .await?;

        let current = current
            .into_iter()
            .next()
            .ok_or(WeatherError::MissingData("current conditions"))?;

        Ok(Observation {
            temperature_c: current.temperature.metric.value,
            humidity_pct: current.relative_humidity.unwrap_or(0.0),
            wind_speed_kmh: current.wind.speed.metric.value,
            weather_text: current.weather_text,
            has_precipitation: current.has_precipitation,
        })
    }

    async fn daily_forecast(
        &self,
        key: &LocationKey,
        span: ForecastSpan,
    ) -> Result<Vec<DailyForecast>, WeatherError> {
        let path = format!("/forecasts/v1/daily/{}/{key}", span.as_path());
        let parsed: AwForecastResponse = self
            .get_json("daily forecast", &path, &self.forecast_query())
            .await?;

        Ok(parsed
            .daily_forecasts
            .into_iter()
            .map(|d| DailyForecast {
                date: d.date.date_naive(),
                temp_min_c: d.temperature.minimum.value,
                temp_max_c: d.temperature.maximum.value,
                day: d.day.into(),
                night: d.night.into(),
            })
            .collect())
    }
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
