use crate::{
    Config, LocationKey, ResolvedLocation, WeatherError, provider::accuweather::AccuWeatherProvider,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::{fmt::Debug, time::Duration};

pub mod accuweather;

/// Which daily forecast endpoint to hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastSpan {
    OneDay,
    FiveDay,
}

impl ForecastSpan {
    pub fn as_path(&self) -> &'static str {
        match self {
            ForecastSpan::OneDay => "1day",
            ForecastSpan::FiveDay => "5day",
        }
    }
}

/// Current conditions as reported by the provider, before any derivation.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub wind_speed_kmh: f64,
    pub weather_text: String,
    pub has_precipitation: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HalfDay {
    pub rain_probability: f64,
    pub wind_speed_kmh: f64,
    pub phrase: String,
    pub humidity_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NightHalf {
    pub rain_probability: f64,
    pub humidity_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub day: HalfDay,
    pub night: NightHalf,
}

/// Raw endpoints of a weather provider. Non-success statuses come back as
/// [`WeatherError::Status`].
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Matches in provider order, possibly empty.
    async fn search_city(&self, name: &str) -> Result<Vec<ResolvedLocation>, WeatherError>;

    async fn search_geoposition(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<ResolvedLocation, WeatherError>;

    async fn current_conditions(&self, key: &LocationKey) -> Result<Observation, WeatherError>;

    async fn daily_forecast(
        &self,
        key: &LocationKey,
        span: ForecastSpan,
    ) -> Result<Vec<DailyForecast>, WeatherError>;
}

/// Construct the AccuWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<AccuWeatherProvider> {
    let api_key = config.api_key().ok_or(WeatherError::MissingApiKey)?;

    let provider = AccuWeatherProvider::new(api_key)
        .with_language(&config.language)
        .with_base_url(&config.base_url)
        .with_timeout(Duration::from_secs(config.request_timeout_secs))?;

    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn forecast_span_paths() {
        assert_eq!(ForecastSpan::OneDay.as_path(), "1day");
        assert_eq!(ForecastSpan::FiveDay.as_path(), "5day");
    }

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No AccuWeather API key configured"));
    }

    #[test]
    fn provider_from_config_works_when_key_set() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        let provider = provider_from_config(&cfg);
        assert!(provider.is_ok());
    }
}
