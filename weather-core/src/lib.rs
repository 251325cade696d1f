//! Core library for the `route-weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The AccuWeather provider and the client deriving snapshots and forecasts
//! - Good/bad classification and rain probability math
//! - Route assembly for multi-city comparisons
//!
//! Failures are reported through `tracing`; install a subscriber to see them.

pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod route;

pub use client::WeatherClient;
pub use config::Config;
pub use error::WeatherError;
pub use model::{
    CityForecast, Conditions, CurrentSnapshot, CurrentWeather, ForecastEntry, LocationKey,
    LocationQuery, ResolvedLocation,
};
pub use provider::{WeatherProvider, accuweather::AccuWeatherProvider, provider_from_config};
pub use route::{ForecastHorizon, Metric, Route, RouteError, RouteReport};

/// Build a client for the AccuWeather provider described by `config`.
pub fn client_from_config(config: &Config) -> anyhow::Result<WeatherClient> {
    Ok(WeatherClient::new(provider_from_config(config)?))
}
