//! High-level lookups: resolve a place, then derive the snapshot or the
//! per-day forecast from the raw provider data.
//!
//! The client keeps no per-call state; each result carries the location it
//! was resolved for.

use tracing::instrument;

use crate::{
    CityForecast, CurrentSnapshot, CurrentWeather, ForecastEntry, LocationQuery, ResolvedLocation,
    WeatherError,
    classify::{PRECIPITATION_OCCURRING, average_humidity, classify, combined_rain_probability},
    provider::{DailyForecast, ForecastSpan, WeatherProvider, accuweather::AccuWeatherProvider},
};

#[derive(Debug, Clone)]
pub struct WeatherClient<P = AccuWeatherProvider> {
    provider: P,
}

impl<P: WeatherProvider> WeatherClient<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Ambiguous city names resolve to the provider's first match.
    #[instrument(skip(self, query), fields(query = %query))]
    pub async fn resolve_location(
        &self,
        query: &LocationQuery,
    ) -> Result<ResolvedLocation, WeatherError> {
        let resolved = match query {
            LocationQuery::City(name) => match self.provider.search_city(name).await {
                Ok(found) => found
                    .into_iter()
                    .next()
                    .ok_or_else(|| WeatherError::location_not_found(200)),
                Err(e) => Err(lookup_failure(e)),
            },
            LocationQuery::Coordinates { lat, lon } => self
                .provider
                .search_geoposition(*lat, *lon)
                .await
                .map_err(lookup_failure),
        };

        match &resolved {
            Ok(loc) => tracing::debug!(key = %loc.key, name = %loc.name, "Location resolved"),
            Err(e) => tracing::warn!(error = %e, "Location lookup failed"),
        }
        resolved
    }

    #[instrument(skip(self, query), fields(query = %query))]
    pub async fn get_current(&self, query: &LocationQuery) -> Result<CurrentWeather, WeatherError> {
        let location = self.resolve_location(query).await?;
        let obs = self.provider.current_conditions(&location.key).await?;

        let rain_probability = if obs.has_precipitation {
            PRECIPITATION_OCCURRING
        } else {
            let today = self
                .provider
                .daily_forecast(&location.key, ForecastSpan::OneDay)
                .await?
                .into_iter()
                .next()
                .ok_or(WeatherError::MissingData("daily forecast"))?;
            combined_rain_probability(today.day.rain_probability, today.night.rain_probability)
        };

        let conditions = classify(obs.temperature_c, obs.wind_speed_kmh, rain_probability);
        tracing::debug!(%conditions, rain_probability, "Current conditions classified");

        Ok(CurrentWeather {
            location,
            snapshot: CurrentSnapshot {
                temperature_c: obs.temperature_c,
                humidity_pct: obs.humidity_pct,
                wind_speed_kmh: obs.wind_speed_kmh,
                description: obs.weather_text,
                rain_probability,
                conditions,
            },
        })
    }

    /// Up to `days` entries of the 5-day forecast, in provider order.
    #[instrument(skip(self, query), fields(query = %query))]
    pub async fn get_forecast(
        &self,
        query: &LocationQuery,
        days: usize,
    ) -> Result<CityForecast, WeatherError> {
        let location = self.resolve_location(query).await?;
        let daily = self
            .provider
            .daily_forecast(&location.key, ForecastSpan::FiveDay)
            .await?;

        let entries: Vec<ForecastEntry> = daily
            .into_iter()
            .take(days)
            .map(forecast_entry)
            .collect();
        tracing::debug!(count = entries.len(), "Forecast entries built");

        Ok(CityForecast { location, entries })
    }
}

/// Lookup failures that carry a status become `LocationNotFound`.
fn lookup_failure(e: WeatherError) -> WeatherError {
    match e.status_code() {
        Some(status) => WeatherError::location_not_found(status),
        None => e,
    }
}

fn forecast_entry(day: DailyForecast) -> ForecastEntry {
    ForecastEntry {
        date: day.date,
        temp_min_c: day.temp_min_c,
        temp_max_c: day.temp_max_c,
        wind_speed_kmh: day.day.wind_speed_kmh,
        rain_probability: day.day.rain_probability,
        humidity_pct: average_humidity(day.day.humidity_pct, day.night.humidity_pct),
        description: day.day.phrase,
    }
}
