//! Derived fields: combined rain probability, good/bad classification and
//! day/night humidity averaging.

use crate::model::Conditions;

const MIN_COMFORT_TEMP_C: f64 = 5.0;
const MAX_COMFORT_TEMP_C: f64 = 30.0;
const MAX_WIND_KMH: f64 = 35.0;
const MAX_RAIN_PROBABILITY: f64 = 70.0;
const COLD_TEMP_C: f64 = 15.0;
const COLD_MAX_WIND_KMH: f64 = 40.0;

/// Rain probability used while precipitation is already occurring.
pub const PRECIPITATION_OCCURRING: f64 = 100.0;

/// Probabilistic union of independent day and night chances, both in percent.
pub fn combined_rain_probability(day: f64, night: f64) -> f64 {
    day + night - day * night / 100.0
}

pub fn classify(temperature_c: f64, wind_speed_kmh: f64, rain_probability: f64) -> Conditions {
    let bad = temperature_c < MIN_COMFORT_TEMP_C
        || temperature_c > MAX_COMFORT_TEMP_C
        || wind_speed_kmh > MAX_WIND_KMH
        || rain_probability > MAX_RAIN_PROBABILITY
        || (temperature_c < COLD_TEMP_C && wind_speed_kmh > COLD_MAX_WIND_KMH);

    if bad { Conditions::Bad } else { Conditions::Good }
}

/// Missing values count as zero.
pub fn average_humidity(day: Option<f64>, night: Option<f64>) -> f64 {
    (day.unwrap_or(0.0) + night.unwrap_or(0.0)) / 2.0
}
