//! Error type returned by the weather client and provider.

use thiserror::Error;

/// Fixed message attached to location lookup failures.
pub const LOCATION_NOT_FOUND_MESSAGE: &str = "Could not resolve the city name";

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("{message} (status {status})")]
    LocationNotFound { status: u16, message: String },

    #[error("{endpoint} request failed with status {status}")]
    Status { status: u16, endpoint: &'static str },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to parse {endpoint} response: {source}")]
    Parse {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Response contained no data: {0}")]
    MissingData(&'static str),

    #[error(
        "No AccuWeather API key configured.\n\
         Hint: run `route-weather configure` or set ROUTE_WEATHER_API_KEY."
    )]
    MissingApiKey,
}

impl WeatherError {
    pub fn location_not_found(status: u16) -> Self {
        Self::LocationNotFound {
            status,
            message: LOCATION_NOT_FOUND_MESSAGE.to_string(),
        }
    }

    /// HTTP status code carried by the error, if the provider answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::LocationNotFound { status, .. } | Self::Status { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Short text suitable for showing next to a city name.
    pub fn user_message(&self) -> String {
        match self {
            Self::LocationNotFound { status, message } => format!("{message} ({status})"),
            Self::Status { status, .. } => format!("provider returned status {status}"),
            Self::Network(_) => "network error, check your connection".to_string(),
            Self::Parse { .. } => "unexpected response from provider".to_string(),
            Self::MissingData(what) => format!("no {what} available"),
            Self::MissingApiKey => "API key is not configured".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_is_exposed_for_http_failures() {
        assert_eq!(WeatherError::location_not_found(200).status_code(), Some(200));
        assert_eq!(
            WeatherError::Status {
                status: 503,
                endpoint: "current conditions",
            }
            .status_code(),
            Some(503)
        );
        assert_eq!(WeatherError::MissingApiKey.status_code(), None);
    }

    #[test]
    fn location_not_found_carries_status_and_message() {
        let err = WeatherError::location_not_found(404);
        let msg = err.to_string();
        assert!(msg.contains(LOCATION_NOT_FOUND_MESSAGE));
        assert!(msg.contains("404"));
        assert!(err.user_message().contains("404"));
    }

    #[test]
    fn missing_api_key_hints_at_configure() {
        let msg = WeatherError::MissingApiKey.to_string();
        assert!(msg.contains("route-weather configure"));
    }
}
