//! Open-Meteo `current_weather` client.
//!
//! [`WeatherClient::fetch`] never fails: every problem is logged and
//! collapses to `None`, because weather only enriches the prompt.

use std::time::Duration;

use dreamloop_core::{Coordinates, WeatherSnapshot};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::codes::describe_weather_code;
use crate::error::WeatherError;

const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com";

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: Option<CurrentWeather>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: Option<f64>,
    weathercode: Option<i64>,
}

pub struct WeatherClient {
    client: Client,
    forecast_url: Url,
}

impl WeatherClient {
    /// Creates a client pointed at the public Open-Meteo API.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(timeout_secs: u64) -> Result<Self, WeatherError> {
        Self::with_base_url(timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`WeatherError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(timeout_secs: u64, base_url: &str) -> Result<Self, WeatherError> {
        let forecast_url = Url::parse(&format!("{}/v1/forecast", base_url.trim_end_matches('/')))
            .map_err(|e| WeatherError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: e.to_string(),
            })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .build()?;
        Ok(Self {
            client,
            forecast_url,
        })
    }

    /// Current conditions at `coordinates`, or `None` when unavailable.
    pub async fn fetch(
        &self,
        coordinates: Option<Coordinates>,
        timezone: &str,
    ) -> Option<WeatherSnapshot> {
        let Some(coordinates) = coordinates else {
            tracing::debug!("no coordinates for weather; skipping");
            return None;
        };

        match self.try_fetch(coordinates, timezone).await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!(error = %e, "weather fetch failed");
                None
            }
        }
    }

    async fn try_fetch(
        &self,
        coordinates: Coordinates,
        timezone: &str,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let url = self.request_url(coordinates, timezone);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let forecast: ForecastResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::Deserialize {
                context: "forecast".to_string(),
                source: e,
            })?;

        let current = forecast
            .current_weather
            .ok_or(WeatherError::MissingCurrent)?;
        let (summary, icon) = current
            .weathercode
            .map_or_else(|| ("Clear sky".to_string(), "☀️"), describe_weather_code);

        Ok(WeatherSnapshot {
            summary,
            temp_c: current.temperature,
            icon: icon.to_string(),
        })
    }

    fn request_url(&self, coordinates: Coordinates, timezone: &str) -> Url {
        let mut url = self.forecast_url.clone();
        url.query_pairs_mut()
            .append_pair("latitude", &coordinates.lat.to_string())
            .append_pair("longitude", &coordinates.lon.to_string())
            .append_pair("current_weather", "true")
            .append_pair("timezone", timezone);
        url
    }
}
