//! AMap live-weather client
//!
//! Every failure is folded into one of the fixed strings below so a flush can
//! always finish.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

use crate::core::config::PluginConfig;
use crate::errors::DigestError;

pub const WEATHER_NOT_CONFIGURED: &str =
    "Weather API is not configured, please set amap_api_key in the plugin settings.";
pub const WEATHER_UNAVAILABLE: &str =
    "Unable to fetch weather information, please check the configuration.";
pub const WEATHER_REQUEST_FAILED: &str = "Weather service request failed, please try again later.";

/// Location in, one human-readable line out. Never fails.
#[async_trait]
pub trait WeatherLookup: Send + Sync {
    async fn current_weather(&self, location: &str) -> String;
}

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    status: String,
    #[serde(default)]
    lives: Vec<LiveWeather>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LiveWeather {
    pub weather: String,
    pub temperature: String,
}

impl LiveWeather {
    #[must_use]
    pub fn describe(&self) -> String {
        format!("{}, temperature: {}°C", self.weather, self.temperature)
    }
}

/// Parses a `weatherInfo` body. `Ok(None)` means the service answered with a
/// non-success status or no live observation.
pub fn parse_weather_body(body: &str) -> Result<Option<LiveWeather>, DigestError> {
    let parsed: WeatherResponse = serde_json::from_str(body)
        .map_err(|e| DigestError::ParseError(format!("weather response: {e}")))?;
    if parsed.status != "1" {
        return Ok(None);
    }
    Ok(parsed.lives.into_iter().next())
}

pub struct AmapWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl AmapWeatherClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DigestError> {
        let http = Client::builder().timeout(timeout).build().map_err(|e| {
            DigestError::HttpError(format!("Failed to build weather HTTP client: {e}"))
        })?;
        Ok(Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn from_config(config: &PluginConfig) -> Result<Self, DigestError> {
        Self::new(
            config.amap_api_key.clone(),
            config.weather_base_url.clone(),
            Duration::from_secs(config.weather_timeout_secs),
        )
    }

    fn request_url(&self, location: &str) -> Result<Url, DigestError> {
        Url::parse_with_params(
            &format!("{}/weatherInfo", self.base_url),
            &[("city", location), ("key", self.api_key.as_str())],
        )
        .map_err(|e| DigestError::WeatherError(format!("weather base URL: {e}")))
    }

    /// One GET against `weatherInfo`; errors are returned, not folded.
    pub async fn fetch_live(&self, location: &str) -> Result<Option<LiveWeather>, DigestError> {
        if self.api_key.trim().is_empty() {
            return Err(DigestError::ConfigError("amap_api_key is empty".to_string()));
        }

        let response = self.http.get(self.request_url(location)?).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DigestError::WeatherError(format!("HTTP {status}")));
        }
        let body = response.text().await?;
        parse_weather_body(&body)
    }
}

#[async_trait]
impl WeatherLookup for AmapWeatherClient {
    async fn current_weather(&self, location: &str) -> String {
        match self.fetch_live(location).await {
            Ok(Some(live)) => {
                info!("Weather for {}: {}", location, live.weather);
                live.describe()
            }
            Ok(None) => WEATHER_UNAVAILABLE.to_string(),
            Err(e) if e.is_configuration_missing() => WEATHER_NOT_CONFIGURED.to_string(),
            Err(e) => {
                warn!("Weather lookup for {} failed: {}", location, e);
                WEATHER_REQUEST_FAILED.to_string()
            }
        }
    }
}
