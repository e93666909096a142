use thiserror::Error;

#[derive(Debug, Error)]
pub enum DigestError {
    #[error("Invalid or missing configuration: {0}")]
    ConfigError(String),

    #[error("Failed to access language model provider: {0}")]
    ProviderError(String),

    #[error("Failed to access weather service: {0}")]
    WeatherError(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Failed to reach chat host: {0}")]
    HostError(String),

    #[error("Timed out waiting for {0}")]
    Timeout(String),
}

impl DigestError {
    /// Missing provider or weather key. Reported to users as a placeholder, never fatal.
    #[must_use]
    pub fn is_configuration_missing(&self) -> bool {
        matches!(self, DigestError::ConfigError(_))
    }

    /// Provider or weather call failed in transit, returned non-2xx, or sent bad JSON.
    #[must_use]
    pub fn is_upstream_failure(&self) -> bool {
        matches!(
            self,
            DigestError::ProviderError(_)
                | DigestError::WeatherError(_)
                | DigestError::HttpError(_)
                | DigestError::ParseError(_)
                | DigestError::Timeout(_)
        )
    }
}

impl From<reqwest::Error> for DigestError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            DigestError::Timeout(error.to_string())
        } else {
            DigestError::HttpError(error.to_string())
        }
    }
}

impl From<serde_json::Error> for DigestError {
    fn from(error: serde_json::Error) -> Self {
        DigestError::ParseError(error.to_string())
    }
}

impl From<tokio::time::error::Elapsed> for DigestError {
    fn from(error: tokio::time::error::Elapsed) -> Self {
        DigestError::Timeout(error.to_string())
    }
}

impl From<anyhow::Error> for DigestError {
    fn from(error: anyhow::Error) -> Self {
        DigestError::HostError(error.to_string())
    }
}
