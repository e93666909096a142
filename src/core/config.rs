use std::env;
use std::fmt;
use std::str::FromStr;

use chrono_tz::Tz;
use serde::{Deserialize, Deserializer};

use crate::errors::DigestError;

pub const DEFAULT_MESSAGE_COUNT: usize = 50;
pub const DEFAULT_TRIGGER_COMMAND: &str = "/summary";
pub const DEFAULT_HELP_COMMAND: &str = "/summary_help";
pub const DEFAULT_WEATHER_LOCATION: &str = "北京";
pub const DEFAULT_WEATHER_BASE_URL: &str = "https://restapi.amap.com/v3/weather";
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_WEATHER_TIMEOUT_SECS: u64 = 10;

/// Phrasing requested from the model. Also accepts the labels used by the
/// Chinese plugin configuration panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SummaryMode {
    #[default]
    Concise,
    Formal,
    Humorous,
}

impl FromStr for SummaryMode {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "concise" | "简介" => Ok(SummaryMode::Concise),
            "formal" | "严谨" => Ok(SummaryMode::Formal),
            "humorous" | "幽默" => Ok(SummaryMode::Humorous),
            other => Err(DigestError::ConfigError(format!(
                "unknown summary_mode '{other}' (expected concise, formal or humorous)"
            ))),
        }
    }
}

/// When summaries go out besides the count threshold and the trigger command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SummaryTime {
    #[default]
    Immediate,
    Daily,
}

impl FromStr for SummaryTime {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "immediate" => Ok(SummaryTime::Immediate),
            "daily" => Ok(SummaryTime::Daily),
            other => Err(DigestError::ConfigError(format!(
                "unknown summary_time '{other}' (expected immediate or daily)"
            ))),
        }
    }
}

/// Wall-clock `HH:MM` for the daily job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendTime {
    pub hour: u32,
    pub minute: u32,
}

impl Default for SendTime {
    fn default() -> Self {
        Self {
            hour: 23,
            minute: 59,
        }
    }
}

impl FromStr for SendTime {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (h, m) = s.trim().split_once(':').ok_or_else(|| {
            DigestError::ConfigError(format!("fixed_send_time '{s}' is not in HH:MM form"))
        })?;
        let hour: u32 = h
            .parse()
            .map_err(|e| DigestError::ConfigError(format!("fixed_send_time hour '{h}': {e}")))?;
        let minute: u32 = m
            .parse()
            .map_err(|e| DigestError::ConfigError(format!("fixed_send_time minute '{m}': {e}")))?;
        if hour > 23 || minute > 59 {
            return Err(DigestError::ConfigError(format!(
                "fixed_send_time '{s}' is out of range"
            )));
        }
        Ok(Self { hour, minute })
    }
}

impl fmt::Display for SendTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Config-file values go through the same `FromStr` as the environment overrides.
fn deserialize_from_str<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr<Err = DigestError>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

impl<'de> Deserialize<'de> for SummaryMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_from_str(deserializer)
    }
}

impl<'de> Deserialize<'de> for SummaryTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_from_str(deserializer)
    }
}

impl<'de> Deserialize<'de> for SendTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_from_str(deserializer)
    }
}

/// Plugin settings supplied by the host. Every field falls back to its default
/// when absent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    pub message_count: usize,
    pub summary_mode: SummaryMode,
    pub trigger_command: String,
    pub help_command: String,
    pub summary_time: SummaryTime,
    pub fixed_send_time: SendTime,
    pub weather_location: String,
    pub amap_api_key: String,
    pub weather_base_url: String,
    /// IANA zone for the daily job. `None` uses the machine's local time.
    pub timezone: Option<String>,
    pub provider_timeout_secs: u64,
    pub weather_timeout_secs: u64,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            message_count: DEFAULT_MESSAGE_COUNT,
            summary_mode: SummaryMode::default(),
            trigger_command: DEFAULT_TRIGGER_COMMAND.to_string(),
            help_command: DEFAULT_HELP_COMMAND.to_string(),
            summary_time: SummaryTime::default(),
            fixed_send_time: SendTime::default(),
            weather_location: DEFAULT_WEATHER_LOCATION.to_string(),
            amap_api_key: String::new(),
            weather_base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
            timezone: None,
            provider_timeout_secs: DEFAULT_PROVIDER_TIMEOUT_SECS,
            weather_timeout_secs: DEFAULT_WEATHER_TIMEOUT_SECS,
        }
    }
}

impl PluginConfig {
    /// Parses host-supplied JSON and validates the result.
    pub fn from_json_str(raw: &str) -> Result<Self, DigestError> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|e| DigestError::ConfigError(format!("plugin config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `DIGEST_*` / `AMAP_API_KEY` environment overrides on top of `self`.
    pub fn with_env_overrides(mut self) -> Result<Self, DigestError> {
        if let Ok(v) = env::var("DIGEST_MESSAGE_COUNT") {
            self.message_count = v
                .parse()
                .map_err(|e| DigestError::ConfigError(format!("DIGEST_MESSAGE_COUNT: {e}")))?;
        }
        if let Ok(v) = env::var("DIGEST_SUMMARY_MODE") {
            self.summary_mode = v.parse()?;
        }
        if let Ok(v) = env::var("DIGEST_TRIGGER_COMMAND") {
            self.trigger_command = v;
        }
        if let Ok(v) = env::var("DIGEST_HELP_COMMAND") {
            self.help_command = v;
        }
        if let Ok(v) = env::var("DIGEST_SUMMARY_TIME") {
            self.summary_time = v.parse()?;
        }
        if let Ok(v) = env::var("DIGEST_FIXED_SEND_TIME") {
            self.fixed_send_time = v.parse()?;
        }
        if let Ok(v) = env::var("DIGEST_WEATHER_LOCATION") {
            self.weather_location = v;
        }
        if let Ok(v) = env::var("AMAP_API_KEY") {
            self.amap_api_key = v;
        }
        if let Ok(v) = env::var("DIGEST_TIMEZONE") {
            self.timezone = Some(v);
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), DigestError> {
        if self.message_count == 0 {
            return Err(DigestError::ConfigError(
                "message_count must be a positive integer".to_string(),
            ));
        }
        if self.trigger_command.trim().is_empty() {
            return Err(DigestError::ConfigError(
                "trigger_command must not be empty".to_string(),
            ));
        }
        self.tz()?;
        Ok(())
    }

    /// Parsed timezone, if one is configured.
    pub fn tz(&self) -> Result<Option<Tz>, DigestError> {
        self.timezone
            .as_deref()
            .map(|name| {
                name.parse::<Tz>()
                    .map_err(|e| DigestError::ConfigError(format!("timezone '{name}': {e}")))
            })
            .transpose()
    }

    #[must_use]
    pub fn weather_enabled(&self) -> bool {
        !self.amap_api_key.trim().is_empty()
    }
}

/// Settings for the bundled OpenAI-backed provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub openai_api_key: String,
    pub openai_org_id: Option<String>,
    pub openai_model: Option<String>,
    pub openai_base_url: Option<String>,
}

impl ProviderConfig {
    /// Returns `None` when `OPENAI_API_KEY` is unset, meaning no provider is registered.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let openai_api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())?;
        Some(Self {
            openai_api_key,
            openai_org_id: env::var("OPENAI_ORG_ID").ok(),
            openai_model: env::var("OPENAI_MODEL").ok(),
            openai_base_url: env::var("OPENAI_BASE_URL").ok(),
        })
    }
}
