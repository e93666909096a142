//! The stateless producer step: prompt → provider → weather → outgoing text.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::ai::CompletionProvider;
use crate::core::config::PluginConfig;
use crate::core::models::FlushOutcome;
use crate::errors::DigestError;
use crate::prompt::{PROVIDER_FAILED, PROVIDER_NOT_CONFIGURED, SUMMARY_HEADER, build_summary_prompt};
use crate::weather::WeatherLookup;

/// Final message body for a successful summary.
#[must_use]
pub fn compose_summary(completion: &str, location: &str, weather: &str) -> String {
    format!(
        "{SUMMARY_HEADER}\n{}\nCurrent weather in {location}: {weather}",
        completion.trim_end()
    )
}

/// Produces the text to dispatch for `messages`. Never fails: a missing
/// provider yields the placeholder, a failed provider yields a degraded
/// message. Weather is only looked up after a successful completion.
pub async fn produce_summary(
    config: &PluginConfig,
    provider: Option<&Arc<dyn CompletionProvider>>,
    weather: &dyn WeatherLookup,
    messages: &[String],
    session_id: &str,
) -> (String, FlushOutcome) {
    let Some(provider) = provider else {
        warn!("No language model provider registered; sending placeholder");
        return (PROVIDER_NOT_CONFIGURED.to_string(), FlushOutcome::ProviderMissing);
    };

    let prompt = build_summary_prompt(messages, config.summary_mode);
    info!(
        "Summarizing {} messages ({} prompt chars)",
        messages.len(),
        prompt.chars().count()
    );

    let timeout = Duration::from_secs(config.provider_timeout_secs);
    let completion = match tokio::time::timeout(timeout, provider.complete(&prompt, session_id))
        .await
        .map_err(DigestError::from)
    {
        Ok(Ok(text)) => text,
        Ok(Err(e)) | Err(e) => {
            error!("Failed to generate summary: {}", e);
            return (PROVIDER_FAILED.to_string(), FlushOutcome::Degraded);
        }
    };

    let weather_line = weather.current_weather(&config.weather_location).await;
    (
        compose_summary(&completion, &config.weather_location, &weather_line),
        FlushOutcome::Summarized,
    )
}
