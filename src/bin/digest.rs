//! Line-oriented runner: one JSON `GroupMessage` per stdin line, one JSON
//! `OutgoingMessage` per stdout line. Logs go to stderr.

use std::env;
use std::sync::Arc;

use anyhow::Context;
use group_digest::ai::{CompletionProvider, OpenAiProvider};
use group_digest::core::config::{PluginConfig, ProviderConfig};
use group_digest::core::models::GroupMessage;
use group_digest::host::{StdioHost, TokioDailyScheduler};
use group_digest::summary::{SummaryAccumulator, SummaryPlugin};
use group_digest::weather::AmapWeatherClient;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

fn load_config() -> anyhow::Result<PluginConfig> {
    let base = match env::var("DIGEST_CONFIG") {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading plugin config {path}"))?;
            PluginConfig::from_json_str(&raw)?
        }
        Err(_) => PluginConfig::default(),
    };
    Ok(base.with_env_overrides()?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    group_digest::setup_logging();

    let config = load_config()?;
    info!(
        "Starting group-digest: message_count={}, mode={:?}, summary_time={:?}",
        config.message_count, config.summary_mode, config.summary_time
    );

    let provider: Option<Arc<dyn CompletionProvider>> = match ProviderConfig::from_env() {
        Some(provider_config) => Some(Arc::new(OpenAiProvider::new(&provider_config)?)),
        None => {
            warn!("OPENAI_API_KEY not set; summaries will report that no model is configured");
            None
        }
    };
    if !config.weather_enabled() {
        warn!("amap_api_key not set; weather lines will report that weather is not configured");
    }

    let weather = Arc::new(AmapWeatherClient::from_config(&config)?);
    let host = Arc::new(StdioHost::stdout());
    let scheduler = TokioDailyScheduler::new(config.tz()?);

    let accumulator = SummaryAccumulator::new(config, provider, weather, host.clone());
    let plugin = SummaryPlugin::new(accumulator);
    plugin.register_schedule(&scheduler)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        let message: GroupMessage = match serde_json::from_str(&line) {
            Ok(message) => message,
            Err(e) => {
                warn!("Skipping malformed event: {}", e);
                continue;
            }
        };
        if let Err(e) = host.observe(&message) {
            warn!("Failed to track group {}: {}", message.group_id, e);
        }
        plugin.handle_message(&message).await;
    }

    info!("stdin closed; shutting down");
    scheduler.shutdown();
    Ok(())
}
