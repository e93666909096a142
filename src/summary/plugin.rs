use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use super::accumulator::SummaryAccumulator;
use crate::core::config::{PluginConfig, SummaryTime};
use crate::core::models::{GroupMessage, RecordOutcome};
use crate::errors::DigestError;
use crate::host::{ChatHost, DailyJob, DailyScheduler};
use crate::prompt::render_help_text;

/// How an inbound event was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// Not a group message, or no text to buffer.
    Ignored,
    HelpSent,
    Recorded(RecordOutcome),
}

/// Host-facing entry point. Routes events into a shared accumulator so that
/// message handling and the daily job never run at the same time.
#[derive(Clone)]
pub struct SummaryPlugin {
    accumulator: Arc<Mutex<SummaryAccumulator>>,
    host: Arc<dyn ChatHost>,
    config: PluginConfig,
}

impl SummaryPlugin {
    #[must_use]
    pub fn new(accumulator: SummaryAccumulator) -> Self {
        let host = accumulator.host();
        let config = accumulator.config().clone();
        Self {
            accumulator: Arc::new(Mutex::new(accumulator)),
            host,
            config,
        }
    }

    #[must_use]
    pub fn accumulator(&self) -> Arc<Mutex<SummaryAccumulator>> {
        Arc::clone(&self.accumulator)
    }

    #[must_use]
    pub fn help_text(&self) -> String {
        render_help_text(
            &self.config.trigger_command,
            self.config.message_count,
            &self.config.fixed_send_time.to_string(),
        )
    }

    pub async fn handle_message(&self, message: &GroupMessage) -> EventOutcome {
        if message.group_id.is_empty() {
            return EventOutcome::Ignored;
        }

        let text = message.text.trim();
        if text == self.config.help_command.trim() {
            if let Err(e) = self.host.send(&message.session_id, &self.help_text()).await {
                error!("Failed to send help text: {}", e);
            }
            return EventOutcome::HelpSent;
        }
        if text.is_empty() {
            debug!("Ignoring message without text in group {}", message.group_id);
            return EventOutcome::Ignored;
        }

        let mut accumulator = self.accumulator.lock().await;
        EventOutcome::Recorded(
            accumulator
                .record_message(&message.group_id, &message.session_id, &message.text)
                .await,
        )
    }

    /// Registers the daily job when `summary_time` is `daily`. Returns whether
    /// a job was registered.
    pub fn register_schedule(&self, scheduler: &dyn DailyScheduler) -> Result<bool, DigestError> {
        if self.config.summary_time != SummaryTime::Daily {
            return Ok(false);
        }

        let accumulator = Arc::clone(&self.accumulator);
        let job: DailyJob = Arc::new(move || {
            let accumulator = Arc::clone(&accumulator);
            async move {
                let attempted = accumulator.lock().await.on_daily_tick().await;
                info!("Daily summary attempted for {} groups", attempted);
            }
            .boxed()
        });

        let at = self.config.fixed_send_time;
        scheduler.register_daily(at.hour, at.minute, job)?;
        info!("Daily summary scheduled at {}", at);
        Ok(true)
    }
}
