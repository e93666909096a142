//! Per-group message buffers and the flush cycle
//!
//! Each group moves through Empty → Accumulating → Flushing → Empty. A flush is
//! started by the count threshold, the trigger command or the daily tick, and
//! always ends with the group's buffer cleared, whatever happened upstream.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{Instrument, debug, error, info, info_span};
use uuid::Uuid;

use super::compose::produce_summary;
use crate::ai::CompletionProvider;
use crate::core::config::PluginConfig;
use crate::core::models::{FlushOutcome, FlushTrigger, RecordOutcome};
use crate::host::ChatHost;
use crate::weather::WeatherLookup;

pub struct SummaryAccumulator {
    config: PluginConfig,
    buffers: HashMap<String, Vec<String>>,
    provider: Option<Arc<dyn CompletionProvider>>,
    weather: Arc<dyn WeatherLookup>,
    host: Arc<dyn ChatHost>,
}

impl SummaryAccumulator {
    pub fn new(
        config: PluginConfig,
        provider: Option<Arc<dyn CompletionProvider>>,
        weather: Arc<dyn WeatherLookup>,
        host: Arc<dyn ChatHost>,
    ) -> Self {
        Self {
            config,
            buffers: HashMap::new(),
            provider,
            weather,
            host,
        }
    }

    #[must_use]
    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    #[must_use]
    pub fn host(&self) -> Arc<dyn ChatHost> {
        Arc::clone(&self.host)
    }

    /// Messages currently buffered for `group_id`, oldest first.
    #[must_use]
    pub fn buffered(&self, group_id: &str) -> &[String] {
        self.buffers
            .get(group_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn buffer_len(&self, group_id: &str) -> usize {
        self.buffered(group_id).len()
    }

    fn is_trigger(&self, text: &str) -> bool {
        text.trim() == self.config.trigger_command.trim()
    }

    /// Records one inbound group message.
    ///
    /// The trigger command is never buffered: it flushes whatever is pending
    /// (a no-op on an empty buffer). Any other text is appended and flushes the
    /// group once the buffer holds `message_count` entries. The two paths are
    /// exclusive, so one message causes at most one flush.
    pub async fn record_message(
        &mut self,
        group_id: &str,
        session_id: &str,
        text: &str,
    ) -> RecordOutcome {
        if self.is_trigger(text) {
            let outcome = self
                .flush_with(group_id, session_id, FlushTrigger::Command)
                .await;
            return RecordOutcome::Flushed(FlushTrigger::Command, outcome);
        }
        self.append(group_id, session_id, text, FlushTrigger::Threshold)
            .await
    }

    async fn append(
        &mut self,
        group_id: &str,
        session_id: &str,
        text: &str,
        trigger: FlushTrigger,
    ) -> RecordOutcome {
        let buffer = self.buffers.entry(group_id.to_string()).or_default();
        buffer.push(text.to_string());
        let len = buffer.len();
        debug!("Group {} buffer now holds {} messages", group_id, len);

        if len >= self.config.message_count {
            let outcome = self.flush_with(group_id, session_id, trigger).await;
            return RecordOutcome::Flushed(trigger, outcome);
        }
        RecordOutcome::Buffered { len }
    }

    /// Summarizes and clears the group's buffer. Empty buffers are skipped
    /// without touching the provider, the weather service or the host.
    pub async fn flush(&mut self, group_id: &str, session_id: &str) -> FlushOutcome {
        self.flush_with(group_id, session_id, FlushTrigger::Manual)
            .await
    }

    async fn flush_with(
        &mut self,
        group_id: &str,
        session_id: &str,
        trigger: FlushTrigger,
    ) -> FlushOutcome {
        if self.buffer_len(group_id) == 0 {
            debug!("Group {} has nothing buffered; skipping flush", group_id);
            return FlushOutcome::Skipped;
        }

        let span = info_span!(
            "flush",
            group_id = %group_id,
            flush_id = %Uuid::new_v4(),
            trigger = trigger.as_str()
        );

        async {
            let (text, outcome) = produce_summary(
                &self.config,
                self.provider.as_ref(),
                self.weather.as_ref(),
                self.buffered(group_id),
                session_id,
            )
            .await;

            match self.host.send(session_id, &text).await {
                Ok(()) => info!("Dispatched summary ({:?})", outcome),
                Err(e) => error!("Failed to deliver summary: {}", e),
            }

            if let Some(buffer) = self.buffers.get_mut(group_id) {
                buffer.clear();
            }
            outcome
        }
        .instrument(span)
        .await
    }

    /// Daily job: one summary attempt per active group, whatever its buffer
    /// length. Returns the number of groups attempted.
    pub async fn on_daily_tick(&mut self) -> usize {
        let groups = match self.host.active_groups().await {
            Ok(groups) => groups,
            Err(e) => {
                error!("Failed to list active groups for daily summary: {}", e);
                return 0;
            }
        };

        if groups.is_empty() {
            info!("No active groups; skipping daily summary");
            return 0;
        }

        info!("Running daily summary for {} groups", groups.len());
        for group in &groups {
            let recorded = self
                .append(&group.group_id, &group.session_id, "", FlushTrigger::DailyTick)
                .await;
            if let RecordOutcome::Buffered { .. } = recorded {
                self.flush_with(&group.group_id, &group.session_id, FlushTrigger::DailyTick)
                    .await;
            }
        }
        groups.len()
    }
}
