use serde::{Deserialize, Serialize};

/// Inbound group-message event delivered by the host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupMessage {
    pub group_id: String,
    pub session_id: String,
    #[serde(default)]
    pub text: String,
}

/// A group the host reports as currently active.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActiveGroup {
    pub group_id: String,
    pub session_id: String,
}

/// Outbound plain-text message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub session_id: String,
    pub text: String,
}

/// What caused a flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushTrigger {
    Threshold,
    Command,
    DailyTick,
    /// Direct call to `SummaryAccumulator::flush`.
    Manual,
}

impl FlushTrigger {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            FlushTrigger::Threshold => "threshold",
            FlushTrigger::Command => "command",
            FlushTrigger::DailyTick => "daily_tick",
            FlushTrigger::Manual => "manual",
        }
    }
}

/// Result of a single `flush`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Buffer was empty; nothing was called or sent.
    Skipped,
    /// Provider answered and the summary (with weather) was dispatched.
    Summarized,
    /// No provider registered; the placeholder was dispatched.
    ProviderMissing,
    /// Provider failed or timed out; a degraded message was dispatched.
    Degraded,
}

/// Result of routing one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Buffered { len: usize },
    Flushed(FlushTrigger, FlushOutcome),
}
