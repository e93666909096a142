//! Group Digest - a chat-bot plugin that summarizes group conversations with a language model.
//!
//! Inbound group messages are buffered per group. A buffer is summarized and cleared when it
//! reaches the configured message count, when someone sends the trigger command, or when the
//! daily job fires. Each summary is followed by a live weather line for a configured city.
//!
//! # Architecture
//!
//! The crate talks to the outside world through four seams:
//! - [`host::ChatHost`] for sending messages and listing active groups
//! - [`host::DailyScheduler`] for the once-a-day job
//! - [`ai::CompletionProvider`] for prompt completion
//! - [`weather::WeatherLookup`] for the weather line
//!
//! Default implementations (`StdioHost`, `TokioDailyScheduler`, `OpenAiProvider`,
//! `AmapWeatherClient`) back the `group-digest` binary.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use group_digest::core::config::PluginConfig;
//! use group_digest::core::models::GroupMessage;
//! use group_digest::host::StdioHost;
//! use group_digest::summary::{SummaryAccumulator, SummaryPlugin};
//! use group_digest::weather::AmapWeatherClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     group_digest::setup_logging();
//!
//!     let config = PluginConfig::default();
//!     let weather = Arc::new(AmapWeatherClient::from_config(&config)?);
//!     let host = Arc::new(StdioHost::stdout());
//!
//!     // No provider registered: flushes send the "not configured" placeholder.
//!     let plugin = SummaryPlugin::new(SummaryAccumulator::new(config, None, weather, host));
//!
//!     plugin
//!         .handle_message(&GroupMessage {
//!             group_id: "10001".into(),
//!             session_id: "qq:group:10001".into(),
//!             text: "/summary".into(),
//!         })
//!         .await;
//!
//!     Ok(())
//! }
//! ```

pub mod ai;
pub mod core;
pub mod errors;
pub mod host;
pub mod prompt;
pub mod summary;
pub mod weather;

pub use ai::estimate_tokens;
pub use errors::DigestError;
pub use summary::{SummaryAccumulator, SummaryPlugin};

/// Configure structured JSON logging.
///
/// Installs a tracing-subscriber JSON formatter filtered by `RUST_LOG`
/// (default `info`). Calling it more than once is harmless.
///
/// # Example
///
/// ```
/// group_digest::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_target(true)
        .with_writer(std::io::stderr);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
