//! Seams to the chat host: message delivery, active-group enumeration and the
//! daily scheduling primitive.

pub mod scheduler;
pub mod stdio;

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::core::models::ActiveGroup;
use crate::errors::DigestError;

pub use scheduler::{TokioDailyScheduler, next_occurrence};
pub use stdio::StdioHost;

/// Message-send primitive and session listing provided by the host.
#[async_trait]
pub trait ChatHost: Send + Sync {
    async fn send(&self, session_id: &str, text: &str) -> Result<(), DigestError>;

    /// Groups the host currently considers active.
    async fn active_groups(&self) -> Result<Vec<ActiveGroup>, DigestError>;
}

/// Callback fired by a [`DailyScheduler`].
pub type DailyJob = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Once-a-day job registration. The host owns the timer.
pub trait DailyScheduler: Send + Sync {
    fn register_daily(&self, hour: u32, minute: u32, job: DailyJob) -> Result<(), DigestError>;
}
