use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::ChatHost;
use crate::core::models::{ActiveGroup, GroupMessage, OutgoingMessage};
use crate::errors::DigestError;

/// Line-oriented host used by the `group-digest` binary. Outgoing messages are
/// written as one JSON object per line; every group that has sent a message is
/// considered active.
pub struct StdioHost<W> {
    out: tokio::sync::Mutex<W>,
    seen: Mutex<BTreeMap<String, String>>,
}

impl StdioHost<tokio::io::Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

impl<W> StdioHost<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(out: W) -> Self {
        Self {
            out: tokio::sync::Mutex::new(out),
            seen: Mutex::new(BTreeMap::new()),
        }
    }

    /// Remembers the group so the daily job can reach it. Private and other
    /// groupless sessions are never recorded.
    pub fn observe(&self, message: &GroupMessage) -> Result<(), DigestError> {
        if message.group_id.is_empty() {
            return Ok(());
        }
        self.seen
            .lock()
            .map_err(|e| DigestError::HostError(format!("session table poisoned: {e}")))?
            .insert(message.group_id.clone(), message.session_id.clone());
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

#[async_trait]
impl<W> ChatHost for StdioHost<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn send(&self, session_id: &str, text: &str) -> Result<(), DigestError> {
        let mut line = serde_json::to_vec(&OutgoingMessage {
            session_id: session_id.to_string(),
            text: text.to_string(),
        })?;
        line.push(b'\n');

        let mut out = self.out.lock().await;
        out.write_all(&line)
            .await
            .map_err(|e| DigestError::HostError(format!("write failed: {e}")))?;
        out.flush()
            .await
            .map_err(|e| DigestError::HostError(format!("flush failed: {e}")))?;
        Ok(())
    }

    async fn active_groups(&self) -> Result<Vec<ActiveGroup>, DigestError> {
        let seen = self
            .seen
            .lock()
            .map_err(|e| DigestError::HostError(format!("session table poisoned: {e}")))?;
        Ok(seen
            .iter()
            .map(|(group_id, session_id)| ActiveGroup {
                group_id: group_id.clone(),
                session_id: session_id.clone(),
            })
            .collect())
    }
}
