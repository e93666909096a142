use std::sync::Mutex;

use chrono::{DateTime, Local, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::{DailyJob, DailyScheduler};
use crate::errors::DigestError;

/// Next instant strictly after `now` at which the wall clock in `tz` reads `at`.
/// Uses the machine's local zone when `tz` is `None`. Days where `at` does not
/// exist (DST gap) are skipped.
#[must_use]
pub fn next_occurrence(now: DateTime<Utc>, at: NaiveTime, tz: Option<Tz>) -> DateTime<Utc> {
    let next = match tz {
        Some(zone) => next_in_zone(now, at, &zone),
        None => next_in_zone(now, at, &Local),
    };
    next.unwrap_or_else(|| now + chrono::Duration::days(1))
}

fn next_in_zone<Z: TimeZone>(now: DateTime<Utc>, at: NaiveTime, zone: &Z) -> Option<DateTime<Utc>> {
    let mut date = now.with_timezone(zone).date_naive();
    for _ in 0..3 {
        let candidate = zone
            .from_local_datetime(&date.and_time(at))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc));
        if let Some(dt) = candidate
            && dt > now
        {
            return Some(dt);
        }
        date = date.succ_opt()?;
    }
    None
}

/// [`DailyScheduler`] that runs each job on its own tokio task.
pub struct TokioDailyScheduler {
    tz: Option<Tz>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl TokioDailyScheduler {
    #[must_use]
    pub fn new(tz: Option<Tz>) -> Self {
        Self {
            tz,
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Aborts every registered job.
    pub fn shutdown(&self) {
        match self.tasks.lock() {
            Ok(mut tasks) => tasks.drain(..).for_each(|t| t.abort()),
            Err(e) => error!("Scheduler task list poisoned: {}", e),
        }
    }
}

impl DailyScheduler for TokioDailyScheduler {
    fn register_daily(&self, hour: u32, minute: u32, job: DailyJob) -> Result<(), DigestError> {
        let at = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| {
            DigestError::ConfigError(format!("invalid daily time {hour:02}:{minute:02}"))
        })?;
        let tz = self.tz;

        let handle = tokio::spawn(async move {
            loop {
                let now = Utc::now();
                let next = next_occurrence(now, at, tz);
                let wait = (next - now).to_std().unwrap_or_default();
                info!("Next daily summary at {} (in {}s)", next, wait.as_secs());
                tokio::time::sleep(wait).await;
                job().await;
            }
        });

        self.tasks
            .lock()
            .map_err(|e| DigestError::HostError(format!("scheduler lock poisoned: {e}")))?
            .push(handle);
        Ok(())
    }
}

impl Drop for TokioDailyScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}
