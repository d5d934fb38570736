//! The scheduler run loop and per-tick sweep.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Months, Utc};
use tokio_util::sync::CancellationToken;

use calends_core::{EventNotification, EventStore, StorageError};

use crate::publisher::NotificationPublisher;

/// Retention horizon: events that started more than this many months ago
/// are deleted on every tick.
const RETENTION_MONTHS: u32 = 12;

/// Errors fatal to a scheduler run.
///
/// The loop performs no internal retry; recovery is process supervision.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("storage operation failed")]
    Storage(#[from] StorageError),

    #[error("failed to encode notification")]
    Encode(#[from] serde_json::Error),

    #[error("failed to publish notification")]
    Publish(#[source] anyhow::Error),
}

/// Periodic scanner that turns due events into queued notifications.
pub struct Scheduler {
    storage: Arc<dyn EventStore>,
    publisher: Arc<dyn NotificationPublisher>,
    tick: Duration,
}

impl Scheduler {
    pub fn new(
        storage: Arc<dyn EventStore>,
        publisher: Arc<dyn NotificationPublisher>,
        tick: Duration,
    ) -> Self {
        Self {
            storage,
            publisher,
            tick,
        }
    }

    /// Run the scheduler loop until `cancel` fires.
    ///
    /// Cancellation is observed only between ticks; an in-progress sweep
    /// runs to completion or to its first fatal error.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), SchedulerError> {
        tracing::info!(tick_secs = self.tick.as_secs(), "Scheduler started");

        let mut interval = tokio::time::interval(self.tick);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Scheduler stopping");
                    return Ok(());
                }
                _ = interval.tick() => {
                    self.sweep(Utc::now()).await?;
                }
            }
        }
    }

    /// One pass: publish every due event, then purge expired ones.
    ///
    /// The sent flag is persisted only after a successful publish, so a
    /// failure (or crash) between the two rediscovers the event on a later
    /// tick — at-least-once, with duplicates tolerated downstream.
    pub async fn sweep(&self, now: DateTime<Utc>) -> Result<(), SchedulerError> {
        let events = self.storage.list_day_events(now).await?;
        tracing::debug!(count = events.len(), "Scanning today's events");

        for mut event in events {
            if !event.is_due(now) {
                continue;
            }

            let body = serde_json::to_vec(&EventNotification::from(&event))?;
            self.publisher
                .publish(&body)
                .await
                .map_err(SchedulerError::Publish)?;

            tracing::info!(
                event_id = %event.id,
                starts_at = %event.starts_at,
                "Queued event notification"
            );

            event.notification_sent = true;
            let id = event.id.clone();
            self.storage.update_event(&id, event).await?;
        }

        let cutoff = now
            .checked_sub_months(Months::new(RETENTION_MONTHS))
            .expect("retention cutoff stays in chrono's supported range");
        let removed = self.storage.remove_events_before(cutoff).await?;
        if removed > 0 {
            tracing::info!(removed, %cutoff, "Purged events past retention");
        }

        Ok(())
    }
}
