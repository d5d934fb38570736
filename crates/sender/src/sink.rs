//! Delivery sinks.

use async_trait::async_trait;

use calends_core::EventNotification;

/// Capability to deliver one notification to its recipient.
///
/// The actual transport (email, SMS, push) is injected by the binary; the
/// consume loop only requires that a delivery either succeeds or fails.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, notification: &EventNotification) -> anyhow::Result<()>;
}

/// Sink that writes notifications to the log.
///
/// Stands in for a real transport in deployments that only need the
/// pipeline exercised end to end.
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn deliver(&self, notification: &EventNotification) -> anyhow::Result<()> {
        tracing::info!(
            event_id = %notification.id,
            user_id = %notification.user_id,
            starts_at = %notification.starts_at,
            title = %notification.title,
            "Delivering event notification"
        );

        Ok(())
    }
}
