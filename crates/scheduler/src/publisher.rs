//! The publish seam between the scheduler and the broker.

use async_trait::async_trait;
use lapin::Channel;

/// Capability to enqueue one serialized notification.
///
/// The scheduler depends on this seam rather than on the broker client, so
/// the sweep logic stays testable without a running broker.
#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    async fn publish(&self, body: &[u8]) -> anyhow::Result<()>;
}

/// Publishes notifications onto a RabbitMQ queue.
pub struct RmqPublisher {
    channel: Channel,
    queue: String,
}

impl RmqPublisher {
    pub fn new(channel: Channel, queue: impl Into<String>) -> Self {
        Self {
            channel,
            queue: queue.into(),
        }
    }
}

#[async_trait]
impl NotificationPublisher for RmqPublisher {
    async fn publish(&self, body: &[u8]) -> anyhow::Result<()> {
        calends_rmq::publish(&self.channel, &self.queue, body).await?;
        Ok(())
    }
}
