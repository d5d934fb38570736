//! The consume loop.

use std::sync::Arc;

use futures::StreamExt;
use lapin::options::BasicAckOptions;
use lapin::Consumer;

use calends_core::EventNotification;

use crate::sink::NotificationSink;

/// Errors fatal to a sender run.
///
/// There is no dead-lettering or skip policy: a malformed payload stops
/// the loop rather than silently dropping messages, and the broker
/// redelivers whatever was left unacknowledged.
#[derive(Debug, thiserror::Error)]
pub enum SenderError {
    #[error("broker consume failed")]
    Consume(#[source] lapin::Error),

    #[error("failed to decode notification payload")]
    Decode(#[from] serde_json::Error),

    #[error("notification delivery failed")]
    Deliver(#[source] anyhow::Error),

    #[error("failed to acknowledge delivery")]
    Ack(#[source] lapin::Error),
}

/// Consumes queued notifications and delivers them through a sink.
pub struct Sender {
    sink: Arc<dyn NotificationSink>,
}

impl Sender {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self { sink }
    }

    /// Decode one payload and deliver it through the sink.
    pub async fn process(&self, body: &[u8]) -> Result<EventNotification, SenderError> {
        let notification: EventNotification = serde_json::from_slice(body)?;

        self.sink
            .deliver(&notification)
            .await
            .map_err(SenderError::Deliver)?;

        Ok(notification)
    }

    /// Drive the delivery stream until it terminates.
    ///
    /// Each delivery is acknowledged only after the sink reports success,
    /// so a crash mid-delivery leaves the message eligible for broker
    /// redelivery. The stream ends when the consuming channel is closed.
    pub async fn run(&self, mut consumer: Consumer) -> Result<(), SenderError> {
        tracing::info!("Sender started");

        while let Some(delivery) = consumer.next().await {
            let delivery = delivery.map_err(SenderError::Consume)?;

            let notification = self.process(&delivery.data).await?;

            delivery
                .ack(BasicAckOptions::default())
                .await
                .map_err(SenderError::Ack)?;

            tracing::debug!(event_id = %notification.id, "Acknowledged event notification");
        }

        tracing::info!("Delivery stream closed, sender stopping");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    /// Sink that records notifications, or fails every call when told to.
    #[derive(Default)]
    struct RecordingSink {
        delivered: Mutex<Vec<EventNotification>>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl NotificationSink for RecordingSink {
        async fn deliver(&self, notification: &EventNotification) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("smtp connection refused");
            }
            self.delivered.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    fn notification() -> EventNotification {
        EventNotification {
            id: "e-1".into(),
            title: "standup".into(),
            starts_at: Utc.with_ymd_and_hms(2021, 6, 20, 12, 0, 0).unwrap(),
            user_id: "u-1".into(),
        }
    }

    #[tokio::test]
    async fn process_delivers_decoded_notification() {
        let sink = Arc::new(RecordingSink::default());
        let sender = Sender::new(Arc::clone(&sink) as Arc<dyn NotificationSink>);

        let body = serde_json::to_vec(&notification()).unwrap();
        let processed = sender.process(&body).await.unwrap();

        assert_eq!(processed, notification());
        assert_eq!(sink.delivered.lock().unwrap().clone(), vec![notification()]);
    }

    #[tokio::test]
    async fn process_rejects_malformed_payload() {
        let sink = Arc::new(RecordingSink::default());
        let sender = Sender::new(Arc::clone(&sink) as Arc<dyn NotificationSink>);

        let err = sender.process(b"{not json").await.unwrap_err();

        assert_matches!(err, SenderError::Decode(_));
        assert!(sink.delivered.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn process_surfaces_sink_failure() {
        let sink = Arc::new(RecordingSink {
            delivered: Mutex::new(Vec::new()),
            fail: true,
        });
        let sender = Sender::new(Arc::clone(&sink) as Arc<dyn NotificationSink>);

        let body = serde_json::to_vec(&notification()).unwrap();
        let err = sender.process(&body).await.unwrap_err();

        assert_matches!(err, SenderError::Deliver(_));
    }
}
