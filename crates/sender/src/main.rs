//! `calends-sender` — notification delivery daemon.
//!
//! Consumes the durable notifications queue and delivers each payload
//! through the configured sink, acknowledging only after success.
//!
//! # Environment variables
//!
//! | Variable       | Required | Default     | Description     |
//! |----------------|----------|-------------|-----------------|
//! | `RMQ_HOST`     | no       | `localhost` | Broker host     |
//! | `RMQ_PORT`     | no       | `5672`      | Broker port     |
//! | `RMQ_USER`     | no       | `guest`     | Broker user     |
//! | `RMQ_PASSWORD` | no       | `guest`     | Broker password |

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use calends_rmq::{RmqConfig, NOTIFICATIONS_QUEUE};
use calends_sender::{LogSink, Sender};

fn rmq_config_from_env() -> RmqConfig {
    RmqConfig {
        host: std::env::var("RMQ_HOST").unwrap_or_else(|_| "localhost".into()),
        port: std::env::var("RMQ_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5672),
        user: std::env::var("RMQ_USER").unwrap_or_else(|_| "guest".into()),
        password: std::env::var("RMQ_PASSWORD").unwrap_or_else(|_| "guest".into()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "calends_sender=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rmq = rmq_config_from_env();
    let conn = calends_rmq::dial(&rmq).await?;
    let channel = calends_rmq::declare_queue(&conn, NOTIFICATIONS_QUEUE, true).await?;

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received shutdown signal");
            signal_cancel.cancel();
        }
    });

    let consumer = calends_rmq::consume(cancel, &channel, NOTIFICATIONS_QUEUE).await?;

    let sender = Sender::new(Arc::new(LogSink));
    sender.run(consumer).await?;

    Ok(())
}
