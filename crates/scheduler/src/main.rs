//! `calends-scheduler` — periodic notification scheduler daemon.
//!
//! Scans the events table on a fixed interval, queues a notification for
//! every due event, and purges events past the retention horizon.
//!
//! # Environment variables
//!
//! | Variable                  | Required | Default     | Description                   |
//! |---------------------------|----------|-------------|-------------------------------|
//! | `DATABASE_URL`            | yes      | --          | PostgreSQL connection URL     |
//! | `SCHEDULER_INTERVAL_SECS` | no       | `60`        | Seconds between sweeps        |
//! | `RMQ_HOST`                | no       | `localhost` | Broker host                   |
//! | `RMQ_PORT`                | no       | `5672`      | Broker port                   |
//! | `RMQ_USER`                | no       | `guest`     | Broker user                   |
//! | `RMQ_PASSWORD`            | no       | `guest`     | Broker password               |

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use calends_rmq::{RmqConfig, NOTIFICATIONS_QUEUE};
use calends_scheduler::{RmqPublisher, Scheduler};
use calends_storage::PgStorage;

/// Default interval between sweeps.
const DEFAULT_INTERVAL_SECS: u64 = 60;

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
                .unwrap_or_else(|_| "calends_scheduler=info,calends_storage=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

    let interval_secs: u64 = std::env::var("SCHEDULER_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_INTERVAL_SECS);

    let storage = PgStorage::connect(&database_url).await?;

    let rmq = rmq_config_from_env();
    let conn = calends_rmq::dial(&rmq).await?;
    let channel = calends_rmq::declare_queue(&conn, NOTIFICATIONS_QUEUE, true).await?;
    let publisher = RmqPublisher::new(channel, NOTIFICATIONS_QUEUE);

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received shutdown signal");
            signal_cancel.cancel();
        }
    });

    let scheduler = Scheduler::new(
        Arc::new(storage),
        Arc::new(publisher),
        Duration::from_secs(interval_secs),
    );

    scheduler.run(cancel).await?;

    Ok(())
}
