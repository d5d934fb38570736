//! PostgreSQL event storage.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};

use calends_core::window;
use calends_core::{Event, EventStore, StorageError};

/// Column list for `events` queries.
const COLUMNS: &str =
    "id, title, starts_at, duration, description, owner_id, notify_before, notification_sent";

/// Upper bound on pool connections.
const MAX_CONNECTIONS: u32 = 5;

/// A row from the `events` table. Durations are stored as whole seconds.
#[derive(Debug, FromRow)]
struct EventRow {
    id: String,
    title: String,
    starts_at: DateTime<Utc>,
    duration: i64,
    description: String,
    owner_id: String,
    notify_before: i64,
    notification_sent: bool,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            starts_at: row.starts_at,
            duration: Duration::seconds(row.duration),
            description: row.description,
            owner_id: row.owner_id,
            notify_before: Duration::seconds(row.notify_before),
            notification_sent: row.notification_sent,
        }
    }
}

/// Event storage backed by PostgreSQL.
///
/// The windowed listings run an indexed `starts_at` range query and order
/// by `starts_at` for determinism.
#[derive(Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Wrap an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to `url`, run pending migrations, and verify connectivity.
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        sqlx::query("SELECT 1").execute(&pool).await?;

        tracing::info!("Connected to PostgreSQL");

        Ok(Self::new(pool))
    }

    async fn list_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Event>, StorageError> {
        let query = format!(
            "SELECT {COLUMNS} FROM events \
             WHERE starts_at >= $1 AND starts_at < $2 \
             ORDER BY starts_at"
        );

        let rows = sqlx::query_as::<_, EventRow>(&query)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::connectivity)?;

        Ok(rows.into_iter().map(Event::from).collect())
    }
}

#[async_trait]
impl EventStore for PgStorage {
    async fn create_event(&self, event: Event) -> Result<(), StorageError> {
        let query = format!("INSERT INTO events ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)");

        sqlx::query(&query)
            .bind(&event.id)
            .bind(&event.title)
            .bind(event.starts_at)
            .bind(event.duration.num_seconds())
            .bind(&event.description)
            .bind(&event.owner_id)
            .bind(event.notify_before.num_seconds())
            .bind(event.notification_sent)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    StorageError::AlreadyExists(event.id.clone())
                }
                other => StorageError::connectivity(other),
            })?;

        Ok(())
    }

    async fn update_event(&self, id: &str, event: Event) -> Result<(), StorageError> {
        let result = sqlx::query(
            "UPDATE events SET \
                title = $1, starts_at = $2, duration = $3, description = $4, \
                owner_id = $5, notify_before = $6, notification_sent = $7 \
             WHERE id = $8",
        )
        .bind(&event.title)
        .bind(event.starts_at)
        .bind(event.duration.num_seconds())
        .bind(&event.description)
        .bind(&event.owner_id)
        .bind(event.notify_before.num_seconds())
        .bind(event.notification_sent)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(StorageError::connectivity)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn delete_event(&self, id: &str) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::connectivity)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn list_day_events(&self, date: DateTime<Utc>) -> Result<Vec<Event>, StorageError> {
        let (from, to) = window::day_window(date);
        self.list_between(from, to).await
    }

    async fn list_week_events(&self, date: DateTime<Utc>) -> Result<Vec<Event>, StorageError> {
        let (from, to) = window::week_window(date);
        self.list_between(from, to).await
    }

    async fn list_month_events(&self, date: DateTime<Utc>) -> Result<Vec<Event>, StorageError> {
        let (from, to) = window::month_window(date);
        self.list_between(from, to).await
    }

    async fn remove_events_before(&self, cutoff: DateTime<Utc>) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM events WHERE starts_at <= $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(StorageError::connectivity)?;

        Ok(result.rows_affected())
    }
}
