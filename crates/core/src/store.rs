//! The storage capability interface.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StorageError;
use crate::event::Event;

/// CRUD plus time-windowed listing over [`Event`] records.
///
/// Implemented by every storage backend; callers hold the trait object and
/// never depend on a concrete backend type. Listing operations return the
/// events whose `starts_at` falls inside the half-open window computed by
/// [`crate::window`]; no ordering is guaranteed beyond what the backend
/// naturally provides.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Insert a new event. Fails with [`StorageError::AlreadyExists`] if
    /// the ID is already present; no fields are generated implicitly.
    async fn create_event(&self, event: Event) -> Result<(), StorageError>;

    /// Replace the event stored under `id` wholesale. Fails with
    /// [`StorageError::NotFound`] if absent. The replacement is atomic: no
    /// reader observes a partially updated record.
    async fn update_event(&self, id: &str, event: Event) -> Result<(), StorageError>;

    /// Remove the event stored under `id`. Fails with
    /// [`StorageError::NotFound`] if absent.
    async fn delete_event(&self, id: &str) -> Result<(), StorageError>;

    /// Events starting within the day containing `date`.
    async fn list_day_events(&self, date: DateTime<Utc>) -> Result<Vec<Event>, StorageError>;

    /// Events starting within the Monday-anchored week containing `date`.
    async fn list_week_events(&self, date: DateTime<Utc>) -> Result<Vec<Event>, StorageError>;

    /// Events starting within the month containing `date`.
    async fn list_month_events(&self, date: DateTime<Utc>) -> Result<Vec<Event>, StorageError>;

    /// Delete every event with `starts_at <= cutoff`, returning the number
    /// of events removed.
    async fn remove_events_before(&self, cutoff: DateTime<Utc>) -> Result<u64, StorageError>;
}
