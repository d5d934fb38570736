//! Application facade over the event store.
//!
//! [`Calendar`] exposes the five operations the external transport layer
//! (gRPC/HTTP, not part of this workspace) is allowed to call. Request
//! validation and wire marshaling belong to that layer; this one owns
//! identity generation and delegation to the configured backend.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use calends_core::{Event, EventStore, StorageError};

/// The calendar application service.
///
/// Works identically over any [`EventStore`] backend; the store instance
/// is injected at construction, never reached through a global.
#[derive(Clone)]
pub struct Calendar {
    storage: Arc<dyn EventStore>,
}

impl Calendar {
    pub fn new(storage: Arc<dyn EventStore>) -> Self {
        Self { storage }
    }

    /// Create an event from the caller-supplied ID and title.
    ///
    /// The owner ID is generated here; the remaining fields stay zeroed
    /// until the caller fills them in with a full-replace update.
    pub async fn create_event(
        &self,
        id: impl Into<String>,
        title: impl Into<String>,
    ) -> Result<(), StorageError> {
        let owner_id = Uuid::new_v4();

        self.storage
            .create_event(Event::new(id, title, owner_id.to_string()))
            .await
    }

    /// Replace the event stored under `id` wholesale.
    pub async fn update_event(&self, id: &str, event: Event) -> Result<(), StorageError> {
        self.storage.update_event(id, event).await
    }

    pub async fn delete_event(&self, id: &str) -> Result<(), StorageError> {
        self.storage.delete_event(id).await
    }

    pub async fn list_day_events(&self, date: DateTime<Utc>) -> Result<Vec<Event>, StorageError> {
        self.storage.list_day_events(date).await
    }

    pub async fn list_week_events(&self, date: DateTime<Utc>) -> Result<Vec<Event>, StorageError> {
        self.storage.list_week_events(date).await
    }

    pub async fn list_month_events(&self, date: DateTime<Utc>) -> Result<Vec<Event>, StorageError> {
        self.storage.list_month_events(date).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone};

    use calends_storage::MemoryStorage;

    fn calendar() -> Calendar {
        Calendar::new(Arc::new(MemoryStorage::new()))
    }

    #[tokio::test]
    async fn create_generates_distinct_owner_ids() {
        let calendar = calendar();

        calendar.create_event("e-1", "standup").await.unwrap();
        calendar.create_event("e-2", "retro").await.unwrap();

        // Fresh events start at the epoch; list that day to read them back.
        let events = calendar.list_day_events(DateTime::UNIX_EPOCH).await.unwrap();

        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| !e.owner_id.is_empty()));
        assert_ne!(events[0].owner_id, events[1].owner_id);
    }

    #[tokio::test]
    async fn duplicate_create_surfaces_already_exists() {
        let calendar = calendar();

        calendar.create_event("e-1", "standup").await.unwrap();
        let err = calendar.create_event("e-1", "retro").await.unwrap_err();

        assert_matches!(err, StorageError::AlreadyExists(id) if id == "e-1");
    }

    #[tokio::test]
    async fn update_then_windowed_listings_see_the_event() {
        let calendar = calendar();
        let starts_at = Utc.with_ymd_and_hms(2021, 6, 20, 12, 0, 0).unwrap();

        calendar.create_event("e-1", "standup").await.unwrap();

        let created = calendar
            .list_day_events(DateTime::UNIX_EPOCH)
            .await
            .unwrap()
            .remove(0);
        let mut updated = created.clone();
        updated.starts_at = starts_at;
        updated.duration = Duration::minutes(30);
        updated.description = "weekly sync".into();
        calendar.update_event("e-1", updated.clone()).await.unwrap();

        assert_eq!(calendar.list_day_events(starts_at).await.unwrap(), vec![updated.clone()]);
        assert_eq!(calendar.list_week_events(starts_at).await.unwrap(), vec![updated.clone()]);
        assert_eq!(calendar.list_month_events(starts_at).await.unwrap(), vec![updated]);
    }

    #[tokio::test]
    async fn update_and_delete_on_absent_ids_surface_not_found() {
        let calendar = calendar();

        let err = calendar
            .update_event("ghost", Event::new("ghost", "nope", "u-1"))
            .await
            .unwrap_err();
        assert_matches!(err, StorageError::NotFound(id) if id == "ghost");

        let err = calendar.delete_event("ghost").await.unwrap_err();
        assert_matches!(err, StorageError::NotFound(id) if id == "ghost");
    }

    #[tokio::test]
    async fn delete_removes_the_event() {
        let calendar = calendar();

        calendar.create_event("e-1", "standup").await.unwrap();
        calendar.delete_event("e-1").await.unwrap();

        assert!(calendar
            .list_day_events(DateTime::UNIX_EPOCH)
            .await
            .unwrap()
            .is_empty());
    }
}
