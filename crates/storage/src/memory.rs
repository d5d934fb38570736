//! In-memory event storage.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use calends_core::window;
use calends_core::{Event, EventStore, StorageError};

/// Event storage backed by a map behind one coarse reader-writer lock.
///
/// Writers exclude each other and all readers; the windowed listings scan
/// the whole map under a shared read lock, so concurrent reads proceed in
/// parallel. The coarse lock is intentional: reads are full scans anyway,
/// so a secondary index would buy nothing at this scale.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    events: RwLock<HashMap<String, Event>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    async fn list_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<Event> {
        let events = self.events.read().await;
        events
            .values()
            .filter(|e| e.starts_at >= from && e.starts_at < to)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl EventStore for MemoryStorage {
    async fn create_event(&self, event: Event) -> Result<(), StorageError> {
        let mut events = self.events.write().await;

        if events.contains_key(&event.id) {
            return Err(StorageError::AlreadyExists(event.id));
        }

        events.insert(event.id.clone(), event);

        Ok(())
    }

    async fn update_event(&self, id: &str, event: Event) -> Result<(), StorageError> {
        let mut events = self.events.write().await;

        if !events.contains_key(id) {
            return Err(StorageError::NotFound(id.to_string()));
        }

        events.insert(id.to_string(), event);

        Ok(())
    }

    async fn delete_event(&self, id: &str) -> Result<(), StorageError> {
        let mut events = self.events.write().await;

        if events.remove(id).is_none() {
            return Err(StorageError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn list_day_events(&self, date: DateTime<Utc>) -> Result<Vec<Event>, StorageError> {
        let (from, to) = window::day_window(date);
        Ok(self.list_between(from, to).await)
    }

    async fn list_week_events(&self, date: DateTime<Utc>) -> Result<Vec<Event>, StorageError> {
        let (from, to) = window::week_window(date);
        Ok(self.list_between(from, to).await)
    }

    async fn list_month_events(&self, date: DateTime<Utc>) -> Result<Vec<Event>, StorageError> {
        let (from, to) = window::month_window(date);
        Ok(self.list_between(from, to).await)
    }

    async fn remove_events_before(&self, cutoff: DateTime<Utc>) -> Result<u64, StorageError> {
        let mut events = self.events.write().await;

        let before = events.len();
        events.retain(|_, e| e.starts_at > cutoff);

        Ok((before - events.len()) as u64)
    }
}
