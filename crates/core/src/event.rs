//! Calendar event model and the notification wire projection.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A calendar entry owned by a single user.
///
/// The pair (`starts_at`, `starts_at + duration`) is the event's active
/// interval; `starts_at - notify_before` is the instant at which the owner
/// wants to be reminded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Unique identifier, supplied by the caller on creation.
    pub id: String,

    pub title: String,

    /// When the event begins (UTC).
    pub starts_at: DateTime<Utc>,

    /// How long the event lasts.
    pub duration: Duration,

    pub description: String,

    /// Identifier of the owning user.
    pub owner_id: String,

    /// How far ahead of `starts_at` the reminder fires.
    pub notify_before: Duration,

    /// Set once a notification for this event has been queued.
    pub notification_sent: bool,
}

impl Event {
    /// Create an event with only the identity fields set.
    ///
    /// The remaining fields start zeroed; callers fill them in through a
    /// full-replace update.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        owner_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            starts_at: DateTime::UNIX_EPOCH,
            duration: Duration::zero(),
            description: String::new(),
            owner_id: owner_id.into(),
            notify_before: Duration::zero(),
            notification_sent: false,
        }
    }

    /// Instant at which the event's active interval ends.
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.starts_at + self.duration
    }

    /// Instant at which the reminder fires.
    pub fn notify_at(&self) -> DateTime<Utc> {
        self.starts_at - self.notify_before
    }

    /// Whether a reminder should be queued at `now`.
    ///
    /// True while `now` lies in `[notify_at, ends_at)` and no notification
    /// has been queued yet. Once the active interval has elapsed the window
    /// is closed; reminders are never sent retroactively.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        !self.notification_sent && now >= self.notify_at() && now < self.ends_at()
    }
}

/// Wire-level projection of an [`Event`] — the only payload that crosses
/// the queue boundary.
///
/// Deliberately excludes `description` and the `notification_sent` flag;
/// the consumer needs neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventNotification {
    pub id: String,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub user_id: String,
}

impl From<&Event> for EventNotification {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id.clone(),
            title: event.title.clone(),
            starts_at: event.starts_at,
            user_id: event.owner_id.clone(),
        }
    }
}
