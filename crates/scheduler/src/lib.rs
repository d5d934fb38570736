//! Notification scheduler.
//!
//! Scans stored events on a fixed interval, publishes a notification for
//! each one whose reminder window contains the current instant, marks it
//! sent, and purges events past the retention horizon.

pub mod publisher;
pub mod scheduler;

pub use publisher::{NotificationPublisher, RmqPublisher};
pub use scheduler::{Scheduler, SchedulerError};
