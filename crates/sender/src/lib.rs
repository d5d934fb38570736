//! Notification sender.
//!
//! Consumes the notifications queue and hands each decoded payload to a
//! pluggable delivery sink, acknowledging only after the sink succeeds.

pub mod sender;
pub mod sink;

pub use sender::{Sender, SenderError};
pub use sink::{LogSink, NotificationSink};
