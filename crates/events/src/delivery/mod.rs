//! Notification sinks that deliver outside the process.
//!
//! The in-process [`LogSink`](crate::sink::LogSink) lives next to the
//! [`NotificationSink`](crate::sink::NotificationSink) trait.

pub mod webhook;
