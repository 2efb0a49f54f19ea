//! # Event subscribers for the logvisor runtime.
//!
//! This module provides the [`Subscribe`] trait and the built-in
//! [`LogWriter`] for handling runtime events broadcast through the
//! [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   DeviceWorker ── publish(Event) ──► Bus ──► Supervisor listener ──► SubscriberSet
//!                                                                        │
//!                                                             ┌──────────┼──────────┐
//!                                                             ▼          ▼          ▼
//!                                                         LogWriter   Custom      ...
//! ```

mod log;
mod subscribe;
mod subscriber_set;

pub use log::LogWriter;
pub use subscribe::Subscribe;
pub use subscriber_set::SubscriberSet;
