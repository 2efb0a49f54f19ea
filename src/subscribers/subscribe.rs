//! # Event subscriber trait.
//!
//! `Subscribe` is the extension point for plugging custom event handlers into
//! the runtime. Each subscriber is driven by a dedicated worker loop fed by a
//! bounded queue owned by the [`SubscriberSet`](crate::SubscriberSet).
//!
//! ## Rules
//! - A slow subscriber only affects its own queue.
//! - Queue overflow drops the event **for this subscriber only** and publishes
//!   `EventKind::SubscriberOverflow`.
//! - Events are processed sequentially (FIFO) per subscriber.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use logvisor::{Event, EventKind, Subscribe};
//!
//! struct Disconnects;
//!
//! #[async_trait]
//! impl Subscribe for Disconnects {
//!     async fn on_event(&self, ev: &Event) {
//!         if matches!(ev.kind, EventKind::DeviceRemoved) {
//!             // notify, count, ...
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "disconnects" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Contract for event subscribers.
///
/// Called from a subscriber-dedicated worker task. Implementations should
/// avoid blocking the async runtime and must not panic; panics are caught
/// and reported as `SubscriberPanicked`.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles a single event.
    async fn on_event(&self, event: &Event);

    /// Name used in overflow/panic reports.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this subscriber's queue (clamped to at least 1).
    fn queue_capacity(&self) -> usize {
        1024
    }
}
