//! # Runtime events emitted by the discovery loop and device workers.
//!
//! The [`EventKind`] enum classifies event types across four groups:
//! - **Discovery events**: listing failures, rejected rows, new devices
//! - **Worker lifecycle events**: open attempts, retries, streaming, removal
//! - **Runtime events**: shutdown, output failure, no devices at startup
//! - **Subscriber events**: overflow and panics inside subscribers
//!
//! The [`Event`] struct carries metadata such as the device serial, attempt
//! number, retry delay and a human-readable reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use logvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::BackoffScheduled)
//!     .with_device("0123456789ABCDEF")
//!     .with_reason("failed to spawn `adb`")
//!     .with_attempt(3)
//!     .with_delay(Duration::from_secs(1));
//!
//! assert_eq!(ev.kind, EventKind::BackoffScheduled);
//! assert_eq!(ev.device.as_deref(), Some("0123456789ABCDEF"));
//! assert_eq!(ev.delay_ms, Some(1000));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::color::Color;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `reason`: subscriber name and panic message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `reason`: subscriber name and `full` / `closed`
    SubscriberOverflow,

    // === Discovery events ===
    /// The device source could not be queried this cycle.
    ///
    /// Sets:
    /// - `reason`: source error
    ListingFailed,

    /// A listing row did not describe a usable device.
    ///
    /// Sets:
    /// - `reason`: parse error and the offending row
    ListingLineRejected,

    /// A new serial was registered and its worker spawned.
    ///
    /// Sets:
    /// - `device`: serial
    /// - `color`: color assigned to the device
    DeviceDiscovered,

    // === Worker lifecycle events ===
    /// Worker is attempting to open the log source.
    ///
    /// Sets:
    /// - `device`: serial
    /// - `attempt`: attempt number (1-based)
    WorkerStarting,

    /// Opening the log source failed for this attempt.
    ///
    /// Sets:
    /// - `device`, `attempt`, `reason`
    SourceOpenFailed,

    /// Next open attempt scheduled after a failure.
    ///
    /// Sets:
    /// - `device`: serial
    /// - `attempt`: the attempt that failed
    /// - `delay_ms`: delay before the next attempt
    /// - `reason`: last failure message
    BackoffScheduled,

    /// Log source opened; the worker is streaming.
    ///
    /// Sets:
    /// - `device`, `attempt`
    StreamStarted,

    /// A log line did not match the record layout and was skipped.
    ///
    /// Sets:
    /// - `device`: serial
    /// - `reason`: parse error and the offending line
    LineRejected,

    /// The log source ended (end-of-stream, read error, or shutdown).
    ///
    /// Sets:
    /// - `device`: serial
    /// - `reason`: why streaming stopped
    StreamEnded,

    /// Worker gave up opening the log source; it never streamed.
    ///
    /// Sets:
    /// - `device`: serial
    /// - `attempt`: total attempts made
    /// - `reason`: last failure message
    WorkerExhausted,

    /// Device entry removed from the registry; the worker is gone.
    ///
    /// Sets:
    /// - `device`: serial
    DeviceRemoved,

    // === Runtime events ===
    /// No device was registered after the startup wait.
    NoDevices,

    /// Writing to the output stream failed; the runtime is stopping.
    ///
    /// Sets:
    /// - `device`: serial of the worker that hit the failure
    /// - `reason`: I/O error
    OutputFailed,

    /// Shutdown requested (OS signal observed).
    ShutdownRequested,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Serial of the device, if applicable.
    pub device: Option<Arc<str>>,
    /// Attempt count (starting from 1).
    pub attempt: Option<u32>,
    /// Delay before the next attempt in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Color assigned to the device.
    pub color: Option<Color>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            device: None,
            attempt: None,
            delay_ms: None,
            color: None,
            reason: None,
        }
    }

    /// Attaches a device serial.
    #[inline]
    pub fn with_device(mut self, device: impl Into<Arc<str>>) -> Self {
        self.device = Some(device.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches an attempt count.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a retry delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Attaches the color assigned to the device.
    #[inline]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_reason(format!("subscriber={subscriber} panic={info}"))
    }
}
