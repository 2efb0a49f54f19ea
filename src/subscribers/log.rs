//! # LogWriter: runtime events as `tracing` records.
//!
//! Diagnostics go through `tracing` (stderr in the binary) so stdout carries
//! nothing but colorized log records.
//!
//! ## Example output
//! ```text
//! INFO  device discovered device="0123456789ABCDEF" color=Red
//! WARN  log source failed to open device="0123456789ABCDEF" attempt=1 err="..."
//! DEBUG retry scheduled device="0123456789ABCDEF" delay_ms=1000 after_attempt=1
//! WARN  giving up on device device="0123456789ABCDEF" attempts=11 err="..."
//! INFO  device removed device="0123456789ABCDEF"
//! INFO  waiting on device to connect
//! ```

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Subscriber that renders every event through `tracing`.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let device = e.device.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("");

        match e.kind {
            EventKind::DeviceDiscovered => {
                info!(device, color = ?e.color, "device discovered");
            }
            EventKind::WorkerStarting => {
                debug!(device, attempt = ?e.attempt, "opening log source");
            }
            EventKind::SourceOpenFailed => {
                warn!(device, attempt = ?e.attempt, err = reason, "log source failed to open");
            }
            EventKind::BackoffScheduled => {
                debug!(
                    device,
                    delay_ms = ?e.delay_ms,
                    after_attempt = ?e.attempt,
                    "retry scheduled"
                );
            }
            EventKind::StreamStarted => {
                info!(device, attempt = ?e.attempt, "streaming");
            }
            EventKind::LineRejected => {
                debug!(device, detail = reason, "line did not match record layout");
            }
            EventKind::StreamEnded => {
                debug!(device, reason, "stream ended");
            }
            EventKind::WorkerExhausted => {
                warn!(device, attempts = ?e.attempt, err = reason, "giving up on device");
            }
            EventKind::DeviceRemoved => {
                info!(device, "device removed");
            }
            EventKind::ListingFailed => {
                warn!(err = reason, "device listing failed");
            }
            EventKind::ListingLineRejected => {
                debug!(detail = reason, "listing row skipped");
            }
            EventKind::NoDevices => {
                info!("waiting on device to connect");
            }
            EventKind::OutputFailed => {
                error!(device, err = reason, "output stream failed");
            }
            EventKind::ShutdownRequested => {
                info!(reason, "shutdown requested");
            }
            EventKind::SubscriberOverflow => {
                warn!(detail = reason, "subscriber dropped event");
            }
            EventKind::SubscriberPanicked => {
                error!(detail = reason, "subscriber panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
