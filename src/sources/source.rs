//! # Source traits.
//!
//! The runtime never spawns processes itself; it talks to two collaborators:
//! - [`DeviceSource`] produces the current device listing, one row per line;
//! - [`LogSource`] opens an unbounded [`LineStream`] for one serial.
//!
//! A [`LineStream::next_line`] call is the only place a device worker blocks
//! while streaming. It is never raced against shutdown: cancellation is
//! observed once the read returns.

use async_trait::async_trait;

use crate::error::SourceError;

/// Produces a textual listing of connected devices.
#[async_trait]
pub trait DeviceSource: Send + Sync + 'static {
    /// Returns the raw listing lines of one poll.
    async fn list(&self) -> Result<Vec<String>, SourceError>;
}

/// Opens the log stream of one device.
#[async_trait]
pub trait LogSource: Send + Sync + 'static {
    /// Starts streaming `serial`'s log.
    async fn open(&self, serial: &str) -> Result<Box<dyn LineStream>, SourceError>;
}

/// Line-oriented stream owned by exactly one device worker.
#[async_trait]
pub trait LineStream: Send {
    /// Next line without its line terminator; `Ok(None)` at end-of-stream.
    async fn next_line(&mut self) -> Result<Option<String>, SourceError>;

    /// Releases the underlying resources. Called once, after the last read.
    async fn close(&mut self) {}
}
