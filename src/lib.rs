//! # logvisor
//!
//! **Logvisor** streams `logcat` from every attached Android device at once
//! and prints it as one colorized stream.
//!
//! Devices are discovered by polling `adb devices`; each new device gets its
//! own worker, which opens `adb -s <serial> logcat -v time`, parses every
//! line and writes it, colored per device and per tag, to a shared output.
//! Devices may come and go during a run.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!                 ┌────────────────────────────┐
//!                 │ DeviceSource (adb devices) │
//!                 └─────────────┬──────────────┘
//!                               ▼ every poll_interval
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  DiscoveryLoop                                                    │
//! │  - ListingEntry::parse per row                                    │
//! │  - device Registry (insert_if_absent)                             │
//! │  - device ColorAllocator                                          │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │ DeviceWorker │   │ DeviceWorker │   │ DeviceWorker │
//!     │ (retry open, │   │              │   │              │
//!     │  stream)     │   │              │   │              │
//!     └┬─────────────┘   └┬─────────────┘   └┬─────────────┘
//!      │ LogRecord::parse │                  │
//!      │ tag Registry +   │                  │
//!      │ tag allocator    │                  │
//!      ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │            OutputSink (one record per locked write)               │
//! └───────────────────────────────────────────────────────────────────┘
//!
//! Loop and workers publish Events ──► Bus ──► SubscriberSet ──► LogWriter, ...
//! ```
//!
//! ### Device lifecycle
//! ```text
//! listed ──► DeviceDiscovered ──► Starting ──► Streaming ──► Draining ──► Terminated
//!                                    │                                     │
//!                                    └── retries exhausted ────────────────┤
//!                                                                          ▼
//!                                             registry entry removed, DeviceRemoved
//!                                             (listed again ──► new worker, next color)
//! ```
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                          |
//! |-------------------|----------------------------------------------------------|---------------------------------------------|
//! | **Supervision**   | Discovery, per-device workers, shutdown.                 | [`Supervisor`], [`SupervisorBuilder`]       |
//! | **Sources**       | Where listings and log lines come from.                  | [`DeviceSource`], [`LogSource`], [`LineStream`] |
//! | **Parsing**       | Device listing rows and `logcat -v time` lines.          | [`ListingEntry`], [`LogRecord`]             |
//! | **Coloring**      | Round-robin palette assignment, fixed tag seeds.         | [`ColorAllocator`], [`Palette`], [`Color`]  |
//! | **Output**        | Record layout and serialized writes.                     | [`RecordFormatter`], [`OutputSink`]         |
//! | **Subscriber API**| Hook into runtime events.                                | [`Subscribe`], [`LogWriter`]                |
//! | **Policies**      | Retry budget and delays for opening a log source.        | [`RetryPolicy`], [`BackoffPolicy`]          |
//! | **Configuration** | Centralize runtime settings.                             | [`Config`]                                  |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use logvisor::{Config, Subscribe, Supervisor};
//! use logvisor::memory::{ScriptedDevices, ScriptedLogs};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let devices = Arc::new(ScriptedDevices::new());
//!     devices.push(["List of devices attached", "0123456789ABCDEF\tdevice"]);
//!
//!     let logs = Arc::new(ScriptedLogs::new());
//!     logs.lines("0123456789ABCDEF", ["08-14 10:22:01.123 I/ActivityManager(1234): Starting activity"]);
//!
//!     let subs: Vec<Arc<dyn Subscribe>> = Vec::new();
//!     let sup = Supervisor::builder(Config::default())
//!         .with_subscribers(subs)
//!         .with_device_source(devices)
//!         .with_log_source(logs)
//!         .build();
//!
//!     let runner = Arc::clone(&sup);
//!     let handle = tokio::spawn(async move { runner.run().await });
//!     tokio::time::sleep(std::time::Duration::from_millis(50)).await;
//!     sup.shutdown();
//!     handle.await??;
//!     Ok(())
//! }
//! ```

mod color;
mod config;
mod core;
mod error;
mod events;
mod output;
mod parse;
mod policies;
mod sources;
mod subscribers;

#[cfg(test)]
mod test_utils;

// ---- Public re-exports ----

pub use color::{Color, ColorAllocator, Palette};
pub use config::Config;
pub use core::{DeviceEntry, Registry, Supervisor, SupervisorBuilder};
pub use error::{ParseError, RuntimeError, SinkError, SourceError};
pub use events::{Bus, Event, EventKind};
pub use output::{OutputSink, RecordFormatter};
pub use parse::{Level, ListingEntry, LogRecord};
pub use policies::{BackoffPolicy, RetryPolicy};
pub use sources::{AdbDeviceSource, AdbLogSource, DeviceSource, LineStream, LogSource, memory};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
