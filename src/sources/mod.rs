//! Device listing and log stream sources.
//!
//! ## Contents
//! - [`DeviceSource`], [`LogSource`], [`LineStream`]: the seams the runtime talks to
//! - [`AdbDeviceSource`], [`AdbLogSource`]: the `adb` executable
//! - [`memory`]: scripted sources for tests and embedding

mod adb;
pub mod memory;
mod source;

pub use adb::{AdbDeviceSource, AdbLogSource};
pub use source::{DeviceSource, LineStream, LogSource};
