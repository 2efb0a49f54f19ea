//! # Global runtime configuration.
//!
//! [`Config`] centralizes every knob of the runtime: which `adb` to run, how
//! often to poll for devices, how hard to retry a device that will not
//! stream, and how records are laid out.
//!
//! ## Sentinel values
//! - `bus_capacity = 0` → clamped to 1 by the bus
//! - `device_width = 0` / `tag_width = 0` → field printed unpadded and untruncated
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use logvisor::Config;
//!
//! let mut cfg = Config::default();
//! cfg.poll_interval = Duration::from_secs(1);
//! cfg.retry.max_retries = 3;
//! cfg.color = false;
//!
//! assert_eq!(cfg.retry.max_attempts(), 4);
//! ```

use std::path::PathBuf;
use std::time::Duration;

use crate::color::Color;
use crate::policies::RetryPolicy;

/// Global configuration for the runtime.
///
/// ## Field semantics
/// - `adb`: program used for both the device listing and `logcat`
/// - `poll_interval`: pause between two device listings
/// - `startup_wait`: how long `run` waits before reporting that no device is attached
/// - `retry`: open-attempt budget per device worker
/// - `bus_capacity`: event bus ring buffer size (min 1)
/// - `color`: wrap fields in ANSI color escapes
/// - `device_width`, `tag_width`: fixed widths of the device and tag columns
/// - `tag_seeds`: tags with a fixed color; they never consume a palette slot
#[derive(Clone, Debug)]
pub struct Config {
    /// Path or name of the `adb` executable.
    pub adb: PathBuf,

    /// Delay between two device listings.
    pub poll_interval: Duration,

    /// Delay before the supervisor checks whether any device showed up.
    pub startup_wait: Duration,

    /// Retry budget for opening a device's log source.
    pub retry: RetryPolicy,

    /// Capacity of the event bus broadcast channel ring buffer.
    pub bus_capacity: usize,

    /// Emit ANSI colors.
    pub color: bool,

    /// Width of the device column (`0` = natural width).
    pub device_width: usize,

    /// Width of the tag column (`0` = natural width).
    pub tag_width: usize,

    /// Tags colored up front, in order.
    pub tag_seeds: Vec<(String, Color)>,
}

impl Config {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Default tag colors for the noisiest framework tags.
    pub fn default_tag_seeds() -> Vec<(String, Color)> {
        [
            ("dalvikvm", Color::Blue),
            ("Process", Color::Blue),
            ("ActivityManager", Color::Cyan),
            ("ActivityThread", Color::Cyan),
        ]
        .into_iter()
        .map(|(tag, color)| (tag.to_string(), color))
        .collect()
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `adb = "adb"` (resolved through `PATH`)
    /// - `poll_interval = 3s`
    /// - `startup_wait = 1s`
    /// - `retry = 10 retries, 1s apart`
    /// - `bus_capacity = 1024`
    /// - `color = true`
    /// - `device_width = 16`, `tag_width = 20`
    /// - `tag_seeds = Config::default_tag_seeds()`
    fn default() -> Self {
        Self {
            adb: PathBuf::from("adb"),
            poll_interval: Duration::from_secs(3),
            startup_wait: Duration::from_secs(1),
            retry: RetryPolicy::default(),
            bus_capacity: 1024,
            color: true,
            device_width: 16,
            tag_width: 20,
            tag_seeds: Self::default_tag_seeds(),
        }
    }
}
