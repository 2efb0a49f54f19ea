//! Runtime core: discovery, device workers and lifecycle.
//!
//! The public entry point is [`Supervisor`], built with [`SupervisorBuilder`].
//!
//! Internal modules:
//! - [`discovery`]: polls the device source and spawns one worker per new device;
//! - [`worker`]: opens one device's log source with retries, then streams it;
//! - [`runner`]: the streaming loop (parse, color, format, write);
//! - [`registry`]: keyed registries for devices and tags;
//! - [`shared`]: state shared by the loop and the workers;
//! - [`shutdown`]: OS termination signals;
//! - [`supervisor`]: ties it all together.

mod builder;
mod discovery;
mod registry;
mod runner;
mod shared;
mod shutdown;
mod supervisor;
mod worker;

pub use builder::SupervisorBuilder;
pub use registry::{DeviceEntry, Registry};
pub use supervisor::Supervisor;
