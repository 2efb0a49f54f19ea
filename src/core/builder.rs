use std::sync::Arc;

use crate::{
    config::Config,
    events::Bus,
    output::OutputSink,
    sources::{AdbDeviceSource, AdbLogSource, DeviceSource, LogSource},
    subscribers::{Subscribe, SubscriberSet},
};

use super::{shared::Shared, supervisor::Supervisor};

/// Builder for constructing a [`Supervisor`].
///
/// Unset sources default to the `adb` executable named by [`Config::adb`];
/// an unset sink writes to standard output.
pub struct SupervisorBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
    device_source: Option<Arc<dyn DeviceSource>>,
    log_source: Option<Arc<dyn LogSource>>,
    sink: Option<OutputSink>,
}

impl SupervisorBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            device_source: None,
            log_source: None,
            sink: None,
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive runtime events (discovery, worker lifecycle,
    /// failures) through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Replaces the device listing source.
    pub fn with_device_source(mut self, source: Arc<dyn DeviceSource>) -> Self {
        self.device_source = Some(source);
        self
    }

    /// Replaces the per-device log source.
    pub fn with_log_source(mut self, source: Arc<dyn LogSource>) -> Self {
        self.log_source = Some(source);
        self
    }

    /// Replaces the output stream.
    pub fn with_sink(mut self, sink: OutputSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Builds the supervisor and spawns the subscriber workers.
    ///
    /// Must be called from within a tokio runtime.
    pub fn build(self) -> Arc<Supervisor> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let subs = SubscriberSet::new(self.subscribers, bus.clone());

        let device_source = self
            .device_source
            .unwrap_or_else(|| Arc::new(AdbDeviceSource::new(self.cfg.adb.clone())));
        let log_source = self
            .log_source
            .unwrap_or_else(|| Arc::new(AdbLogSource::new(self.cfg.adb.clone())));
        let sink = self.sink.unwrap_or_else(OutputSink::stdout);

        let shared = Shared::new(self.cfg, bus, device_source, log_source, sink);
        Arc::new(Supervisor::new_internal(shared, subs))
    }
}
