//! # State shared by the discovery loop and every device worker.
//!
//! Built once by [`SupervisorBuilder`](crate::SupervisorBuilder) and handed
//! out as `Arc<Shared>`. Every field is independently synchronized; no code
//! path holds two of these locks at once.

use std::sync::{Arc, Mutex, PoisonError};

use tokio_util::sync::CancellationToken;

use crate::color::{Color, ColorAllocator};
use crate::config::Config;
use crate::core::registry::{DeviceEntry, Registry};
use crate::error::SinkError;
use crate::events::Bus;
use crate::output::{OutputSink, RecordFormatter};
use crate::sources::{DeviceSource, LogSource};

pub(crate) struct Shared {
    pub(crate) cfg: Config,
    pub(crate) bus: Bus,
    /// Runtime token; every worker holds a child of it.
    pub(crate) token: CancellationToken,

    pub(crate) devices: Registry<DeviceEntry>,
    pub(crate) tags: Registry<Color>,
    pub(crate) device_colors: ColorAllocator,
    pub(crate) tag_colors: ColorAllocator,

    pub(crate) device_source: Arc<dyn DeviceSource>,
    pub(crate) log_source: Arc<dyn LogSource>,
    pub(crate) sink: OutputSink,
    pub(crate) formatter: RecordFormatter,

    /// First fatal output error, if any.
    failure: Mutex<Option<SinkError>>,
}

impl Shared {
    pub(crate) fn new(
        cfg: Config,
        bus: Bus,
        device_source: Arc<dyn DeviceSource>,
        log_source: Arc<dyn LogSource>,
        sink: OutputSink,
    ) -> Arc<Self> {
        let tags = Registry::with_entries(cfg.tag_seeds.iter().cloned());
        let formatter = RecordFormatter::from_config(&cfg);
        Arc::new(Self {
            cfg,
            bus,
            token: CancellationToken::new(),
            devices: Registry::new(),
            tags,
            device_colors: ColorAllocator::default(),
            tag_colors: ColorAllocator::default(),
            device_source,
            log_source,
            sink,
            formatter,
            failure: Mutex::new(None),
        })
    }

    /// Records a fatal output error and cancels the runtime.
    ///
    /// Only the first error is kept.
    pub(crate) fn fail(&self, err: SinkError) {
        {
            let mut slot = self.failure.lock().unwrap_or_else(PoisonError::into_inner);
            if slot.is_none() {
                *slot = Some(err);
            }
        }
        self.token.cancel();
    }

    pub(crate) fn take_failure(&self) -> Option<SinkError> {
        self.failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}


#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::sources::memory::{ScriptedDevices, ScriptedLogs};

    #[tokio::test]
    async fn seeds_populate_tag_registry_without_using_the_allocator() {
        let (shared, _) = testing::scripted(
            Config::default(),
            Arc::new(ScriptedDevices::new()),
            Arc::new(ScriptedLogs::new()),
        );
        assert_eq!(shared.tags.lookup("ActivityManager").await, Some(Color::Cyan));
        assert_eq!(shared.tags.len().await, 4);
        assert_eq!(shared.tag_colors.next(), Color::Red);
    }

    #[tokio::test]
    async fn first_failure_wins_and_cancels() {
        let (shared, _) = testing::scripted(
            Config::default(),
            Arc::new(ScriptedDevices::new()),
            Arc::new(ScriptedLogs::new()),
        );
        shared.fail(SinkError::Io(io::ErrorKind::BrokenPipe.into()));
        shared.fail(SinkError::Io(io::ErrorKind::Other.into()));

        assert!(shared.token.is_cancelled());
        let err = shared.take_failure().unwrap();
        let SinkError::Io(io_err) = err;
        assert_eq!(io_err.kind(), io::ErrorKind::BrokenPipe);
        assert!(shared.take_failure().is_none());
    }
}
