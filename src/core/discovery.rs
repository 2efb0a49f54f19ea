//! # DiscoveryLoop: keeps one worker per attached device.
//!
//! ```text
//! loop {
//!   ├─► token cancelled? → break
//!   ├─► DeviceSource::list()
//!   │     └─ error → ListingFailed (retried next cycle)
//!   ├─► for each line: ListingEntry::parse
//!   │     ├─ no match      → ListingLineRejected
//!   │     ├─ known serial  → skip
//!   │     └─ new serial    → next device color
//!   │                        insert_if_absent (lost race → skip)
//!   │                        DeviceDiscovered, spawn DeviceWorker
//!   └─► sleep(poll_interval) | token cancelled → break
//! }
//! ```
//!
//! The loop never removes or overwrites registry entries; a worker clears
//! its own entry when it terminates.

use std::sync::Arc;

use tokio::{select, time};

use crate::{
    core::{registry::DeviceEntry, shared::Shared, worker::DeviceWorker},
    events::{Event, EventKind},
    parse::ListingEntry,
};

pub(crate) struct DiscoveryLoop {
    shared: Arc<Shared>,
}

impl DiscoveryLoop {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Polls until the runtime token is cancelled.
    pub(crate) async fn run(self) {
        let token = self.shared.token.clone();
        loop {
            if token.is_cancelled() {
                break;
            }
            self.poll_once().await;

            select! {
                _ = time::sleep(self.shared.cfg.poll_interval) => {}
                _ = token.cancelled() => break,
            }
        }
    }

    /// Runs one discovery cycle. Returns how many workers were spawned.
    pub(crate) async fn poll_once(&self) -> usize {
        let lines = match self.shared.device_source.list().await {
            Ok(lines) => lines,
            Err(e) => {
                self.shared
                    .bus
                    .publish(Event::new(EventKind::ListingFailed).with_reason(e.to_string()));
                return 0;
            }
        };

        let mut spawned = 0;
        for line in lines {
            let entry = match ListingEntry::parse(&line) {
                Ok(entry) => entry,
                Err(e) => {
                    self.shared.bus.publish(
                        Event::new(EventKind::ListingLineRejected)
                            .with_reason(format!("{e}: {line}")),
                    );
                    continue;
                }
            };
            if self.attach(entry.serial).await {
                spawned += 1;
            }
        }
        spawned
    }

    /// Registers `serial` and spawns its worker unless it is already known.
    async fn attach(&self, serial: String) -> bool {
        if self.shared.devices.contains(&serial).await {
            return false;
        }

        let color = self.shared.device_colors.next();
        let cancel = self.shared.token.child_token();
        let entry = DeviceEntry {
            color,
            cancel: cancel.clone(),
        };
        if !self.shared.devices.insert_if_absent(serial.clone(), entry).await {
            return false;
        }

        self.shared.bus.publish(
            Event::new(EventKind::DeviceDiscovered)
                .with_device(serial.as_str())
                .with_color(color),
        );
        DeviceWorker::new(Arc::clone(&self.shared), serial, color, cancel).spawn();
        true
    }
}
