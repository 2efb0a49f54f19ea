//! # Supervisor: runs discovery, fans out events, handles shutdown.
//!
//! The [`Supervisor`] owns the [`Shared`] runtime state and a
//! [`SubscriberSet`]. [`Supervisor::run`] drives the whole program.
//!
//! ## High-level architecture
//! ```text
//! run():
//!   subscriber_listener(): Bus.subscribe() ─► SubscriberSet::emit(&Event)
//!   spawn DiscoveryLoop ─► spawns one DeviceWorker per new serial
//!
//!   select:
//!     wait_for_shutdown_signal() ─► publish(ShutdownRequested)
//!                                   token.cancel() → propagates to worker tokens
//!                                   wait for DiscoveryLoop
//!     startup report, then DiscoveryLoop ends (token cancelled by shutdown()
//!                                              or by an output failure)
//!
//!   stop the listener: drain pending bus events, then SubscriberSet::shutdown()
//!   return Err(Output) if a worker recorded an output failure, else Ok
//!
//! Event flow:
//!   DiscoveryLoop / DeviceWorker ── publish ──► Bus ──► listener ──► SubscriberSet
//!                                                                     ├─► [queue S1] ─► S1.on_event
//!                                                                     └─► [queue SN] ─► SN.on_event
//! ```
//!
//! Workers are detached: shutdown does not wait for them. A worker blocked in
//! a read observes the cancelled token when the read returns. Events a worker
//! publishes after `run` returned are not delivered.
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use logvisor::{Config, LogWriter, Subscribe, Supervisor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
//!     let sup = Supervisor::builder(Config::default())
//!         .with_subscribers(subs)
//!         .build();
//!     sup.run().await?;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use tokio::{
    select,
    sync::{
        Mutex,
        broadcast::error::{RecvError, TryRecvError},
    },
    task::JoinHandle,
    time,
};
use tokio_util::sync::CancellationToken;

use crate::{
    config::Config,
    core::{builder::SupervisorBuilder, discovery::DiscoveryLoop, shared::Shared, shutdown},
    error::RuntimeError,
    events::{Event, EventKind},
    subscribers::SubscriberSet,
};

/// Coordinates discovery, device workers, event delivery and shutdown.
pub struct Supervisor {
    shared: Arc<Shared>,
    /// Taken by the first `run`, which owns it until exit.
    subs: Mutex<Option<SubscriberSet>>,
}

impl Supervisor {
    /// Starts building a supervisor.
    pub fn builder(cfg: Config) -> SupervisorBuilder {
        SupervisorBuilder::new(cfg)
    }

    pub(crate) fn new_internal(shared: Arc<Shared>, subs: SubscriberSet) -> Self {
        Self {
            shared,
            subs: Mutex::new(Some(subs)),
        }
    }

    /// Runs until a termination signal, [`Supervisor::shutdown`], or an
    /// output failure.
    ///
    /// Returns [`RuntimeError::Output`] if the output stream failed and
    /// [`RuntimeError::Signal`] if signal handlers could not be installed.
    ///
    /// Every event published before `run` returns has been handed to the
    /// subscribers by then.
    pub async fn run(&self) -> Result<(), RuntimeError> {
        let listener = self.subscriber_listener().await;
        let res = self.supervise().await;

        if let Some((stop, handle)) = listener {
            stop.cancel();
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "subscriber listener aborted");
            }
        }
        res
    }

    async fn supervise(&self) -> Result<(), RuntimeError> {
        let mut discovery = tokio::spawn(DiscoveryLoop::new(Arc::clone(&self.shared)).run());

        let signal = select! {
            res = shutdown::wait_for_shutdown_signal() => Some(res),
            _ = self.watch(&mut discovery) => None,
        };

        if let Some(res) = signal {
            match res {
                Ok(name) => self.request_shutdown(name),
                Err(e) => {
                    self.shared.token.cancel();
                    let _ = discovery.await;
                    return Err(RuntimeError::Signal(e));
                }
            }
            let _ = discovery.await;
        }

        match self.shared.take_failure() {
            Some(err) => Err(RuntimeError::Output(err)),
            None => Ok(()),
        }
    }

    /// Requests a graceful shutdown, as if a termination signal had arrived.
    pub fn shutdown(&self) {
        self.request_shutdown("requested");
    }

    /// Stops streaming one device. Returns `false` if it is not attached.
    ///
    /// The worker stops once its pending read returns. A device that is still
    /// listed is attached again on the next poll, with the next device color.
    pub async fn cancel_device(&self, serial: &str) -> bool {
        match self.shared.devices.lookup(serial).await {
            Some(entry) => {
                entry.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Sorted serials of the devices currently being streamed.
    pub async fn devices(&self) -> Vec<String> {
        self.shared.devices.keys().await
    }

    fn request_shutdown(&self, reason: &'static str) {
        if self.shared.token.is_cancelled() {
            return;
        }
        self.shared
            .bus
            .publish(Event::new(EventKind::ShutdownRequested).with_reason(reason));
        self.shared.token.cancel();
    }

    /// Reports an empty device set after the startup wait, then waits for
    /// the discovery loop to end.
    async fn watch(&self, discovery: &mut JoinHandle<()>) {
        let token = &self.shared.token;
        select! {
            _ = time::sleep(self.shared.cfg.startup_wait) => {
                if self.shared.devices.is_empty().await {
                    self.shared.bus.publish(Event::new(EventKind::NoDevices));
                }
            }
            _ = token.cancelled() => {}
        }
        if let Err(e) = discovery.await {
            tracing::error!(error = %e, "discovery loop aborted");
        }
    }

    /// Subscribes to the bus and forwards events to the subscriber set.
    ///
    /// Once `stop` is cancelled the listener forwards what is already queued
    /// on the bus, then waits for every subscriber to drain its queue.
    async fn subscriber_listener(&self) -> Option<(CancellationToken, JoinHandle<()>)> {
        let set = self.subs.lock().await.take()?;
        let mut rx = self.shared.bus.subscribe();
        let stop = CancellationToken::new();
        let stopped = stop.clone();

        let handle = tokio::spawn(async move {
            loop {
                select! {
                    biased;
                    res = rx.recv() => match res {
                        Ok(ev) => set.emit(&ev),
                        Err(RecvError::Lagged(n)) => {
                            tracing::warn!(skipped = n, "subscriber listener lagged");
                        }
                        Err(RecvError::Closed) => break,
                    },
                    _ = stopped.cancelled() => break,
                }
            }
            loop {
                match rx.try_recv() {
                    Ok(ev) => set.emit(&ev),
                    Err(TryRecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "subscriber listener lagged");
                    }
                    Err(TryRecvError::Empty | TryRecvError::Closed) => break,
                }
            }
            set.shutdown().await;
        });
        Some((stop, handle))
    }
}
