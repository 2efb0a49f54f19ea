//! # DeviceWorker: owns one device's log stream.
//!
//! ## State machine
//! ```text
//! Starting ──open ok──► Streaming ──eof / read error / shutdown / output error──► Draining ──► Terminated
//!    │                                                                                         ▲
//!    └── retries exhausted / shutdown during retry wait ───────────────────────────────────────┘
//! ```
//!
//! ## Event flow
//! ```text
//! Starting:   WorkerStarting → SourceOpenFailed → BackoffScheduled → [sleep] → WorkerStarting ...
//!             └─► budget spent: WorkerExhausted
//! Streaming:  StreamStarted → (LineRejected)* → StreamEnded | OutputFailed
//! Terminated: DeviceRemoved
//! ```
//!
//! ## Rules
//! - Attempts run **sequentially**; the attempt counter never resets.
//! - Cancellation is observed at **safe points**: before each attempt, during
//!   the retry sleep and at the top of every streaming iteration. A read in
//!   flight is never interrupted.
//! - On `Terminated` the worker removes its own registry entry, so the device
//!   can be rediscovered.

use std::sync::Arc;

use tokio::{select, task::JoinHandle, time};
use tokio_util::sync::CancellationToken;

use crate::{
    color::Color,
    core::{runner, shared::Shared},
    events::{Event, EventKind},
    sources::LineStream,
};

/// Lifecycle of a device worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Starting,
    Streaming,
    Draining,
    Terminated,
}

impl WorkerState {
    /// Returns true if `next` is a legal successor of `self`.
    pub fn can_transition_to(self, next: WorkerState) -> bool {
        use WorkerState::*;
        matches!(
            (self, next),
            (Starting, Streaming)
                | (Starting, Terminated)
                | (Streaming, Draining)
                | (Draining, Terminated)
        )
    }
}

/// Why a worker reached [`WorkerState::Terminated`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    /// The log source never opened within the retry budget.
    Exhausted,
    /// Shutdown (or a per-device cancel) was observed.
    Cancelled,
    /// The log stream ended or failed.
    StreamEnded,
    /// The output sink failed; the runtime is going down.
    OutputFailed,
}

/// Streams one device until it goes away.
pub(crate) struct DeviceWorker {
    shared: Arc<Shared>,
    serial: Arc<str>,
    color: Color,
    token: CancellationToken,
    state: WorkerState,
}

impl DeviceWorker {
    pub(crate) fn new(
        shared: Arc<Shared>,
        serial: impl Into<Arc<str>>,
        color: Color,
        token: CancellationToken,
    ) -> Self {
        Self {
            shared,
            serial: serial.into(),
            color,
            token,
            state: WorkerState::Starting,
        }
    }

    /// Spawns the worker as a detached task.
    pub(crate) fn spawn(self) -> JoinHandle<WorkerExit> {
        tokio::spawn(self.run())
    }

    /// Runs the worker to [`WorkerState::Terminated`].
    pub(crate) async fn run(mut self) -> WorkerExit {
        let exit = match self.open().await {
            Ok(mut stream) => {
                self.transition(WorkerState::Streaming);
                let exit = runner::stream(
                    &self.shared,
                    &self.serial,
                    self.color,
                    &mut stream,
                    &self.token,
                )
                .await;
                self.transition(WorkerState::Draining);
                stream.close().await;
                exit
            }
            Err(exit) => exit,
        };

        self.transition(WorkerState::Terminated);
        self.shared.devices.remove(&self.serial).await;
        self.shared.bus.publish(
            Event::new(EventKind::DeviceRemoved)
                .with_device(Arc::clone(&self.serial))
                .with_color(self.color),
        );
        exit
    }

    /// Opens the log source, retrying per the configured [`RetryPolicy`](crate::RetryPolicy).
    async fn open(&self) -> Result<Box<dyn LineStream>, WorkerExit> {
        let retry = self.shared.cfg.retry;
        let mut attempt: u32 = 0;

        loop {
            if self.token.is_cancelled() {
                return Err(WorkerExit::Cancelled);
            }

            attempt += 1;
            self.publish(Event::new(EventKind::WorkerStarting).with_attempt(attempt));

            let err = match self.shared.log_source.open(&self.serial).await {
                Ok(stream) => {
                    self.publish(Event::new(EventKind::StreamStarted).with_attempt(attempt));
                    return Ok(stream);
                }
                Err(e) => e,
            };

            self.publish(
                Event::new(EventKind::SourceOpenFailed)
                    .with_attempt(attempt)
                    .with_reason(err.to_string()),
            );

            let Some(delay) = retry.delay_after(attempt) else {
                self.publish(
                    Event::new(EventKind::WorkerExhausted)
                        .with_attempt(attempt)
                        .with_reason(err.as_label()),
                );
                return Err(WorkerExit::Exhausted);
            };

            self.publish(
                Event::new(EventKind::BackoffScheduled)
                    .with_attempt(attempt)
                    .with_delay(delay)
                    .with_reason(err.to_string()),
            );

            select! {
                _ = time::sleep(delay) => {}
                _ = self.token.cancelled() => return Err(WorkerExit::Cancelled),
            }
        }
    }

    fn publish(&self, ev: Event) {
        self.shared
            .bus
            .publish(ev.with_device(Arc::clone(&self.serial)));
    }

    fn transition(&mut self, next: WorkerState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal worker transition {:?} -> {:?}",
            self.state,
            next
        );
        tracing::trace!(device = %self.serial, from = ?self.state, to = ?next, "worker state");
        self.state = next;
    }
}
