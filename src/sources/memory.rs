//! # Scripted in-memory sources.
//!
//! Stand-ins for `adb` used to drive the runtime deterministically:
//! - [`ScriptedDevices`] replays a queue of listings, then keeps returning the last one;
//! - [`ScriptedLogs`] hands out one queued plan per `open` call: a failure, a
//!   finite set of lines, or a live channel fed by the caller.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::SourceError;
use crate::sources::{DeviceSource, LineStream, LogSource};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Device source replaying scripted listings.
#[derive(Default)]
pub struct ScriptedDevices {
    queue: Mutex<VecDeque<Result<Vec<String>, String>>>,
    last: Mutex<Vec<String>>,
}

impl ScriptedDevices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues one listing, given as raw lines.
    pub fn push<I, S>(&self, lines: I) -> &Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines = lines.into_iter().map(Into::into).collect();
        lock(&self.queue).push_back(Ok(lines));
        self
    }

    /// Queues one failed listing.
    pub fn push_failure(&self, reason: impl Into<String>) -> &Self {
        lock(&self.queue).push_back(Err(reason.into()));
        self
    }
}

#[async_trait]
impl DeviceSource for ScriptedDevices {
    async fn list(&self) -> Result<Vec<String>, SourceError> {
        let next = lock(&self.queue).pop_front();
        match next {
            Some(Ok(lines)) => {
                *lock(&self.last) = lines.clone();
                Ok(lines)
            }
            Some(Err(reason)) => Err(SourceError::Unavailable { reason }),
            None => Ok(lock(&self.last).clone()),
        }
    }
}

enum Plan {
    Fail(String),
    Stream(mpsc::UnboundedReceiver<String>),
}

/// Log source handing out scripted streams per serial.
#[derive(Default)]
pub struct ScriptedLogs {
    plans: Mutex<HashMap<String, VecDeque<Plan>>>,
    opens: Mutex<HashMap<String, u32>>,
}

impl ScriptedLogs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next `times` opens of `serial` fail.
    pub fn fail(&self, serial: &str, times: usize, reason: &str) -> &Self {
        let mut plans = lock(&self.plans);
        let queue = plans.entry(serial.to_string()).or_default();
        queue.extend((0..times).map(|_| Plan::Fail(reason.to_string())));
        self
    }

    /// Next open of `serial` yields `lines`, then end-of-stream.
    pub fn lines<I, S>(&self, serial: &str, lines: I) -> &Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        for line in lines {
            let _ = tx.send(line.into());
        }
        self.enqueue(serial, Plan::Stream(rx));
        self
    }

    /// Next open of `serial` yields whatever is sent on the returned channel.
    /// The stream ends when the sender is dropped.
    pub fn live(&self, serial: &str) -> mpsc::UnboundedSender<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.enqueue(serial, Plan::Stream(rx));
        tx
    }

    /// Number of `open` calls made for `serial` so far.
    pub fn opens(&self, serial: &str) -> u32 {
        lock(&self.opens).get(serial).copied().unwrap_or(0)
    }

    fn enqueue(&self, serial: &str, plan: Plan) {
        lock(&self.plans)
            .entry(serial.to_string())
            .or_default()
            .push_back(plan);
    }
}

#[async_trait]
impl LogSource for ScriptedLogs {
    async fn open(&self, serial: &str) -> Result<Box<dyn LineStream>, SourceError> {
        *lock(&self.opens).entry(serial.to_string()).or_default() += 1;

        let plan = lock(&self.plans)
            .get_mut(serial)
            .and_then(VecDeque::pop_front);
        match plan {
            Some(Plan::Stream(rx)) => Ok(Box::new(ChannelLines { rx })),
            Some(Plan::Fail(reason)) => Err(SourceError::Unavailable { reason }),
            None => Err(SourceError::Unavailable {
                reason: format!("no script for {serial}"),
            }),
        }
    }
}

struct ChannelLines {
    rx: mpsc::UnboundedReceiver<String>,
}

#[async_trait]
impl LineStream for ChannelLines {
    async fn next_line(&mut self) -> Result<Option<String>, SourceError> {
        Ok(self.rx.recv().await)
    }

    async fn close(&mut self) {
        self.rx.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn devices_repeat_last_listing() {
        let src = ScriptedDevices::new();
        src.push(["List of devices attached", "abc123\tdevice"])
            .push_failure("adb gone");

        assert_eq!(src.list().await.unwrap().len(), 2);
        assert!(src.list().await.is_err());
        assert_eq!(
            src.list().await.unwrap(),
            vec!["List of devices attached", "abc123\tdevice"]
        );
    }

    #[tokio::test]
    async fn logs_follow_plans_in_order() {
        let logs = ScriptedLogs::new();
        logs.fail("abc", 1, "offline").lines("abc", ["one", "two"]);

        assert!(logs.open("abc").await.is_err());
        let mut stream = logs.open("abc").await.unwrap();
        assert_eq!(stream.next_line().await.unwrap().as_deref(), Some("one"));
        assert_eq!(stream.next_line().await.unwrap().as_deref(), Some("two"));
        assert_eq!(stream.next_line().await.unwrap(), None);

        assert!(logs.open("abc").await.is_err());
        assert_eq!(logs.opens("abc"), 3);
        assert_eq!(logs.opens("other"), 0);
    }

    #[tokio::test]
    async fn live_stream_ends_when_sender_drops() {
        let logs = ScriptedLogs::new();
        let tx = logs.live("abc");
        let mut stream = logs.open("abc").await.unwrap();

        tx.send("hello".into()).unwrap();
        assert_eq!(stream.next_line().await.unwrap().as_deref(), Some("hello"));
        drop(tx);
        assert_eq!(stream.next_line().await.unwrap(), None);
    }
}
