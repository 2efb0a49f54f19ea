//! # Streaming loop of one device worker.
//!
//! Reads lines until the stream ends, shutdown is observed, or the output
//! sink fails.
//!
//! ## Per line
//! ```text
//! next_line() ─► LogRecord::parse ─┬─ no match ─► LineRejected, continue
//!                                  └─ match ─► tag color (registry / allocator)
//!                                              └─► format ─► OutputSink::write
//!                                                              └─ error ─► OutputFailed, Shared::fail
//! ```
//!
//! ## Rules
//! - Always publishes **exactly one** terminal event: `StreamEnded` or `OutputFailed`.
//! - A rejected line never ends the stream.
//! - Lines of one device are written in source order.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::{
    color::Color,
    core::{shared::Shared, worker::WorkerExit},
    events::{Event, EventKind},
    parse::LogRecord,
    sources::LineStream,
};

/// Pumps `stream` into the output sink.
pub(crate) async fn stream(
    shared: &Shared,
    serial: &Arc<str>,
    color: Color,
    stream: &mut Box<dyn LineStream>,
    token: &CancellationToken,
) -> WorkerExit {
    loop {
        if token.is_cancelled() {
            publish_ended(shared, serial, "shutdown");
            return WorkerExit::Cancelled;
        }

        let line = match stream.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                publish_ended(shared, serial, "end of stream");
                return WorkerExit::StreamEnded;
            }
            Err(e) => {
                publish_ended(shared, serial, e.to_string());
                return WorkerExit::StreamEnded;
            }
        };

        let record = match LogRecord::parse(&line) {
            Ok(record) => record,
            Err(e) => {
                shared.bus.publish(
                    Event::new(EventKind::LineRejected)
                        .with_device(Arc::clone(serial))
                        .with_reason(format!("{e}: {line}")),
                );
                continue;
            }
        };

        let tag_color = shared
            .tags
            .get_or_insert_with(&record.tag, || shared.tag_colors.next())
            .await;
        let text = shared.formatter.format(serial, color, &record, tag_color);

        if let Err(e) = shared.sink.write(&text).await {
            shared.bus.publish(
                Event::new(EventKind::OutputFailed)
                    .with_device(Arc::clone(serial))
                    .with_reason(e.to_string()),
            );
            shared.fail(e);
            return WorkerExit::OutputFailed;
        }
    }
}

fn publish_ended(shared: &Shared, serial: &Arc<str>, reason: impl Into<Arc<str>>) {
    shared.bus.publish(
        Event::new(EventKind::StreamEnded)
            .with_device(Arc::clone(serial))
            .with_reason(reason),
    );
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::time::Duration;

    use super::*;
    use crate::config::Config;
    use crate::core::shared::testing;
    use crate::error::SinkError;
    use crate::output::OutputSink;
    use crate::sources::LogSource;
    use crate::sources::memory::{ScriptedDevices, ScriptedLogs};
    use crate::test_utils::FailingWriter;

    async fn open(logs: &ScriptedLogs, serial: &str) -> Box<dyn LineStream> {
        logs.open(serial).await.unwrap()
    }

    #[tokio::test]
    async fn seeded_tag_keeps_its_color() {
        let logs = Arc::new(ScriptedLogs::new());
        logs.lines(
            "abc",
            ["08-14 10:22:01.123 I/ActivityManager(1234): Starting activity"],
        );
        let (shared, out) = testing::scripted(
            Config::default(),
            Arc::new(ScriptedDevices::new()),
            logs.clone(),
        );
        let serial: Arc<str> = Arc::from("abc");

        let mut s = open(&logs, "abc").await;
        let exit = stream(&shared, &serial, Color::Red, &mut s, &shared.token).await;

        assert_eq!(exit, WorkerExit::StreamEnded);
        assert_eq!(
            out.lines(),
            vec!["abc              08-14 10:22:01.123 1234 ActivityManager       I  Starting activity"]
        );
        assert_eq!(shared.tags.lookup("ActivityManager").await, Some(Color::Cyan));
        // The seeded tag did not consume a palette slot.
        assert_eq!(shared.tag_colors.next(), Color::Red);
    }

    #[tokio::test]
    async fn malformed_line_is_skipped_and_stream_continues() {
        let logs = Arc::new(ScriptedLogs::new());
        logs.lines(
            "abc",
            [
                "08-14 10:22:01.123 I/Tag(1234: no closing paren",
                "--------- beginning of main",
                "08-14 10:22:01.124 W/Tag(1234): fine",
            ],
        );
        let (shared, out) = testing::scripted(
            Config::default(),
            Arc::new(ScriptedDevices::new()),
            logs.clone(),
        );
        let mut rx = shared.bus.subscribe();
        let serial: Arc<str> = Arc::from("abc");

        let mut s = open(&logs, "abc").await;
        let exit = stream(&shared, &serial, Color::Red, &mut s, &shared.token).await;

        assert_eq!(exit, WorkerExit::StreamEnded);
        assert_eq!(out.lines().len(), 1);
        assert!(out.contents().contains("fine"));

        let mut rejected = 0;
        while let Ok(ev) = rx.try_recv() {
            if ev.kind == EventKind::LineRejected {
                rejected += 1;
            }
        }
        assert_eq!(rejected, 2);
    }

    #[tokio::test]
    async fn new_tags_get_consecutive_palette_colors() {
        let logs = Arc::new(ScriptedLogs::new());
        logs.lines(
            "abc",
            [
                "08-14 10:22:01.123 I/First(1): a",
                "08-14 10:22:01.124 I/Second(1): b",
                "08-14 10:22:01.125 I/First(1): c",
            ],
        );
        let (shared, _) = testing::scripted(
            Config::default(),
            Arc::new(ScriptedDevices::new()),
            logs.clone(),
        );
        let serial: Arc<str> = Arc::from("abc");

        let mut s = open(&logs, "abc").await;
        stream(&shared, &serial, Color::Red, &mut s, &shared.token).await;

        assert_eq!(shared.tags.lookup("First").await, Some(Color::Red));
        assert_eq!(shared.tags.lookup("Second").await, Some(Color::Green));
    }

    #[tokio::test]
    async fn cancelled_token_stops_before_reading() {
        let logs = Arc::new(ScriptedLogs::new());
        logs.lines("abc", ["08-14 10:22:01.123 I/Tag(1): never written"]);
        let (shared, out) = testing::scripted(
            Config::default(),
            Arc::new(ScriptedDevices::new()),
            logs.clone(),
        );
        let serial: Arc<str> = Arc::from("abc");
        shared.token.cancel();

        let mut s = open(&logs, "abc").await;
        let exit = stream(&shared, &serial, Color::Red, &mut s, &shared.token).await;

        assert_eq!(exit, WorkerExit::Cancelled);
        assert!(out.contents().is_empty());
    }

    #[tokio::test]
    async fn output_failure_is_escalated() {
        let logs = Arc::new(ScriptedLogs::new());
        let tx = logs.live("abc");
        tx.send("08-14 10:22:01.123 I/Tag(1): lost".into()).unwrap();

        let cfg = Config::default();
        let bus = crate::events::Bus::new(16);
        let shared = Shared::new(
            cfg,
            bus,
            Arc::new(ScriptedDevices::new()),
            logs.clone(),
            OutputSink::new(FailingWriter),
        );
        let serial: Arc<str> = Arc::from("abc");

        let mut s = open(&logs, "abc").await;
        let exit = tokio::time::timeout(
            Duration::from_secs(5),
            stream(&shared, &serial, Color::Red, &mut s, &shared.token),
        )
        .await
        .unwrap();

        assert_eq!(exit, WorkerExit::OutputFailed);
        assert!(shared.token.is_cancelled());
        let SinkError::Io(e) = shared.take_failure().unwrap();
        assert_eq!(e.kind(), io::ErrorKind::BrokenPipe);
    }
}
