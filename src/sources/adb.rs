//! # `adb`-backed sources.
//!
//! - [`AdbDeviceSource`] runs `adb devices` once per poll;
//! - [`AdbLogSource`] runs `adb -s <serial> logcat -v time` per device.
//!
//! `logcat` can emit non-UTF-8 bytes. Using `BufReader::lines()` would end the
//! stream on the first invalid byte, so lines are read as bytes and decoded
//! lossily instead.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStdout, Command};
use tracing::debug;

use crate::error::SourceError;
use crate::sources::{DeviceSource, LineStream, LogSource};

/// Lists devices with `adb devices`.
#[derive(Debug, Clone)]
pub struct AdbDeviceSource {
    program: PathBuf,
}

impl AdbDeviceSource {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl DeviceSource for AdbDeviceSource {
    async fn list(&self) -> Result<Vec<String>, SourceError> {
        let out = Command::new(&self.program)
            .arg("devices")
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|source| spawn_error(&self.program, source))?;

        if !out.status.success() {
            return Err(SourceError::Exit {
                program: self.program.display().to_string(),
                status: out.status.to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&out.stdout)
            .lines()
            .map(str::to_string)
            .collect())
    }
}

/// Streams `adb -s <serial> logcat -v time`.
#[derive(Debug, Clone)]
pub struct AdbLogSource {
    program: PathBuf,
}

impl AdbLogSource {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl LogSource for AdbLogSource {
    async fn open(&self, serial: &str) -> Result<Box<dyn LineStream>, SourceError> {
        let child = Command::new(&self.program)
            .args(["-s", serial, "logcat", "-v", "time"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| spawn_error(&self.program, source))?;

        Ok(Box::new(ChildLines::from_child(child)?))
    }
}

/// Lines of a running `logcat` child.
struct ChildLines {
    child: Child,
    reader: BufReader<ChildStdout>,
    buf: Vec<u8>,
}

impl ChildLines {
    /// Takes over a child spawned with a piped stdout.
    fn from_child(mut child: Child) -> Result<Self, SourceError> {
        let stdout = child.stdout.take().ok_or_else(|| SourceError::Unavailable {
            reason: "logcat stdout was not captured".to_string(),
        })?;

        Ok(Self {
            child,
            reader: BufReader::new(stdout),
            buf: Vec::with_capacity(1024),
        })
    }
}

#[async_trait]
impl LineStream for ChildLines {
    async fn next_line(&mut self) -> Result<Option<String>, SourceError> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf).await? == 0 {
            return Ok(None);
        }

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }

    async fn close(&mut self) {
        if let Err(e) = self.child.start_kill() {
            debug!(error = %e, "logcat already exited");
        }
        if let Err(e) = self.child.wait().await {
            debug!(error = %e, "failed to reap logcat");
        }
    }
}

fn spawn_error(program: &Path, source: std::io::Error) -> SourceError {
    SourceError::Spawn {
        program: program.display().to_string(),
        source,
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let src = AdbDeviceSource::new("/nonexistent/adb-for-logvisor-tests");
        let err = src.list().await.unwrap_err();
        assert_eq!(err.as_label(), "source_spawn_failed");

        let logs = AdbLogSource::new("/nonexistent/adb-for-logvisor-tests");
        let err = logs.open("abc123").await.err().unwrap();
        assert_eq!(err.as_label(), "source_spawn_failed");
    }

    #[tokio::test]
    async fn failing_listing_reports_exit_status() {
        // `false devices` exits 1 without output.
        let src = AdbDeviceSource::new("false");
        let err = src.list().await.unwrap_err();
        assert_eq!(err.as_label(), "source_exit_status");
    }

    #[tokio::test]
    async fn child_output_is_split_into_lines() {
        // `echo -s <serial> logcat -v time` prints its arguments and exits.
        let logs = AdbLogSource::new("echo");
        let mut stream = logs.open("abc123").await.unwrap();
        assert_eq!(
            stream.next_line().await.unwrap().as_deref(),
            Some("-s abc123 logcat -v time")
        );
        assert_eq!(stream.next_line().await.unwrap(), None);
        stream.close().await;
    }

    #[tokio::test]
    async fn invalid_utf8_and_crlf_do_not_end_the_stream() {
        let child = Command::new("sh")
            .args(["-c", r"printf 'bad \377\376 bytes\r\nnext line\n'"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .unwrap();
        let mut stream = ChildLines::from_child(child).unwrap();

        assert_eq!(
            stream.next_line().await.unwrap().as_deref(),
            Some("bad \u{fffd}\u{fffd} bytes")
        );
        assert_eq!(stream.next_line().await.unwrap().as_deref(), Some("next line"));
        assert_eq!(stream.next_line().await.unwrap(), None);
        stream.close().await;
    }

    #[tokio::test]
    async fn child_without_piped_stdout_is_unavailable() {
        let child = Command::new("true").stdout(Stdio::null()).spawn().unwrap();
        let err = ChildLines::from_child(child).err().unwrap();
        assert_eq!(err.as_label(), "source_unavailable");
    }
}
