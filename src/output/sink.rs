//! # Serialized output stream.
//!
//! Every record is written and flushed under one exclusive lock, so records
//! from concurrent device workers never interleave within a line. Which
//! worker's record comes next is unspecified.

use std::io::Write;

use tokio::sync::Mutex;

use crate::error::SinkError;

/// Shared line-oriented writer.
pub struct OutputSink {
    out: Mutex<Box<dyn Write + Send>>,
}

impl OutputSink {
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
        }
    }

    /// Sink writing to the process's standard output.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    /// Writes `record` followed by a newline, then flushes.
    pub async fn write(&self, record: &str) -> Result<(), SinkError> {
        let mut out = self.out.lock().await;
        out.write_all(record.as_bytes())?;
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    }
}

impl Default for OutputSink {
    fn default() -> Self {
        Self::stdout()
    }
}
