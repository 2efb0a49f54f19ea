//! Error types used by the logvisor runtime.
//!
//! - [`RuntimeError`] errors that end [`Supervisor::run`](crate::Supervisor::run).
//! - [`SourceError`] failures of the external device/log sources.
//! - [`SinkError`] failures writing to the output stream.
//! - [`ParseError`] a line that does not fit its pattern.
//!
//! Only [`RuntimeError`] is ever fatal. Every type provides `as_label` for
//! logs, matching the event reasons published on the bus.

use thiserror::Error;

/// # Errors that stop the runtime.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The output stream failed; there is no fallback sink.
    #[error("output stream failed: {0}")]
    Output(#[from] SinkError),

    /// OS signal handlers could not be installed.
    #[error("failed to install signal handlers: {0}")]
    Signal(#[source] std::io::Error),
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use logvisor::{RuntimeError, SinkError};
    ///
    /// let err = RuntimeError::Output(SinkError::Io(std::io::ErrorKind::BrokenPipe.into()));
    /// assert_eq!(err.as_label(), "runtime_output_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::Output(_) => "runtime_output_failed",
            RuntimeError::Signal(_) => "runtime_signal_setup",
        }
    }
}

/// # Errors produced by device and log sources.
///
/// All of them are transient from the runtime's point of view: a listing
/// failure is retried on the next poll, an open failure is retried per
/// [`RetryPolicy`](crate::RetryPolicy).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SourceError {
    /// The external command could not be started.
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading from a running source failed.
    #[error("source read failed: {0}")]
    Io(#[from] std::io::Error),

    /// The command ran but exited unsuccessfully.
    #[error("`{program}` exited with {status}")]
    Exit { program: String, status: String },

    /// The source refused the request (scripted sources, missing device).
    #[error("source unavailable: {reason}")]
    Unavailable { reason: String },
}

impl SourceError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            SourceError::Spawn { .. } => "source_spawn_failed",
            SourceError::Io(_) => "source_io",
            SourceError::Exit { .. } => "source_exit_status",
            SourceError::Unavailable { .. } => "source_unavailable",
        }
    }
}

/// # Errors produced by the output sink.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

impl SinkError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            SinkError::Io(_) => "sink_io",
        }
    }
}

/// # A line that did not match its pattern.
///
/// Always recoverable: the line is skipped and processing continues.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    #[error("line does not match the {pattern} pattern")]
    NoMatch { pattern: &'static str },

    #[error("required field `{field}` is empty")]
    EmptyField { field: &'static str },
}

impl ParseError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ParseError::NoMatch { .. } => "parse_no_match",
            ParseError::EmptyField { .. } => "parse_empty_field",
        }
    }
}
