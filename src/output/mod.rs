//! Record formatting and the shared output stream.
//!
//! - [`RecordFormatter`] lays out one colored record;
//! - [`OutputSink`] serializes whole records onto one writer.

mod format;
mod sink;

pub use format::RecordFormatter;
pub use sink::OutputSink;
