//! Retry policies.
//!
//! This module groups the knobs that control **how often** a worker retries
//! opening its log source and **how long** it waits between attempts.
//!
//! ## Contents
//! - [`RetryPolicy`]   attempt budget (one attempt plus `max_retries`)
//! - [`BackoffPolicy`] how retry delays evolve (first / factor / max)
//!
//! ## Quick wiring
//! ```text
//! Config { retry: RetryPolicy { max_retries, backoff } }
//!      └─► core::worker::DeviceWorker uses:
//!           - retry.delay_after(attempt) to decide sleep/give up
//! ```
//!
//! ## Defaults
//! - `RetryPolicy::default()` → 10 retries.
//! - `BackoffPolicy::default()` → constant 1s.

mod backoff;
mod retry;

pub use backoff::BackoffPolicy;
pub use retry::RetryPolicy;
