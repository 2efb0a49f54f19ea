//! logvisor - colorized logcat from every attached device
//!
//! # Usage
//!
//! ```bash
//! logvisor
//! logvisor --adb ~/Android/Sdk/platform-tools/adb --no-color > all.log
//! RUST_LOG=logvisor=debug logvisor
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use logvisor::{BackoffPolicy, Config, LogWriter, RetryPolicy, Subscribe, Supervisor};

/// Streams logcat from every attached Android device, one color per device.
#[derive(Parser, Debug)]
#[command(name = "logvisor")]
#[command(version, about, long_about = None)]
struct Cli {
    /// adb executable
    #[arg(long, env = "LOGVISOR_ADB", default_value = "adb")]
    adb: PathBuf,

    /// Delay between two device listings, in milliseconds
    #[arg(long, env = "LOGVISOR_POLL_INTERVAL_MS", default_value_t = 3000)]
    poll_interval_ms: u64,

    /// How long to wait before reporting that no device is attached
    #[arg(long, env = "LOGVISOR_STARTUP_WAIT_MS", default_value_t = 1000)]
    startup_wait_ms: u64,

    /// Retries when a device's logcat cannot be started
    #[arg(long, env = "LOGVISOR_RETRIES", default_value_t = 10)]
    retries: u32,

    /// Delay between two retries, in milliseconds
    #[arg(long, env = "LOGVISOR_RETRY_DELAY_MS", default_value_t = 1000)]
    retry_delay_ms: u64,

    /// Print records without ANSI colors
    #[arg(long)]
    no_color: bool,

    /// Log runtime diagnostics at debug level
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            adb: self.adb.clone(),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            startup_wait: Duration::from_millis(self.startup_wait_ms),
            retry: RetryPolicy {
                max_retries: self.retries,
                backoff: BackoffPolicy::constant(Duration::from_millis(self.retry_delay_ms)),
            },
            color: !self.no_color,
            ..Config::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let sup = Supervisor::builder(cli.config())
        .with_subscribers(subs)
        .build();

    sup.run().await.context("logvisor stopped")?;
    Ok(())
}

/// Diagnostics go to stderr; stdout is reserved for log records.
fn init_logging(verbose: bool) -> Result<()> {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default))
        .map_err(|e| anyhow::anyhow!("invalid log filter: {}", e))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .init();

    Ok(())
}
