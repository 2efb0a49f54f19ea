//! # OS termination signals.
//!
//! [`wait_for_shutdown_signal`] resolves with the name of the first
//! termination signal received, which ends up as the reason of the
//! `ShutdownRequested` event.
//!
//! Unix listens for `SIGINT`, `SIGTERM` and `SIGQUIT`; other platforms only
//! for Ctrl-C.

/// Waits for a termination signal and returns its name.
///
/// Fails only if the signal handlers cannot be installed.
#[cfg(unix)]
pub(crate) async fn wait_for_shutdown_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    let name = tokio::select! {
        _ = sigint.recv()  => "SIGINT",
        _ = sigterm.recv() => "SIGTERM",
        _ = sigquit.recv() => "SIGQUIT",
    };
    Ok(name)
}

#[cfg(not(unix))]
pub(crate) async fn wait_for_shutdown_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("ctrl-c")
}
