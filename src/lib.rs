// src/lib.rs

pub mod cli;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod paths;
pub mod watch;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::time::timeout;
use tracing::{info, warn};

use crate::cli::CliArgs;
use crate::engine::{ExitPolicy, Supervisor, TermSignal, restart_channel};
use crate::paths::{PathSource, resolve_targets};
use crate::watch::spawn_watcher;

/// Upper bound on shutdown: after an operator stop is requested, the tool
/// exits as soon as the child is gone, or after this long regardless.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - path resolution
/// - the filesystem watcher
/// - the coalescing restart channel
/// - the supervisor loop
/// - SIGINT/SIGTERM handling
///
/// Returns the exit code for the whole process.
pub async fn run(args: CliArgs) -> Result<i32> {
    let source = PathSource::from_cli(&args.files, &args.find_cmd);
    let targets = resolve_targets(&source).await?;

    if targets.is_empty() {
        warn!("nothing to watch; the command will run but never restart on changes");
    }

    let (restart_tx, restart_rx) = restart_channel();

    let watcher = spawn_watcher(targets, args.track_new_paths, restart_tx.clone())?;

    // Set only here; the supervisor reads it at each generation boundary.
    let stopping = Arc::new(AtomicBool::new(false));

    let policy = ExitPolicy {
        on_change: args.exit_on_change,
        on_error: args.exit_on_error,
        on_success: args.exit_on_success,
    };
    let supervisor = Supervisor::new(args.command, policy, restart_rx, Arc::clone(&stopping));
    let mut supervisor_task = tokio::spawn(supervisor.run());

    let code = tokio::select! {
        // The supervisor decided on its own: an exit policy fired, or
        // something fatal (spawn/wait failure) happened.
        res = &mut supervisor_task => res??,

        signal = shutdown_signal() => {
            let signal = signal?;
            info!(?signal, "stop requested, waiting for the child to exit");

            stopping.store(true, Ordering::SeqCst);
            restart_tx.request_stop(signal).await;

            match timeout(SHUTDOWN_GRACE, &mut supervisor_task).await {
                Ok(res) => res??,
                Err(_) => {
                    warn!("child did not exit within the shutdown grace period");
                    supervisor_task.abort();
                    0
                }
            }
        }
    };

    watcher.shutdown();
    Ok(code)
}

/// Wait for an operator stop request.
///
/// On Unix both SIGINT and SIGTERM are stop requests, and the child is later
/// signalled with whichever one arrived.
#[cfg(unix)]
async fn shutdown_signal() -> Result<TermSignal> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt =
        signal(SignalKind::interrupt()).context("registering SIGINT handler")?;
    let mut terminate =
        signal(SignalKind::terminate()).context("registering SIGTERM handler")?;

    let received = tokio::select! {
        _ = interrupt.recv() => TermSignal::Interrupt,
        _ = terminate.recv() => TermSignal::Terminate,
    };
    Ok(received)
}

/// Wait for an operator stop request (Ctrl-C only off Unix).
#[cfg(not(unix))]
async fn shutdown_signal() -> Result<TermSignal> {
    tokio::signal::ctrl_c()
        .await
        .context("listening for Ctrl-C")?;
    Ok(TermSignal::Interrupt)
}
