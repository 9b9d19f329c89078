// src/engine/supervisor.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::time::sleep;
use tracing::{debug, info};

use crate::engine::trigger::{RestartRx, RestartSignal};
use crate::exec::{exit_code, spawn_child, spawn_output_relays, terminate_tree};

/// Pause between generations, so a crash-looping child or a rapid burst of
/// events does not spin-restart.
const RESTART_DELAY: Duration = Duration::from_millis(500);

/// Exit policy configuration, fixed at startup.
///
/// Each `Some(code)` means "stop looping and exit the whole tool with
/// `code`" when the corresponding condition holds at the end of a
/// generation; `None` means keep restarting.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExitPolicy {
    /// Exit after a change-triggered restart decision.
    pub on_change: Option<i32>,
    /// Exit when the child exits non-zero with no intervening change.
    pub on_error: Option<i32>,
    /// Exit when the child exits zero with no intervening change.
    pub on_success: Option<i32>,
}

/// Outcome of one generation of the supervised command.
#[derive(Debug, Clone, Copy)]
struct GenerationOutcome {
    exit_code: i32,
    change_detected: bool,
}

/// Runs the supervised command in a loop, one generation at a time.
///
/// A generation is one spawn-to-exit lifetime of the child. The supervisor
/// owns the child handle for its whole generation; the only cross-task
/// inputs are the restart channel and the controller's `stopping` flag.
pub struct Supervisor {
    command: Vec<String>,
    policy: ExitPolicy,
    restart_rx: RestartRx,
    stopping: Arc<AtomicBool>,
}

impl Supervisor {
    pub fn new(
        command: Vec<String>,
        policy: ExitPolicy,
        restart_rx: RestartRx,
        stopping: Arc<AtomicBool>,
    ) -> Self {
        Self {
            command,
            policy,
            restart_rx,
            stopping,
        }
    }

    /// Run generations until an exit condition fires.
    ///
    /// The returned value is the exit code for the whole tool: the child's
    /// own code after an operator stop (0 if no child ever ran), or the
    /// configured code when an exit policy fires.
    pub async fn run(mut self) -> Result<i32> {
        info!(command = ?self.command, "supervisor started");

        let mut last_exit = 0;
        loop {
            if self.stopping.load(Ordering::SeqCst) {
                // Stop arrived between generations; no child is running.
                info!(exit_code = last_exit, "stop requested, supervisor exiting");
                return Ok(last_exit);
            }

            let outcome = self.run_generation().await?;
            last_exit = outcome.exit_code;

            if self.stopping.load(Ordering::SeqCst) {
                info!(
                    exit_code = outcome.exit_code,
                    "stop requested, exiting with the child's code"
                );
                return Ok(outcome.exit_code);
            }

            if outcome.change_detected {
                if let Some(code) = self.policy.on_change {
                    info!(exit_code = code, "change detected, exit-on-change fired");
                    return Ok(code);
                }
            } else if outcome.exit_code != 0 {
                if let Some(code) = self.policy.on_error {
                    info!(
                        child_code = outcome.exit_code,
                        exit_code = code,
                        "exit-on-error fired"
                    );
                    return Ok(code);
                }
            } else if let Some(code) = self.policy.on_success {
                info!(exit_code = code, "exit-on-success fired");
                return Ok(code);
            }

            sleep(RESTART_DELAY).await;
        }
    }

    /// One spawn-to-exit lifetime of the child.
    ///
    /// Races "child exited on its own" against "restart signal arrived";
    /// whichever is observed first decides the outcome, guarded by the
    /// generation-local `change_detected` flag. A signal that loses the race
    /// is discarded here and never leaks into the next generation's
    /// decision.
    async fn run_generation(&mut self) -> Result<GenerationOutcome> {
        let mut child = spawn_child(&self.command)?;
        let pid = child.id();
        spawn_output_relays(&mut child);
        debug!(?pid, "process started");

        enum Raced {
            Exited(std::io::Result<std::process::ExitStatus>),
            Signal(Option<RestartSignal>),
        }

        let mut change_detected = false;
        let mut restarts_closed = false;

        let status = loop {
            let raced = tokio::select! {
                status = child.wait() => Raced::Exited(status),
                signal = self.restart_rx.recv(), if !restarts_closed => Raced::Signal(signal),
            };

            match raced {
                Raced::Exited(status) => {
                    break status.context("waiting for the child process")?;
                }
                Raced::Signal(Some(signal)) if !change_detected => {
                    change_detected = true;
                    debug!(signal = ?signal.signal, "change detected, stopping the process group");
                    if let Err(err) = terminate_tree(&mut child, signal.signal) {
                        // The child can beat us to the exit; nothing to do.
                        debug!("termination failed, child likely already exiting: {err:#}");
                    }
                }
                Raced::Signal(Some(_)) => {
                    debug!("restart already in progress for this generation, discarding signal");
                }
                Raced::Signal(None) => restarts_closed = true,
            }
        };

        let code = exit_code(&status);
        debug!(?pid, exit_code = code, change_detected, "process exited");

        Ok(GenerationOutcome {
            exit_code: code,
            change_detected,
        })
    }
}
