// src/exec/kill.rs

//! Terminate a child and all of its descendants.
//!
//! Signalling only the direct child pid leaves anything it forked running as
//! orphans. The child is therefore spawned as the leader of its own process
//! group, and on Unix a single `killpg` reaches the whole tree. Platforms
//! without process-group semantics fall back to killing the direct child.

use anyhow::{Context, Result};
use tokio::process::Child;

use crate::engine::trigger::TermSignal;

/// Deliver `signal` to the child's whole process group.
#[cfg(unix)]
pub fn terminate_tree(child: &mut Child, signal: TermSignal) -> Result<()> {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let pid = child.id().context("child already reaped")?;
    let sig = match signal {
        TermSignal::Interrupt => Signal::SIGINT,
        TermSignal::Terminate => Signal::SIGTERM,
    };
    killpg(Pid::from_raw(pid as i32), sig).context("signalling child process group")?;
    Ok(())
}

/// Deliver termination to the direct child only.
#[cfg(not(unix))]
pub fn terminate_tree(child: &mut Child, _signal: TermSignal) -> Result<()> {
    child.start_kill().context("killing child process")?;
    Ok(())
}
