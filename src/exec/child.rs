// src/exec/child.rs

use std::process::{ExitStatus, Stdio};

use anyhow::{Context, Result};
use tokio::process::{Child, Command};

/// Spawn one generation of the supervised command.
///
/// The child inherits the full parent environment unmodified. Its
/// stdout/stderr are piped so the relay tasks can forward them, and on Unix
/// the child becomes the leader of a fresh process group so a restart can
/// take its whole descendant tree down with it.
pub fn spawn_child(command: &[String]) -> Result<Child> {
    let (program, args) = command.split_first().context("no command specified")?;

    let mut cmd = Command::new(program);
    cmd.args(args).stdout(Stdio::piped()).stderr(Stdio::piped());

    #[cfg(unix)]
    cmd.process_group(0);

    let child = cmd
        .spawn()
        .with_context(|| format!("failed to start command '{program}'"))?;

    Ok(child)
}

/// Spawn the per-stream relay tasks.
///
/// Byte-for-byte copies into the parent's stdout/stderr, so the child never
/// blocks on unread output. Each task ends on its own when the child's side
/// of the pipe closes; there is no cooperative cancellation.
pub fn spawn_output_relays(child: &mut Child) {
    if let Some(mut stdout) = child.stdout.take() {
        tokio::spawn(async move {
            let mut out = tokio::io::stdout();
            let _ = tokio::io::copy(&mut stdout, &mut out).await;
        });
    }
    if let Some(mut stderr) = child.stderr.take() {
        tokio::spawn(async move {
            let mut out = tokio::io::stderr();
            let _ = tokio::io::copy(&mut stderr, &mut out).await;
        });
    }
}

/// Map an exit status to the code the tool reports.
///
/// A signal-killed child has no code of its own; report the conventional
/// `128 + signo` on Unix and `-1` elsewhere.
pub fn exit_code(status: &ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    -1
}
