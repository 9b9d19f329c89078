//! Exercises the supervisor loop against real `sh` children.

#![cfg(unix)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use nightwatch::engine::{ExitPolicy, RestartTx, Supervisor, TermSignal, restart_channel};

fn supervisor(script: &str, policy: ExitPolicy) -> (Supervisor, RestartTx, Arc<AtomicBool>) {
    let command = vec!["sh".to_string(), "-c".to_string(), script.to_string()];
    let (tx, rx) = restart_channel();
    let stopping = Arc::new(AtomicBool::new(false));
    let sup = Supervisor::new(command, policy, rx, Arc::clone(&stopping));
    (sup, tx, stopping)
}

/// Poll `check` every 50ms until it returns true, panicking after `limit`.
async fn wait_for(limit: Duration, what: &str, mut check: impl FnMut() -> bool) {
    let start = tokio::time::Instant::now();
    while !check() {
        assert!(start.elapsed() < limit, "timed out waiting for {what}");
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

#[tokio::test]
async fn exit_on_error_fires_with_the_configured_code() {
    let policy = ExitPolicy {
        on_error: Some(9),
        ..Default::default()
    };
    let (sup, _tx, _stopping) = supervisor("exit 3", policy);

    assert_eq!(sup.run().await.unwrap(), 9);
}

#[tokio::test]
async fn exit_on_success_fires_only_for_a_zero_exit() {
    let policy = ExitPolicy {
        on_success: Some(7),
        ..Default::default()
    };
    let (sup, _tx, _stopping) = supervisor("exit 0", policy);

    assert_eq!(sup.run().await.unwrap(), 7);
}

#[tokio::test]
async fn exit_on_change_beats_the_childs_own_exit_code() {
    let policy = ExitPolicy {
        on_change: Some(7),
        ..Default::default()
    };
    let (sup, tx, _stopping) = supervisor("sleep 30", policy);
    let handle = tokio::spawn(sup.run());

    tokio::time::sleep(Duration::from_millis(300)).await;
    tx.notify_change();

    assert_eq!(handle.await.unwrap().unwrap(), 7);
}

#[tokio::test]
async fn without_policies_a_failing_child_restarts_until_stopped() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("runs");
    let script = format!("echo run >> {}; exit 1", marker.display());
    let (sup, tx, stopping) = supervisor(&script, ExitPolicy::default());
    let handle = tokio::spawn(sup.run());

    // At least two generations proves a non-zero exit did not end the loop.
    wait_for(Duration::from_secs(10), "a second generation", || {
        std::fs::read_to_string(&marker)
            .map(|s| s.lines().count() >= 2)
            .unwrap_or(false)
    })
    .await;

    stopping.store(true, Ordering::SeqCst);
    tx.request_stop(TermSignal::Terminate).await;

    // Depending on where the stop lands, the child last exited on its own
    // (1) or was terminated mid-generation (128 + SIGTERM).
    let code = handle.await.unwrap().unwrap();
    assert!(code == 1 || code == 143, "unexpected exit code {code}");
}

#[tokio::test]
async fn operator_stop_reports_the_childs_real_exit_code() {
    let script = "trap 'exit 5' TERM INT; sleep 30 & wait $!";
    let (sup, tx, stopping) = supervisor(script, ExitPolicy::default());
    let handle = tokio::spawn(sup.run());

    tokio::time::sleep(Duration::from_millis(300)).await;
    stopping.store(true, Ordering::SeqCst);
    tx.request_stop(TermSignal::Terminate).await;

    assert_eq!(handle.await.unwrap().unwrap(), 5);
}

#[tokio::test]
async fn a_restart_terminates_the_whole_process_group() {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    let dir = tempfile::tempdir().unwrap();
    let pid_file = dir.path().join("grandchild.pid");
    // The child forks a grandchild, records its pid, then blocks on it.
    let script = format!("sleep 30 & echo $! > {}; wait", pid_file.display());
    let policy = ExitPolicy {
        on_change: Some(0),
        ..Default::default()
    };
    let (sup, tx, _stopping) = supervisor(&script, policy);
    let handle = tokio::spawn(sup.run());

    let mut grandchild = 0;
    wait_for(Duration::from_secs(10), "the grandchild pid", || {
        match std::fs::read_to_string(&pid_file) {
            Ok(s) => match s.trim().parse::<i32>() {
                Ok(pid) => {
                    grandchild = pid;
                    true
                }
                Err(_) => false,
            },
            Err(_) => false,
        }
    })
    .await;

    tx.notify_change();
    assert_eq!(handle.await.unwrap().unwrap(), 0);

    // Give the kernel a moment to deliver the group signal.
    tokio::time::sleep(Duration::from_millis(200)).await;

    let dead = match kill(Pid::from_raw(grandchild), None) {
        Err(_) => true,
        // The pid can linger as a zombie until the reaper gets to it.
        Ok(()) => {
            if cfg!(target_os = "linux") {
                std::fs::read_to_string(format!("/proc/{grandchild}/stat"))
                    .map(|s| s.contains(") Z"))
                    .unwrap_or(true)
            } else {
                false
            }
        }
    };
    assert!(dead, "grandchild {grandchild} survived the restart");
}

#[tokio::test]
async fn late_signals_after_a_decided_generation_are_discarded() {
    // Two quick signals in one generation: the second must be a no-op, and
    // the loop must still honour exit-on-change exactly once.
    let policy = ExitPolicy {
        on_change: Some(4),
        ..Default::default()
    };
    let (sup, tx, _stopping) = supervisor("sleep 30", policy);
    let handle = tokio::spawn(sup.run());

    tokio::time::sleep(Duration::from_millis(300)).await;
    tx.notify_change();
    tx.notify_change();

    assert_eq!(handle.await.unwrap().unwrap(), 4);
}
