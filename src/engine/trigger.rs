// src/engine/trigger.rs

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::debug;

/// Which termination signal a restart request should deliver to the child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermSignal {
    /// SIGINT-equivalent: a forwarded operator interrupt.
    Interrupt,
    /// SIGTERM-equivalent: the default for file-change restarts.
    Terminate,
}

/// A request for the supervisor to bring the current child down.
///
/// This is a trigger, not a payload: it carries only the signal to deliver,
/// never any changed-file data.
#[derive(Debug, Clone, Copy)]
pub struct RestartSignal {
    pub signal: TermSignal,
}

/// Sender half of the restart channel.
#[derive(Debug, Clone)]
pub struct RestartTx {
    tx: mpsc::Sender<RestartSignal>,
}

/// Receiver half, consumed by the supervisor.
pub type RestartRx = mpsc::Receiver<RestartSignal>;

/// Build the restart channel.
///
/// Capacity is fixed at 1 so that a burst of qualifying events coalesces
/// into a single pending restart: a write that finds the slot occupied is
/// dropped, not queued.
pub fn restart_channel() -> (RestartTx, RestartRx) {
    let (tx, rx) = mpsc::channel(1);
    (RestartTx { tx }, rx)
}

impl RestartTx {
    /// Coalescing write used for filesystem changes.
    pub fn notify_change(&self) {
        let signal = RestartSignal {
            signal: TermSignal::Terminate,
        };
        match self.tx.try_send(signal) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                debug!("restart already scheduled, ignoring change");
            }
            Err(TrySendError::Closed(_)) => {
                debug!("supervisor gone, ignoring change");
            }
        }
    }

    /// Non-coalescing write used for operator shutdown: waits for channel
    /// capacity so the request is never dropped. The send only errors when
    /// the supervisor has already finished, which needs no handling.
    pub async fn request_stop(&self, signal: TermSignal) {
        let _ = self.tx.send(RestartSignal { signal }).await;
    }
}
