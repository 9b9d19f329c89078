// src/watch/watcher.rs

use anyhow::{Context, Result};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, error, info, warn};

use crate::engine::trigger::RestartTx;
use crate::paths::WatchTarget;
use crate::watch::classify::{classify, Classification};

/// Handle for the filesystem watcher.
///
/// The underlying `RecommendedWatcher` is owned by the event-consumption
/// task (all later mutation, i.e. unwatching removed paths, happens there);
/// this handle only allows tearing that task and its OS watches down.
pub struct WatcherHandle {
    task: tokio::task::JoinHandle<()>,
}

impl WatcherHandle {
    /// Stop consuming events and release the watch resources.
    pub fn shutdown(self) {
        self.task.abort();
    }
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Subscribe every target and spawn the event-consumption loop.
///
/// Any subscription failure is fatal: a partially watched set would miss
/// changes while looking healthy.
///
/// - `targets` is the resolved, collapsed watch set.
/// - `track_new_paths` forwards creations as restart triggers.
/// - `restart_tx` is the coalescing channel into the supervisor.
pub fn spawn_watcher(
    targets: Vec<WatchTarget>,
    track_new_paths: bool,
    restart_tx: RestartTx,
) -> Result<WatcherHandle> {
    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) =
        tokio::sync::mpsc::unbounded_channel::<notify::Result<Event>>();

    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            if let Err(err) = event_tx.send(res) {
                // We can't log via tracing here easily, so fallback to stderr.
                eprintln!("nightwatch: failed to forward notify event: {err}");
            }
        },
        Config::default(),
    )
    .context("creating filesystem watcher")?;

    for target in &targets {
        debug!("watching path {:?}", target.path);
        if let Err(err) = watcher.watch(&target.path, RecursiveMode::NonRecursive) {
            error!("failed to watch path {:?}: {err}", target.path);
            return Err(err).with_context(|| format!("watching path {:?}", target.path));
        }
    }

    info!(paths = targets.len(), "file watcher started");

    // The consumer task takes ownership of the watcher; unwatching on
    // removal happens here and nowhere else.
    let task = tokio::spawn(async move {
        while let Some(res) = event_rx.recv().await {
            let event = match res {
                Ok(event) => event,
                Err(err) => {
                    warn!("watch error: {err}");
                    continue;
                }
            };
            debug!("received notify event: {:?}", event);

            match classify(&event.kind, track_new_paths) {
                Classification::Restart => {}
                Classification::UnwatchAndRestart => {
                    for path in &event.paths {
                        debug!("removed, dropping watch: {:?}", path);
                        if let Err(err) = watcher.unwatch(path) {
                            debug!("unwatch of {:?} failed: {err}", path);
                        }
                    }
                }
                Classification::Ignore => continue,
            }

            restart_tx.notify_change();
        }

        debug!("file watcher loop ended");
    });

    Ok(WatcherHandle { task })
}
