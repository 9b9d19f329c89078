// src/watch/classify.rs

//! Pure classification of raw filesystem events.

use notify::event::{EventKind, ModifyKind};

/// What the watch loop should do with a raw event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Schedule a restart of the supervised command.
    Restart,
    /// Drop the subscriptions for the event's paths, then schedule a restart.
    UnwatchAndRestart,
    /// Not a change we care about.
    Ignore,
}

/// Classify a single event kind. First matching rule wins:
///
/// - data/metadata modification -> restart
/// - creation -> restart, but only when `track_new_paths` is set
/// - removal -> unwatch the path, then restart (editors replace files by
///   writing a new one over the old name, so a removal usually means the
///   content changed)
/// - everything else (rename bookkeeping, access, ...) -> ignore
pub fn classify(kind: &EventKind, track_new_paths: bool) -> Classification {
    match kind {
        EventKind::Modify(ModifyKind::Data(_))
        | EventKind::Modify(ModifyKind::Metadata(_))
        | EventKind::Modify(ModifyKind::Any) => Classification::Restart,
        EventKind::Create(_) if track_new_paths => Classification::Restart,
        EventKind::Create(_) => Classification::Ignore,
        EventKind::Remove(_) => Classification::UnwatchAndRestart,
        _ => Classification::Ignore,
    }
}
