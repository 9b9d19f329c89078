// src/watch/mod.rs

//! File watching.
//!
//! This module is responsible for:
//! - Subscribing the resolved watch set with a cross-platform filesystem
//!   watcher (`notify`).
//! - Classifying raw events into restart / unwatch-then-restart / ignore.
//! - Feeding the coalescing restart channel.
//!
//! It does **not** know about the supervised process; it only turns
//! filesystem changes into restart triggers.

pub mod classify;
pub mod watcher;

pub use classify::{classify, Classification};
pub use watcher::{spawn_watcher, WatcherHandle};
