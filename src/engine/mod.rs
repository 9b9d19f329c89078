// src/engine/mod.rs

//! Restart signalling and the child-supervision loop.
//!
//! This module ties together:
//! - the capacity-1 coalescing channel that turns bursts of filesystem
//!   events into at most one pending restart
//! - the supervisor loop that owns the child process lifecycle:
//!   one generation per spawn, the signal-vs-exit race, and the
//!   exit-policy decision

pub mod supervisor;
pub mod trigger;

pub use supervisor::{ExitPolicy, Supervisor};
pub use trigger::{restart_channel, RestartRx, RestartSignal, RestartTx, TermSignal};
