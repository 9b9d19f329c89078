// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the supervised command,
//! using `tokio::process::Command`:
//!
//! - [`child`] spawns one generation of the command and relays its output.
//! - [`kill`] delivers termination to the child's whole process tree.

pub mod child;
pub mod kill;

pub use child::{exit_code, spawn_child, spawn_output_relays};
pub use kill::terminate_tree;
