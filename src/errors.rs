// src/errors.rs

//! Crate-wide error types.
//!
//! Most of the crate propagates `anyhow::Error` with context; the types here
//! exist for failures that must carry a specific process exit code.

use thiserror::Error;

/// Errors from resolving the set of paths to watch.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The discovery command exited non-zero. The tool exits with the same
    /// code, without ever spawning the supervised command.
    #[error("discovery command exited with code {code}")]
    DiscoveryFailed { code: i32 },

    #[error("io error while resolving watch paths: {0}")]
    Io(#[from] std::io::Error),
}

pub use anyhow::{Error, Result};
