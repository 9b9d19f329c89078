// src/paths.rs

//! Path resolution: turning raw watch-target strings into an absolute,
//! deduplicated watch set.
//!
//! Raw targets come from one of three sources, in priority order:
//! 1. lines piped on stdin
//! 2. the `--files` comma-separated list
//! 3. the line-wise stdout of the `--find-cmd` discovery command
//!
//! Directory collapsing: a file inside an already-watched directory is not
//! subscribed separately. Watching the directory already delivers its
//! events, and per-path watch descriptors are a finite OS resource.

use std::collections::HashSet;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::debug;

use crate::errors::ResolveError;

/// A single resolved path to subscribe, plus whether it is a directory.
///
/// Never mutated after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchTarget {
    pub path: PathBuf,
    pub is_directory: bool,
}

/// Where the raw watch-target strings come from.
#[derive(Debug, Clone)]
pub enum PathSource {
    Stdin,
    StaticList(Vec<String>),
    DiscoveryCommand(String),
}

impl PathSource {
    /// Pick the source per the priority rules: piped stdin beats `--files`,
    /// which beats the discovery command.
    pub fn select(stdin_is_piped: bool, files: &[String], find_cmd: &str) -> Self {
        if stdin_is_piped {
            debug!("reading watch paths from stdin");
            PathSource::Stdin
        } else if !files.is_empty() {
            debug!("reading watch paths from static list: {}", files.join(", "));
            PathSource::StaticList(files.to_vec())
        } else {
            debug!("reading watch paths from command: {find_cmd}");
            PathSource::DiscoveryCommand(find_cmd.to_string())
        }
    }

    /// Source selection as used by the binary, probing the real stdin.
    pub fn from_cli(files: &[String], find_cmd: &str) -> Self {
        Self::select(!std::io::stdin().is_terminal(), files, find_cmd)
    }
}

/// Resolve a source into the final, collapsed list of watch targets.
pub async fn resolve_targets(source: &PathSource) -> Result<Vec<WatchTarget>, ResolveError> {
    let raw = match source {
        PathSource::Stdin => read_stdin_lines().await?,
        PathSource::StaticList(list) => list.clone(),
        PathSource::DiscoveryCommand(cmd) => run_discovery_command(cmd).await?,
    };

    let cwd = std::env::current_dir()?;
    Ok(collapse_targets(&cwd, &raw))
}

/// Absolutize raw targets against `cwd` and apply directory collapsing.
///
/// Single ordered pass: an entry is dropped when the directory that would
/// cover it (itself for a directory, its parent for a file) is already a
/// watched directory, or when the exact path was already seen.
pub fn collapse_targets(cwd: &Path, raw: &[String]) -> Vec<WatchTarget> {
    let mut watched_dirs: HashSet<PathBuf> = HashSet::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut targets = Vec::new();

    for entry in raw {
        if entry.is_empty() {
            continue;
        }

        let path = absolutize(cwd, Path::new(entry));
        let is_directory = std::fs::metadata(&path)
            .map(|m| m.is_dir())
            .unwrap_or(false);

        let covering = if is_directory {
            path.clone()
        } else {
            path.parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| path.clone())
        };
        if watched_dirs.contains(&covering) {
            debug!("skipping {:?}: covered by a watched directory", path);
            continue;
        }
        if !seen.insert(path.clone()) {
            continue;
        }
        if is_directory {
            watched_dirs.insert(path.clone());
        }
        targets.push(WatchTarget { path, is_directory });
    }

    targets
}

fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

async fn read_stdin_lines() -> Result<Vec<String>, ResolveError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let mut out = Vec::new();
    while let Some(line) = lines.next_line().await? {
        if !line.is_empty() {
            out.push(line);
        }
    }
    Ok(out)
}

/// Run the discovery command through the user's shell and collect its stdout
/// lines. A non-zero exit is a hard failure carrying the command's own code.
async fn run_discovery_command(cmd: &str) -> Result<Vec<String>, ResolveError> {
    let shell = std::env::var("SHELL").unwrap_or_else(|_| "sh".to_string());

    let mut child = Command::new(shell)
        .arg("-c")
        .arg(cmd)
        .stdout(Stdio::piped())
        .spawn()?;

    let mut out = Vec::new();
    if let Some(stdout) = child.stdout.take() {
        let mut lines = BufReader::new(stdout).lines();
        while let Some(line) = lines.next_line().await? {
            if !line.is_empty() {
                out.push(line);
            }
        }
    }

    let status = child.wait().await?;
    if !status.success() {
        return Err(ResolveError::DiscoveryFailed {
            code: status.code().unwrap_or(1),
        });
    }

    Ok(out)
}
