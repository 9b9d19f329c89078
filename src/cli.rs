// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::Parser;

/// Default discovery command used when neither piped stdin nor `--files`
/// provides watch targets.
pub const DEFAULT_FIND_CMD: &str = "find . -type f -not -path '*/\\.git/*'";

/// Command-line arguments for `nightwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "nightwatch",
    version,
    about = "Run an arbitrary command and restart it when watched files change.",
    long_about = None
)]
pub struct CliArgs {
    /// The command to run and supervise, with its arguments.
    #[arg(
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "COMMAND"
    )]
    pub command: Vec<String>,

    /// Debug logging.
    #[arg(long)]
    pub debug: bool,

    /// Files (or dirs) to watch (comma separated list).
    #[arg(long, value_name = "LIST", value_delimiter = ',')]
    pub files: Vec<String>,

    /// Command to list files (or dirs) to watch.
    #[arg(long, value_name = "CMD", default_value = DEFAULT_FIND_CMD)]
    pub find_cmd: String,

    /// Also restart when new paths appear under a watched directory.
    #[arg(long = "dir", short = 'd')]
    pub track_new_paths: bool,

    /// Exit on file change with the given code.
    #[arg(long, value_name = "CODE")]
    pub exit_on_change: Option<i32>,

    /// Exit with the given code if the process returns an error code.
    #[arg(long, value_name = "CODE")]
    pub exit_on_error: Option<i32>,

    /// Exit with the given code if the process returns with code 0.
    #[arg(long, value_name = "CODE")]
    pub exit_on_success: Option<i32>,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
