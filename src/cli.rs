//! CLI argument parsing via clap.

use clap::Parser;
use std::path::PathBuf;

/// Track timed activities from the terminal, one user at a time.
#[derive(Debug, Parser)]
#[command(name = "ragalite", version)]
pub struct Args {
    /// Path to config file (default: ./ragalite.toml or ~/.config/ragalite/ragalite.toml).
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,

    /// Override the directory that holds per-user state.
    #[arg(short = 'd', long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log in as this user without prompting.
    #[arg(short = 'u', long = "user", value_name = "NAME")]
    pub user: Option<String>,

    /// Also append everything printed to this file.
    #[arg(long = "transcript", value_name = "FILE")]
    pub transcript: Option<PathBuf>,

    /// Disable color output.
    #[arg(long = "no-color")]
    pub no_color: bool,
}
