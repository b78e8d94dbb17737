//! CLI entry point for ragalite.

mod cli;

use clap::Parser;
use ragalite::app::{self, AppOutcome};
use ragalite::config::load_config;
use ragalite::console::{OutputRelay, TerminalConsole};
use std::fs::OpenOptions;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "RAGALITE_LOG";

fn main() {
    let args = cli::Args::parse();
    init_tracing();

    // Load config.
    let mut config = match load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    // Apply CLI overrides.
    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    }
    if args.no_color {
        config.display.color = false;
    }

    let mut relay = OutputRelay::stdout();
    if let Some(path) = &args.transcript {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => relay.add_stream(file),
            Err(e) => {
                eprintln!("error: cannot open transcript {}: {e}", path.display());
                std::process::exit(1);
            }
        }
    }
    let mut console = TerminalConsole::stdin(relay);

    match app::run(&config, args.user.as_deref(), &mut console) {
        Ok(AppOutcome::Finished(summary)) if !summary.saved => std::process::exit(2),
        Ok(_) => {}
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

/// Logs go to stderr so they never interleave with the console transcript.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
