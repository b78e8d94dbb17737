//! Ragalite: a console activity tracker.
//!
//! Users log in by name, then repeatedly pick an action by typing any
//! case-insensitive prefix of its name. An empty line ends the session, and
//! the user's activities and categories are saved under the data directory.
//!
//! # Quick start
//!
//! ```no_run
//! use ragalite::app;
//! use ragalite::config::load_config;
//! use ragalite::console::{OutputRelay, TerminalConsole};
//!
//! let config = load_config(None).unwrap();
//! let mut console = TerminalConsole::stdin(OutputRelay::stdout());
//! app::run(&config, None, &mut console).unwrap();
//! ```

pub mod app;
pub mod commands;
pub mod config;
pub mod console;
pub mod error;
pub mod model;
pub mod registry;
pub mod resolve;
pub mod session;
pub mod store;
#[cfg(test)]
pub mod testsupport;
pub mod ui;
