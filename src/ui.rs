//! Styled status lines written through the console.
//!
//! Lines are returned as strings rather than printed so they flow through the
//! console's output relay like every other message.

use crossterm::style::{Color, Stylize};

const LABEL_WARNING: &str = "warning:";

/// Formats status lines, with ANSI styling when color is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    color: bool,
}

impl Palette {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// `Welcome <user>` line.
    pub fn welcome(&self, username: &str) -> String {
        if self.color {
            format!("Welcome {}\n", username.with(Color::Green).bold())
        } else {
            format!("Welcome {username}\n")
        }
    }

    /// Warning line prefixed with a label.
    pub fn warning(&self, msg: &str) -> String {
        if self.color {
            format!("{} {msg}\n", LABEL_WARNING.with(Color::Yellow).bold())
        } else {
            format!("{LABEL_WARNING} {msg}\n")
        }
    }

    pub fn goodbye(&self) -> String {
        if self.color {
            format!("{}\n", "Goodbye!".with(Color::DarkGrey))
        } else {
            "Goodbye!\n".to_string()
        }
    }
}
