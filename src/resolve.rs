//! Free-text option resolution.
//!
//! Turns a typed line into one of a live set of choices. Matching is
//! case-insensitive and accepts any prefix of an option, so `a` selects `add`.
//! The empty line is reserved: it always means "decline" and is checked before
//! any option is compared.
//!
//! When several options match, an option equal to the input wins; otherwise
//! the first prefix match in the caller's iteration order is returned.

use crate::console::{Console, ReadOutcome};
use crate::error::ConsoleError;

/// Result of one resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Input denoted this option (original spelling from the option set).
    Resolved(String),
    /// No option was chosen; carries the caller's default.
    Unresolved(String),
}

impl Resolution {
    /// The chosen option, or the default when nothing matched.
    pub fn into_choice(self) -> String {
        match self {
            Self::Resolved(choice) | Self::Unresolved(choice) => choice,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

/// Find the option denoted by `input`, if any.
///
/// Empty input and empty options never match.
pub fn match_option<'a, I>(input: &str, options: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let needle = input.to_lowercase();
    if needle.is_empty() {
        return None;
    }

    let mut first_prefix = None;
    for option in options {
        if option.is_empty() {
            continue;
        }
        let normalized = option.to_lowercase();
        if normalized == needle {
            return Some(option);
        }
        if first_prefix.is_none() && normalized.starts_with(&needle) {
            first_prefix = Some(option);
        }
    }
    first_prefix
}

/// A "Choose ..." prompt over a fixed option set.
#[derive(Debug, Clone)]
pub struct OptionPrompt<'a> {
    subject: &'a str,
    options: Vec<&'a str>,
    reenter_until_match: bool,
    default_choice: String,
}

impl<'a> OptionPrompt<'a> {
    /// Prompt for `subject` (rendered as `Choose <subject> (...)`).
    ///
    /// Defaults: one attempt only, default choice `""`.
    pub fn new<I>(subject: &'a str, options: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self {
            subject,
            options: options.into_iter().collect(),
            reenter_until_match: false,
            default_choice: String::new(),
        }
    }

    /// Keep prompting until the input matches or is empty.
    pub fn reenter_until_match(mut self, reenter: bool) -> Self {
        self.reenter_until_match = reenter;
        self
    }

    /// Value returned when the user declines or nothing matches.
    pub fn default_choice(mut self, default: impl Into<String>) -> Self {
        self.default_choice = default.into();
        self
    }

    /// Prompt line shown before each attempt.
    pub fn prompt_text(&self) -> String {
        format!("Choose {} ({}): ", self.subject, self.options.join(", "))
    }

    /// Run the prompt against `console`.
    ///
    /// Every attempt writes the prompt and consumes exactly one line. No match
    /// is never an error; only console failures and end-of-input are.
    pub fn resolve(&self, console: &mut dyn Console) -> Result<Resolution, ConsoleError> {
        loop {
            console.write(&self.prompt_text())?;
            let line = match console.read_line()? {
                ReadOutcome::Line(line) => line,
                ReadOutcome::Eof => return Err(ConsoleError::EndOfInput),
            };
            if line.is_empty() {
                break;
            }
            if let Some(choice) = match_option(&line, self.options.iter().copied()) {
                return Ok(Resolution::Resolved(choice.to_string()));
            }
            if !self.reenter_until_match {
                break;
            }
        }
        Ok(Resolution::Unresolved(self.default_choice.clone()))
    }
}
