//! Line-oriented console collaborator.
//!
//! The interactive core only needs two operations: read one line, write some
//! text. [`Console`] captures that contract so the resolver and session loop
//! can be driven by stdin in production and by scripted input in tests.

pub mod relay;

use crate::error::ConsoleError;
use std::io::{self, BufRead, Write};

pub use relay::{CaptureBuffer, OutputRelay};

/// Outcome of one blocking line read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// User submitted a full line (terminator stripped).
    Line(String),
    /// End-of-file (`Ctrl-D` / closed stdin).
    Eof,
}

/// Blocking text console.
pub trait Console {
    /// Read one line of input, blocking until it is available.
    fn read_line(&mut self) -> Result<ReadOutcome, ConsoleError>;

    /// Write text verbatim; no newline is appended.
    fn write(&mut self, text: &str) -> Result<(), ConsoleError>;

    /// Write `text`, then read the reply.
    ///
    /// End-of-input is reported as [`ConsoleError::EndOfInput`] so callers can
    /// bail out with `?`.
    fn prompt(&mut self, text: &str) -> Result<String, ConsoleError> {
        self.write(text)?;
        match self.read_line()? {
            ReadOutcome::Line(line) => Ok(line),
            ReadOutcome::Eof => Err(ConsoleError::EndOfInput),
        }
    }

    /// Write `text` followed by a newline.
    fn writeln(&mut self, text: &str) -> Result<(), ConsoleError> {
        self.write(text)?;
        self.write("\n")
    }
}

/// Console reading from any buffered reader and writing through a relay.
#[derive(Debug)]
pub struct TerminalConsole<R> {
    input: R,
    output: OutputRelay,
}

impl TerminalConsole<io::StdinLock<'static>> {
    /// Console bound to process stdin.
    pub fn stdin(output: OutputRelay) -> Self {
        Self::new(io::stdin().lock(), output)
    }
}

impl<R: BufRead> TerminalConsole<R> {
    pub fn new(input: R, output: OutputRelay) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead> Console for TerminalConsole<R> {
    fn read_line(&mut self) -> Result<ReadOutcome, ConsoleError> {
        // Prompts are written without a trailing newline; make them visible
        // before blocking on input.
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(ReadOutcome::Eof);
        }
        strip_line_terminator(&mut line);
        Ok(ReadOutcome::Line(line))
    }

    fn write(&mut self, text: &str) -> Result<(), ConsoleError> {
        self.output.relay(text)?;
        Ok(())
    }
}

/// Remove one trailing `\n` or `\r\n`.
fn strip_line_terminator(line: &mut String) {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
}
