//! Interactive session loop.
//!
//! Repeatedly asks for an action name and dispatches it until the user enters
//! an empty line or input runs out. Once terminated, the loop never prompts
//! again.

use crate::console::Console;
use crate::error::ConsoleError;
use crate::registry::{Action, ActionRegistry, Dispatch};

/// Why the session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// Empty line at the action prompt.
    Declined,
    /// Console ran out of input, possibly mid-action.
    EndOfInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Terminated(TerminationReason),
}

/// Summary returned when the loop stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionReport {
    /// Actions executed by this `run` call.
    pub executed: usize,
    pub reason: TerminationReason,
}

/// Drives resolve-and-dispatch rounds against a registry.
#[derive(Debug)]
pub struct SessionLoop<'r, A> {
    registry: &'r ActionRegistry<A>,
    state: SessionState,
}

impl<'r, A: Action> SessionLoop<'r, A> {
    pub fn new(registry: &'r ActionRegistry<A>) -> Self {
        Self {
            registry,
            state: SessionState::Running,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Run until termination.
    ///
    /// End-of-input is a clean termination; only other console failures are
    /// returned as errors, leaving the loop in the running state.
    pub fn run(
        &mut self,
        console: &mut dyn Console,
        ctx: &mut A::Context,
    ) -> Result<SessionReport, ConsoleError> {
        if self.registry.is_empty() {
            tracing::warn!("session started with no registered actions");
        }
        let mut executed = 0;
        let reason = loop {
            if let SessionState::Terminated(reason) = self.state {
                break reason;
            }
            match self.registry.resolve_and_dispatch(console, ctx) {
                Ok(Dispatch::Executed(_)) => executed += 1,
                Ok(Dispatch::NoAction) => {
                    self.state = SessionState::Terminated(TerminationReason::Declined);
                }
                Err(ConsoleError::EndOfInput) => {
                    self.state = SessionState::Terminated(TerminationReason::EndOfInput);
                }
                Err(e) => return Err(e),
            }
        };
        tracing::debug!(executed, ?reason, "session terminated");
        Ok(SessionReport { executed, reason })
    }
}
