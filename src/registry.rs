//! Named actions and name-based dispatch.
//!
//! Actions are registered under canonical names before the session starts.
//! Dispatch resolves free-text input against the registered names with
//! [`OptionPrompt`] and runs the bound action once.

use crate::console::Console;
use crate::error::{ConsoleError, RegistryError};
use crate::resolve::{OptionPrompt, Resolution};
use std::collections::BTreeMap;

/// Prompt subject used when asking for an action name.
pub const ACTION_SUBJECT: &str = "an action";

// ---------------------------------------------------------------------------
// Action trait
// ---------------------------------------------------------------------------

/// Something the user can invoke by name.
///
/// Execution is a plain synchronous call; an action may prompt for more input
/// through the same console.
pub trait Action {
    /// State the action operates on.
    type Context: ?Sized;

    fn execute(&self, console: &mut dyn Console, ctx: &mut Self::Context)
        -> Result<(), ConsoleError>;
}

/// Outcome of one resolve-and-dispatch round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The named action ran once.
    Executed(String),
    /// The user declined to choose; nothing ran.
    NoAction,
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Name to action bindings, iterated in sorted name order.
#[derive(Debug, Clone)]
pub struct ActionRegistry<A> {
    bindings: BTreeMap<String, A>,
}

impl<A> ActionRegistry<A> {
    pub fn new() -> Self {
        Self {
            bindings: BTreeMap::new(),
        }
    }

    /// Bind `name` to `action`, returning the action it replaced.
    ///
    /// Re-registering the exact same name replaces the binding. A name that
    /// differs from an existing one only in case is rejected, since the
    /// resolver could not tell them apart.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        action: A,
    ) -> Result<Option<A>, RegistryError> {
        let name = name.into();
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        let folded = name.to_lowercase();
        if let Some(existing) = self
            .bindings
            .keys()
            .find(|existing| **existing != name && existing.to_lowercase() == folded)
        {
            return Err(RegistryError::Ambiguous {
                name,
                existing: existing.clone(),
            });
        }
        Ok(self.bindings.insert(name, action))
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&A> {
        self.bindings.get(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl<A: Action> ActionRegistry<A> {
    /// Ask for an action name and run the matching action.
    ///
    /// Unmatched input re-prompts; an empty line yields [`Dispatch::NoAction`].
    /// End-of-input is returned as [`ConsoleError::EndOfInput`].
    pub fn resolve_and_dispatch(
        &self,
        console: &mut dyn Console,
        ctx: &mut A::Context,
    ) -> Result<Dispatch, ConsoleError> {
        let resolution = OptionPrompt::new(ACTION_SUBJECT, self.names())
            .reenter_until_match(true)
            .default_choice("")
            .resolve(console)?;
        let Resolution::Resolved(name) = resolution else {
            return Ok(Dispatch::NoAction);
        };
        let Some(action) = self.bindings.get(&name) else {
            return Ok(Dispatch::NoAction);
        };
        tracing::debug!(action = %name, "dispatching action");
        action.execute(console, ctx)?;
        Ok(Dispatch::Executed(name))
    }
}

impl<A> Default for ActionRegistry<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::ScriptedConsole;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Probe {
        Add,
        Print,
        /// Asks one follow-up question.
        Ask,
    }

    impl Action for Probe {
        type Context = Vec<String>;

        fn execute(
            &self,
            console: &mut dyn Console,
            log: &mut Vec<String>,
        ) -> Result<(), ConsoleError> {
            match self {
                Probe::Add => log.push("add".into()),
                Probe::Print => log.push("print".into()),
                Probe::Ask => {
                    let answer = console.prompt("Name: ")?;
                    log.push(format!("ask:{answer}"));
                }
            }
            Ok(())
        }
    }

    fn registry() -> ActionRegistry<Probe> {
        let mut r = ActionRegistry::new();
        r.register("add", Probe::Add).unwrap();
        r.register("print", Probe::Print).unwrap();
        r
    }

    #[test]
    fn new_registry_is_empty() {
        assert!(ActionRegistry::<Probe>::new().is_empty());
        assert!(ActionRegistry::<Probe>::default().is_empty());
    }

    #[test]
    fn names_are_sorted() {
        let mut r = registry();
        r.register("ask", Probe::Ask).unwrap();
        assert_eq!(r.names().collect::<Vec<_>>(), vec!["add", "ask", "print"]);
        assert_eq!(r.len(), 3);
    }

    #[test]
    fn reregistering_same_name_replaces() {
        let mut r = registry();
        let previous = r.register("add", Probe::Ask).unwrap();
        assert_eq!(previous, Some(Probe::Add));
        assert_eq!(r.get("add"), Some(&Probe::Ask));
        assert_eq!(r.len(), 2);
    }

    #[test]
    fn case_only_collision_is_rejected() {
        let mut r = registry();
        let err = r.register("ADD", Probe::Print).unwrap_err();
        assert_eq!(
            err,
            RegistryError::Ambiguous {
                name: "ADD".into(),
                existing: "add".into()
            }
        );
        assert_eq!(r.get("add"), Some(&Probe::Add));
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut r = registry();
        assert_eq!(r.register("", Probe::Add), Err(RegistryError::EmptyName));
    }

    #[test]
    fn prefix_dispatches_exactly_once() {
        let r = registry();
        let mut console = ScriptedConsole::new(["a"]);
        let mut log = Vec::new();
        let outcome = r.resolve_and_dispatch(&mut console, &mut log).unwrap();
        assert_eq!(outcome, Dispatch::Executed("add".into()));
        assert_eq!(log, vec!["add"]);
        assert!(console
            .transcript()
            .contains("Choose an action (add, print): "));
    }

    #[test]
    fn empty_input_runs_nothing() {
        let r = registry();
        let mut console = ScriptedConsole::new([""]);
        let mut log = Vec::new();
        let outcome = r.resolve_and_dispatch(&mut console, &mut log).unwrap();
        assert_eq!(outcome, Dispatch::NoAction);
        assert!(log.is_empty());
    }

    #[test]
    fn unmatched_input_reprompts() {
        let r = registry();
        let mut console = ScriptedConsole::new(["xyz", "P"]);
        let mut log = Vec::new();
        let outcome = r.resolve_and_dispatch(&mut console, &mut log).unwrap();
        assert_eq!(outcome, Dispatch::Executed("print".into()));
        assert_eq!(console.lines_read(), 2);
    }

    #[test]
    fn action_may_prompt_through_same_console() {
        let mut r = registry();
        r.register("ask", Probe::Ask).unwrap();
        let mut console = ScriptedConsole::new(["as", "zed"]);
        let mut log = Vec::new();
        r.resolve_and_dispatch(&mut console, &mut log).unwrap();
        assert_eq!(log, vec!["ask:zed"]);
    }

    #[test]
    fn end_of_input_propagates() {
        let r = registry();
        let mut console = ScriptedConsole::new(Vec::<String>::new());
        let mut log = Vec::new();
        let err = r.resolve_and_dispatch(&mut console, &mut log).unwrap_err();
        assert!(err.is_end_of_input());
    }
}
