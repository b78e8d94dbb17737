//! The fixed set of interactive commands.
//!
//! Each variant is bound under its canonical name in an [`ActionRegistry`];
//! dispatch goes through an exhaustive `match`, so adding a variant without
//! handling it is a compile error.

use crate::console::Console;
use crate::error::{ConsoleError, RegistryError};
use crate::model::{bracket_list, Activity, ActivityBook, TimeInterval};
use crate::registry::{Action, ActionRegistry};
use crate::resolve::{OptionPrompt, Resolution};

const AC_NAME_PMT: &str = "Enter an activity name: ";
const TIME_START_PMT: &str = "Enter the start time: ";
const TIME_STOP_PMT: &str = "Enter the stop time: ";
const CAT_NAME_PMT: &str = "Enter the category to create: ";

/// Interactive commands available at the action prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Add,
    Print,
    Filter,
    AddCategory,
    SetCategory,
}

impl Command {
    pub const ALL: [Command; 5] = [
        Command::Add,
        Command::Print,
        Command::Filter,
        Command::AddCategory,
        Command::SetCategory,
    ];

    /// Canonical name typed at the action prompt.
    pub fn name(self) -> &'static str {
        match self {
            Command::Add => "add",
            Command::Print => "print",
            Command::Filter => "filter",
            Command::AddCategory => "addcategory",
            Command::SetCategory => "setcategory",
        }
    }
}

/// Registry with every [`Command`] bound under its canonical name.
pub fn default_registry() -> Result<ActionRegistry<Command>, RegistryError> {
    let mut registry = ActionRegistry::new();
    for command in Command::ALL {
        registry.register(command.name(), command)?;
    }
    Ok(registry)
}

impl Action for Command {
    type Context = ActivityBook;

    fn execute(
        &self,
        console: &mut dyn Console,
        book: &mut ActivityBook,
    ) -> Result<(), ConsoleError> {
        match self {
            Command::Add => add_activity(console, book),
            Command::Print => print_book(console, book),
            Command::Filter => filter_by_category(console, book),
            Command::AddCategory => add_category(console, book),
            Command::SetCategory => set_activity_category(console, book),
        }
    }
}

fn add_activity(console: &mut dyn Console, book: &mut ActivityBook) -> Result<(), ConsoleError> {
    let name = console.prompt(AC_NAME_PMT)?;
    if name.trim().is_empty() {
        return console.writeln("Activity name cannot be empty.");
    }
    let start = prompt_integer(console, TIME_START_PMT)?;
    let stop = prompt_integer(console, TIME_STOP_PMT)?;
    let interval = match TimeInterval::new(start, stop) {
        Ok(interval) => interval,
        Err(msg) => return console.writeln(&format!("Invalid interval: {msg}.")),
    };

    let activity = Activity::new(name, interval);
    console.writeln(&format!("Adding activity: {activity}"))?;
    if let Some(previous) = book.add_activity(activity) {
        console.writeln(&format!("Replaced previous entry: {previous}"))?;
    }
    Ok(())
}

fn print_book(console: &mut dyn Console, book: &ActivityBook) -> Result<(), ConsoleError> {
    console.writeln(&format!(
        "Current categories: {}",
        bracket_list(book.categories())
    ))?;
    console.writeln(&format!(
        "Current activities: {}",
        bracket_list(book.activities())
    ))
}

fn filter_by_category(console: &mut dyn Console, book: &ActivityBook) -> Result<(), ConsoleError> {
    let resolution = OptionPrompt::new(
        "a category",
        book.categories().iter().map(String::as_str),
    )
    .resolve(console)?;
    let Resolution::Resolved(category) = resolution else {
        return console.writeln("Couldn't find category!");
    };
    let matching = book.in_category(&category).cloned().collect::<Vec<_>>();
    console.writeln(&format!(
        "Activities in {category}: {}",
        bracket_list(&matching)
    ))
}

fn add_category(console: &mut dyn Console, book: &mut ActivityBook) -> Result<(), ConsoleError> {
    let reply = console.prompt(CAT_NAME_PMT)?;
    let category = reply.trim();
    if book.add_category(category) {
        console.writeln(&format!("Added category: {category}"))
    } else {
        console.writeln(&format!(
            "Category is empty or already exists: {category}"
        ))
    }
}

fn set_activity_category(
    console: &mut dyn Console,
    book: &mut ActivityBook,
) -> Result<(), ConsoleError> {
    if book.activities().is_empty() {
        return console.writeln("No activities to categorize.");
    }
    if book.categories().is_empty() {
        return console.writeln("No categories yet; create one with addcategory.");
    }

    let Resolution::Resolved(activity) = OptionPrompt::new("an activity", book.activity_names())
        .reenter_until_match(true)
        .resolve(console)?
    else {
        return Ok(());
    };
    let Resolution::Resolved(category) = OptionPrompt::new(
        "a category",
        book.categories().iter().map(String::as_str),
    )
    .reenter_until_match(true)
    .resolve(console)?
    else {
        return Ok(());
    };

    match book.set_category(&activity, &category) {
        Ok(()) => console.writeln(&format!("Set category of {activity} to {category}.")),
        Err(msg) => console.writeln(&format!("Could not set category: {msg}.")),
    }
}

/// Prompt until the reply parses as a whole number.
fn prompt_integer(console: &mut dyn Console, prompt: &str) -> Result<i64, ConsoleError> {
    loop {
        let reply = console.prompt(prompt)?;
        match reply.trim().parse::<i64>() {
            Ok(value) => return Ok(value),
            Err(_) => console.writeln(&format!("Not a whole number: {reply}"))?,
        }
    }
}
