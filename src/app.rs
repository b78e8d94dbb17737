//! Program flow: login, load, interactive session, farewell, save.

use crate::commands::default_registry;
use crate::config::Config;
use crate::console::Console;
use crate::error::{AppError, ConsoleError};
use crate::model::ActivityBook;
use crate::session::{SessionLoop, SessionReport};
use crate::store::{validate_username, UserStore};
use crate::ui::Palette;

const LOGIN_PMT: &str = "Login: ";

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppOutcome {
    /// Input ended before a username was entered; nothing was loaded or saved.
    NoLogin,
    /// A session ran for `username`.
    Finished(SessionSummary),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub username: String,
    pub report: SessionReport,
    /// False when saving state failed (already reported to the user).
    pub saved: bool,
}

/// Run one complete interactive session.
///
/// `username` skips the login prompt when it is valid. State is saved even
/// when the session ends on a console failure; that failure is returned after
/// the save attempt.
pub fn run(
    config: &Config,
    username: Option<&str>,
    console: &mut dyn Console,
) -> Result<AppOutcome, AppError> {
    let palette = Palette::new(config.display.color);
    let registry = default_registry()?;

    let username = match preset_username(username, console, &palette)? {
        Some(name) => name,
        None => match login(console, &palette) {
            Ok(name) => name,
            Err(ConsoleError::EndOfInput) => return Ok(AppOutcome::NoLogin),
            Err(e) => return Err(e.into()),
        },
    };
    console.write(&palette.welcome(&username))?;

    let store = UserStore::new(&config.data_dir);
    let mut book = load_book(&store, &username, config, console, &palette)?;

    let session = SessionLoop::new(&registry).run(console, &mut book);
    let farewell = console.write(&palette.goodbye());
    let saved = save_book(&store, &username, &book, console, &palette);

    let report = session?;
    farewell?;
    tracing::info!(user = %username, executed = report.executed, saved, "session finished");
    Ok(AppOutcome::Finished(SessionSummary {
        username,
        report,
        saved,
    }))
}

/// Prompt until a usable username is entered.
pub fn login(console: &mut dyn Console, palette: &Palette) -> Result<String, ConsoleError> {
    loop {
        let reply = console.prompt(LOGIN_PMT)?;
        let name = reply.trim();
        match validate_username(name) {
            Ok(()) => return Ok(name.to_string()),
            Err(msg) => console.write(&palette.warning(&msg))?,
        }
    }
}

fn preset_username(
    username: Option<&str>,
    console: &mut dyn Console,
    palette: &Palette,
) -> Result<Option<String>, ConsoleError> {
    let Some(name) = username.map(str::trim) else {
        return Ok(None);
    };
    match validate_username(name) {
        Ok(()) => Ok(Some(name.to_string())),
        Err(msg) => {
            console.write(&palette.warning(&format!("ignoring --user `{name}`: {msg}")))?;
            Ok(None)
        }
    }
}

fn load_book(
    store: &UserStore,
    username: &str,
    config: &Config,
    console: &mut dyn Console,
    palette: &Palette,
) -> Result<ActivityBook, ConsoleError> {
    let loaded = match store.load(username, &config.default_categories) {
        Ok(loaded) => loaded,
        Err(e) => {
            console.write(&palette.warning(&format!("could not load saved state: {e}")))?;
            return Ok(ActivityBook::new(Vec::new(), config.default_categories.clone()));
        }
    };
    if loaded.is_new() {
        tracing::info!(user = username, "no saved state; starting fresh");
    }
    for problem in loaded.problems() {
        let mut msg = format!(
            "{} is {}; starting from defaults",
            problem.path.display(),
            problem.issue
        );
        if let Some(backup) = &problem.backup {
            msg.push_str(&format!(" (original kept at {})", backup.display()));
        }
        console.write(&palette.warning(&msg))?;
    }
    Ok(loaded.book)
}

fn save_book(
    store: &UserStore,
    username: &str,
    book: &ActivityBook,
    console: &mut dyn Console,
    palette: &Palette,
) -> bool {
    match store.save(username, book) {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(user = username, error = %e, "failed to save user state");
            // Best effort: the console may be the thing that failed.
            let _ = console.write(&palette.warning(&format!("failed to save state: {e}")));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::TerminationReason;
    use crate::testsupport::{ScriptedConsole, TestTempDir};

    fn config(tmp: &TestTempDir) -> Config {
        Config {
            data_dir: tmp.path().to_path_buf(),
            display: crate::config::DisplayConfig { color: false },
            ..Config::default()
        }
    }

    fn finished(outcome: AppOutcome) -> SessionSummary {
        match outcome {
            AppOutcome::Finished(summary) => summary,
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn full_session_persists_activity() {
        let tmp = TestTempDir::new("app-full");
        let cfg = config(&tmp);
        let mut console = ScriptedConsole::new(["amy", "a", "run", "1", "5", ""]);
        let summary = finished(run(&cfg, None, &mut console).unwrap());
        assert_eq!(summary.username, "amy");
        assert_eq!(summary.report.executed, 1);
        assert_eq!(summary.report.reason, TerminationReason::Declined);
        assert!(summary.saved);
        let transcript = console.transcript();
        assert!(transcript.starts_with("Login: Welcome amy\n"));
        assert!(transcript.ends_with("Goodbye!\n"));

        let reloaded = UserStore::new(tmp.path())
            .load("amy", &cfg.default_categories)
            .unwrap();
        assert_eq!(reloaded.book.activities().len(), 1);
        assert_eq!(reloaded.book.activities()[0].name, "run");
    }

    #[test]
    fn invalid_login_reprompts() {
        let tmp = TestTempDir::new("app-login");
        let cfg = config(&tmp);
        let mut console = ScriptedConsole::new(["../x", "", "bob", ""]);
        let summary = finished(run(&cfg, None, &mut console).unwrap());
        assert_eq!(summary.username, "bob");
        assert_eq!(console.transcript().matches("Login: ").count(), 3);
        assert!(console.transcript().contains("warning: username"));
    }

    #[test]
    fn eof_before_login_saves_nothing() {
        let tmp = TestTempDir::new("app-nologin");
        let cfg = config(&tmp);
        let mut console = ScriptedConsole::new(Vec::<String>::new());
        assert_eq!(run(&cfg, None, &mut console).unwrap(), AppOutcome::NoLogin);
        assert!(!tmp.path().join("users").exists());
    }

    #[test]
    fn preset_user_skips_login() {
        let tmp = TestTempDir::new("app-preset");
        let cfg = config(&tmp);
        let mut console = ScriptedConsole::new(["p", ""]);
        let summary = finished(run(&cfg, Some("amy"), &mut console).unwrap());
        assert_eq!(summary.username, "amy");
        assert!(!console.transcript().contains("Login: "));
        assert!(console
            .transcript()
            .contains("Current categories: [academic, social, physical]"));
    }

    #[test]
    fn invalid_preset_user_falls_back_to_prompt() {
        let tmp = TestTempDir::new("app-badpreset");
        let cfg = config(&tmp);
        let mut console = ScriptedConsole::new(["amy", ""]);
        let summary = finished(run(&cfg, Some("a/b"), &mut console).unwrap());
        assert_eq!(summary.username, "amy");
        assert!(console.transcript().contains("ignoring --user `a/b`"));
    }

    #[test]
    fn end_of_input_mid_session_still_saves() {
        let tmp = TestTempDir::new("app-eof");
        let cfg = config(&tmp);
        let mut console = ScriptedConsole::new(["amy", "addcategory", "hobby", "add", "swim"]);
        let summary = finished(run(&cfg, None, &mut console).unwrap());
        assert_eq!(summary.report.reason, TerminationReason::EndOfInput);
        assert!(summary.saved);
        assert!(console.transcript().ends_with("Goodbye!\n"));

        let reloaded = UserStore::new(tmp.path())
            .load("amy", &cfg.default_categories)
            .unwrap();
        assert!(reloaded.book.categories().contains(&"hobby".to_string()));
        assert!(reloaded.book.activities().is_empty());
    }

    #[test]
    fn damaged_state_is_reported_at_login() {
        let tmp = TestTempDir::new("app-damaged");
        tmp.write_text("users/amy/activities.json", "garbage");
        let cfg = config(&tmp);
        let mut console = ScriptedConsole::new(["amy", ""]);
        finished(run(&cfg, None, &mut console).unwrap());
        let transcript = console.transcript();
        assert!(transcript.contains("warning:"), "got: {transcript}");
        assert!(transcript.contains("malformed"));
        assert!(transcript.contains("original kept at"));
    }
}
