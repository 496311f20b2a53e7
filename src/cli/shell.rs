use std::{
    borrow::Cow,
    fmt,
    io::{self, BufRead},
};

use colored::Colorize;
use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output;

/// Starts the shell in the mode selected by the environment.
pub fn run_cli() -> Result<(), CliError> {
    let mode = CliMode::from_env();
    if mode == CliMode::Script {
        colored::control::set_override(false);
    }
    let mut session = ShellContext::new(mode)?;
    match mode {
        CliMode::Script => run_script(&mut session, io::stdin().lock()),
        CliMode::Interactive => run_interactive(&mut session),
    }
}

fn run_interactive(session: &mut ShellContext) -> Result<(), CliError> {
    let mut editor: Editor<UsageHelper, DefaultHistory> = Editor::new()?;
    editor.set_helper(Some(UsageHelper::new(session.command_usages())));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
    output::info(format!(
        "{} expense(s) loaded from the {} store. Type `help` to list commands.",
        session.ledger.len(),
        session.ledger.backend()
    ));

    while session.running {
        let line = match editor.readline(&session.prompt()) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                output::info("Goodbye.");
                break;
            }
            Err(err) => return Err(err.into()),
        };
        if line.trim().is_empty() {
            continue;
        }
        editor.add_history_entry(line.trim()).ok();
        if run_line(session, &line) == LoopControl::Exit {
            break;
        }
    }
    Ok(())
}

/// Reads one command per line until input ends or `exit` is reached.
fn run_script(session: &mut ShellContext, input: impl BufRead) -> Result<(), CliError> {
    for (index, line) in input.lines().enumerate() {
        let line = line?;
        tracing::debug!(line = index + 1, "script command");
        if run_line(session, &line) == LoopControl::Exit || !session.running {
            break;
        }
    }
    Ok(())
}

/// Executes `line` and reports any failure, so a bad command never ends the session.
fn run_line(session: &mut ShellContext, line: &str) -> LoopControl {
    match handle_line(session, line) {
        Ok(control) => control,
        Err(err) => {
            session.report_error(err);
            LoopControl::Continue
        }
    }
}

pub(crate) fn handle_line(
    session: &mut ShellContext,
    line: &str,
) -> Result<LoopControl, CommandError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(LoopControl::Continue);
    }
    let tokens = match parse_command_line(trimmed) {
        Ok(tokens) => tokens,
        Err(err) => {
            output::warning(format!("Could not read `{trimmed}`: {err}"));
            return Ok(LoopControl::Continue);
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();

    let control = session.dispatch(&raw.to_lowercase(), raw, &args)?;
    if control == LoopControl::Exit {
        session.running = false;
    }
    Ok(control)
}

/// Completes command names and shows the usage of the command being typed
/// as an inline hint.
struct UsageHelper {
    // Sorted by name.
    usages: Vec<(String, String)>,
}

impl UsageHelper {
    fn new(usages: Vec<(&'static str, &'static str)>) -> Self {
        let mut usages: Vec<(String, String)> = usages
            .into_iter()
            .map(|(name, usage)| (name.to_string(), usage.to_string()))
            .collect();
        usages.sort();
        usages.dedup_by(|a, b| a.0 == b.0);
        Self { usages }
    }

    fn usage_for(&self, name: &str) -> Option<&str> {
        self.usages
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .map(|(_, usage)| usage.as_str())
    }
}

impl Helper for UsageHelper {}

impl Completer for UsageHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let typed = &line[..pos];
        let word = typed.trim_start();
        if word.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        let start = typed.len() - word.len();
        let word = word.to_ascii_lowercase();
        let candidates = self
            .usages
            .iter()
            .filter(|(name, _)| name.starts_with(&word))
            .map(|(name, usage)| Pair {
                display: usage.clone(),
                replacement: name.clone(),
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for UsageHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        // Only hint while the cursor sits right after `<command> `.
        if pos != line.len() || !line.ends_with(' ') {
            return None;
        }
        let mut words = line.split_whitespace();
        let name = words.next()?;
        if words.next().is_some() {
            return None;
        }
        let usage = self.usage_for(name)?;
        let params = usage.split_once(' ').map(|(_, params)| params)?;
        Some(params.to_string())
    }
}

impl Highlighter for UsageHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(hint.dimmed().to_string())
    }
}

impl Validator for UsageHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    shell_words::split(input).map_err(|err| ParseError(err.to_string()))
}

#[derive(Debug)]
pub(crate) struct ParseError(String);

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helper() -> UsageHelper {
        UsageHelper::new(vec![
            ("totals", "totals"),
            ("add", "add <date> <name> <category> <amount> <payer>"),
            ("delete", "delete <id>"),
        ])
    }

    #[test]
    fn quoted_arguments_stay_together() {
        let tokens = parse_command_line(r#"add 2025-01-01 "Weekly Groceries" Groceries 42 Prachi"#)
            .unwrap();
        assert_eq!(tokens[2], "Weekly Groceries");
        assert_eq!(tokens.len(), 6);
    }

    #[test]
    fn unbalanced_quotes_are_reported() {
        let err = parse_command_line(r#"add "Rent"#).unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn usage_lookup_ignores_case() {
        let helper = helper();
        assert_eq!(helper.usage_for("DELETE"), Some("delete <id>"));
        assert_eq!(helper.usage_for("remove"), None);
    }
}
