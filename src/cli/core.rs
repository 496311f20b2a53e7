//! Shell state, dispatch and error reporting.

use std::{io, path::PathBuf, sync::Arc};

use thiserror::Error;
use uuid::Uuid;

use crate::{
    config::{Config, ConfigManager},
    core::{BillBook, ExpenseLedger, NotificationLog},
    currency::format_amount,
    domain::{common::short_id, Bill, Expense, Identifiable},
    errors::LedgerError,
    utils::paths::app_data_dir,
};

use super::commands;
use super::output;
use super::registry::{CommandEntry, CommandRegistry};

const SCRIPT_ENV: &str = "SHARED_EXPENSES_CLI_SCRIPT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

impl CliMode {
    pub fn from_env() -> Self {
        if std::env::var_os(SCRIPT_ENV).is_some() {
            CliMode::Script
        } else {
            CliMode::Interactive
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Failure of a single shell command; reported and the shell keeps running.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("exit requested")]
    ExitRequested,
}

/// Failure that ends the shell.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] LedgerError),
    #[error("Input error: {0}")]
    Input(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        CliError::Input(err.to_string())
    }
}

/// Everything one shell session works on: the ledger, the shared
/// notification log and the bill book, plus the configuration they came from.
pub struct ShellContext {
    registry: CommandRegistry,
    pub(crate) config: Config,
    pub(crate) base_dir: PathBuf,
    pub(crate) notifications: Arc<NotificationLog>,
    pub(crate) ledger: ExpenseLedger,
    pub(crate) bills: BillBook,
    pub(crate) running: bool,
}

impl ShellContext {
    /// Opens a session against the application data directory.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, app_data_dir())
    }

    pub fn with_base_dir(mode: CliMode, base_dir: PathBuf) -> Result<Self, CliError> {
        let config = ConfigManager::with_base_dir(base_dir.clone())?.load()?;
        let notifications = NotificationLog::shared();
        let ledger = ExpenseLedger::open(&config, &base_dir, Arc::clone(&notifications))?;
        let bills = BillBook::with_default_bills(Arc::clone(&notifications))
            .with_currency_symbol(config.currency_symbol.clone());
        tracing::info!(backend = %ledger.backend(), mode = ?mode, "shell session started");

        Ok(Self {
            registry: CommandRegistry::with_entries(commands::all()),
            config,
            base_dir,
            notifications,
            ledger,
            bills,
            running: true,
        })
    }

    pub fn prompt(&self) -> String {
        format!("shared-expenses [{}]> ", self.ledger.backend())
    }

    /// `(name, usage)` for every command, in registration order.
    pub(crate) fn command_usages(&self) -> Vec<(&'static str, &'static str)> {
        self.registry
            .entries()
            .map(|entry| (entry.name, entry.usage))
            .collect()
    }

    pub(crate) fn commands(&self) -> impl Iterator<Item = &CommandEntry> + '_ {
        self.registry.entries()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.get(command).map(|entry| entry.handler) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        if let Some(best) = self.registry.closest(input) {
            output::info(format!("Suggestion: `{best}`?"));
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            other => output::error(other),
        }
    }

    pub(crate) fn money(&self, amount: f64) -> String {
        format_amount(amount, &self.config.currency_symbol)
    }

    /// Resolves a full id or a unique id prefix to an expense.
    pub(crate) fn resolve_expense(&self, token: &str) -> Result<Expense, CommandError> {
        let expenses = self.ledger.list();
        resolve_by_id(token, &expenses, "expense").cloned()
    }

    /// Resolves a full id or a unique id prefix to a bill.
    pub(crate) fn resolve_bill(&self, token: &str) -> Result<Bill, CommandError> {
        let bills = self.bills.list();
        resolve_by_id(token, &bills, "bill").cloned()
    }
}

fn resolve_by_id<'a, T: Identifiable>(
    token: &str,
    items: &'a [T],
    label: &str,
) -> Result<&'a T, CommandError> {
    let needle = token.trim().to_ascii_lowercase();
    if needle.is_empty() {
        return Err(CommandError::InvalidArguments(format!("missing {label} id")));
    }
    if let Ok(id) = Uuid::parse_str(&needle) {
        return items
            .iter()
            .find(|item| item.id() == id)
            .ok_or_else(|| CommandError::Message(format!("No {label} with id `{token}`.")));
    }
    let mut matches = items.iter().filter(|item| {
        let id = item.id();
        id.simple().to_string().starts_with(&needle) || id.to_string().starts_with(&needle)
    });
    match (matches.next(), matches.next()) {
        (Some(item), None) => Ok(item),
        (None, _) => Err(CommandError::Message(format!(
            "No {label} matches `{token}`."
        ))),
        (Some(first), Some(_)) => Err(CommandError::InvalidArguments(format!(
            "`{token}` matches more than one {label}, starting with {}; use more characters.",
            short_id(first.id())
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewExpense, Payer};
    use chrono::{NaiveDate, Utc};

    fn expenses() -> Vec<Expense> {
        ["Rent", "Pizza"]
            .into_iter()
            .map(|name| {
                Expense::from_new(
                    NewExpense::new(
                        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                        name,
                        "Housing",
                        1.0,
                        Payer::User,
                    ),
                    Utc::now(),
                )
            })
            .collect()
    }

    #[test]
    fn resolves_full_ids_and_unique_prefixes() {
        let rows = expenses();
        let full = rows[1].id.to_string();
        let by_full = resolve_by_id(&full, &rows, "expense").unwrap();
        assert_eq!(by_full.name, "Pizza");

        let prefix = short_id(rows[0].id);
        let by_prefix = resolve_by_id(&prefix.to_uppercase(), &rows, "expense").unwrap();
        assert_eq!(by_prefix.name, "Rent");
    }

    #[test]
    fn ambiguous_and_unknown_prefixes_fail() {
        let rows = expenses();
        assert!(matches!(
            resolve_by_id("", &rows, "expense"),
            Err(CommandError::InvalidArguments(_))
        ));
        assert!(matches!(
            resolve_by_id("zzzz", &rows, "expense"),
            Err(CommandError::Message(_))
        ));
    }
}
