use std::sync::Arc;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::core::{ExpenseLedger, LedgerOptions};
use crate::storage::{ExpenseStore, SqliteStore};
use crate::utils::paths::database_file_in;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "init-db",
            "Create the expense database and switch to it",
            "init-db",
            cmd_init_db,
        ),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

/// Provisions the database table. An empty table receives the records the
/// session is currently working with, so switching backends loses nothing.
fn cmd_init_db(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let path = context
        .config
        .database_path
        .clone()
        .unwrap_or_else(|| database_file_in(&context.base_dir));
    let mut store = SqliteStore::create_schema(&path)?;
    if store.row_count()? == 0 {
        let current = context.ledger.list();
        store.replace_all(&current)?;
        output::info(format!("Copied {} expense(s) into the database.", current.len()));
    }
    context.ledger = ExpenseLedger::new(
        Box::new(store),
        Arc::clone(&context.notifications),
        LedgerOptions::from_config(&context.config, &context.base_dir),
    )?;
    output::success(format!(
        "Database ready at {}; now using the {} store.",
        path.display(),
        context.ledger.backend()
    ));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        let Some(entry) = context.command(&name.to_lowercase()) else {
            context.suggest_command(name);
            return Ok(());
        };
        output::info(format!("{}: {}", entry.usage, entry.description));
        return Ok(());
    }

    output::section("Commands");
    let rows: Vec<Vec<String>> = context
        .commands()
        .map(|entry| vec![entry.usage.to_string(), entry.description.to_string()])
        .collect();
    output::print_table(&["Usage", "Description"], &rows);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
