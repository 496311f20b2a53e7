use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::domain::{
    common::short_id, Displayable, Expense, ExpenseStatus, ExpenseUpdate, NamedEntity, NewExpense,
};

use super::{parse_amount_arg, parse_date_arg, parse_payer_arg, usage_error};

const ADD_USAGE: &str = "add <date> <name> <category> <amount> <payer>";
const EDIT_USAGE: &str = "edit <id> key=value...";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "list",
            "List expenses, newest first",
            "list [payer]",
            cmd_list,
        ),
        CommandEntry::new("add", "Record a new expense", ADD_USAGE, cmd_add),
        CommandEntry::new(
            "edit",
            "Change fields of an expense (date, name, category, amount, payer, status)",
            EDIT_USAGE,
            cmd_edit,
        ),
        CommandEntry::new("delete", "Remove an expense", "delete <id>", cmd_delete),
    ]
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let expenses = match args.first() {
        Some(raw) => context.ledger.list_by_payer(parse_payer_arg(raw)?),
        None => context.ledger.list(),
    };
    if expenses.is_empty() {
        output::info("No expenses recorded.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = expenses
        .iter()
        .map(|expense| expense_row(context, expense))
        .collect();
    output::print_table(
        &["ID", "Date", "Name", "Category", "Amount", "Paid by", "Status"],
        &rows,
    );
    output::info(format!("{} expense(s).", expenses.len()));
    Ok(())
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [date, name, category, amount, payer] = args else {
        return Err(usage_error(ADD_USAGE));
    };
    let input = NewExpense::new(
        parse_date_arg(date)?,
        *name,
        *category,
        parse_amount_arg(amount, &context.config.currency_symbol)?,
        parse_payer_arg(payer)?,
    );
    let saved = context.ledger.add(input)?;
    output::success(format!(
        "Added \"{}\" ({}) paid by {} [{}].",
        saved.name(),
        context.money(saved.amount),
        saved.paid_by,
        short_id(saved.id)
    ));
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((token, assignments)) = args.split_first() else {
        return Err(usage_error(EDIT_USAGE));
    };
    if assignments.is_empty() {
        return Err(usage_error(EDIT_USAGE));
    }
    let expense = context.resolve_expense(token)?;
    let mut changes = ExpenseUpdate::new();
    for assignment in assignments {
        let (key, value) = assignment.split_once('=').ok_or_else(|| {
            CommandError::InvalidArguments(format!("expected key=value, got `{assignment}`"))
        })?;
        changes = match key.trim().to_ascii_lowercase().as_str() {
            "date" => changes.date(parse_date_arg(value)?),
            "name" => changes.name(value),
            "category" => changes.category(value),
            "amount" => changes.amount(parse_amount_arg(value, &context.config.currency_symbol)?),
            "payer" | "paid_by" => changes.paid_by(parse_payer_arg(value)?),
            "status" => changes.status(
                value
                    .parse::<ExpenseStatus>()
                    .map_err(CommandError::InvalidArguments)?,
            ),
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown field `{other}`"
                )))
            }
        };
    }
    let updated = context.ledger.update(expense.id, changes)?;
    output::success(format!("Updated {}.", updated.display_label()));
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [token] = args else {
        return Err(usage_error("delete <id>"));
    };
    let expense = context.resolve_expense(token)?;
    let removed = context.ledger.delete(expense.id)?;
    output::success(format!(
        "Deleted \"{}\" ({}).",
        removed.name(),
        context.money(removed.amount)
    ));
    Ok(())
}

fn expense_row(context: &ShellContext, expense: &Expense) -> Vec<String> {
    vec![
        short_id(expense.id),
        expense.date.to_string(),
        expense.name.clone(),
        expense.category.clone(),
        context.money(expense.amount),
        expense.paid_by.to_string(),
        expense.status.to_string(),
    ]
}
