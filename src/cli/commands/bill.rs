use chrono::Local;

use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::domain::{common::short_id, BillStatus};

use super::{parse_amount_arg, usage_error};

const AMOUNT_USAGE: &str = "bill-amount <id> <amount>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("bills", "List recurring household bills", "bills", cmd_bills),
        CommandEntry::new(
            "bill-paid",
            "Mark a bill as paid",
            "bill-paid <id>",
            cmd_bill_paid,
        ),
        CommandEntry::new(
            "bill-amount",
            "Change the amount of a bill",
            AMOUNT_USAGE,
            cmd_bill_amount,
        ),
    ]
}

fn cmd_bills(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let today = Local::now().date_naive();
    let rows: Vec<Vec<String>> = context
        .bills
        .list()
        .iter()
        .map(|bill| {
            let due = match bill.days_until_due(today) {
                Some(days) if bill.status != BillStatus::Paid && days < 0 => {
                    format!("{} (overdue)", bill.due)
                }
                _ => bill.due.to_string(),
            };
            vec![
                short_id(bill.id),
                bill.title.clone(),
                bill.subtitle.clone(),
                due,
                context.money(bill.amount),
                bill.status.to_string(),
            ]
        })
        .collect();
    if rows.is_empty() {
        output::info("No bills.");
        return Ok(());
    }
    output::print_table(&["ID", "Bill", "Details", "Due", "Amount", "Status"], &rows);
    Ok(())
}

fn cmd_bill_paid(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [token] = args else {
        return Err(usage_error("bill-paid <id>"));
    };
    let bill = context.resolve_bill(token)?;
    let paid = context.bills.mark_paid(bill.id)?;
    output::success(format!("Bill \"{}\" marked as paid.", paid.title));
    Ok(())
}

fn cmd_bill_amount(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [token, raw_amount] = args else {
        return Err(usage_error(AMOUNT_USAGE));
    };
    let bill = context.resolve_bill(token)?;
    let amount = parse_amount_arg(raw_amount, &context.config.currency_symbol)?;
    let previous = bill.amount;
    let updated = context.bills.update_amount(bill.id, amount)?;
    output::success(format!(
        "Bill \"{}\" now {} (was {}).",
        updated.title,
        context.money(updated.amount),
        context.money(previous)
    ));
    Ok(())
}
