use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::core::services::SummaryService;
use crate::currency::format_signed;
use crate::domain::Payer;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "totals",
            "Show the household total, each share and balance",
            "totals",
            cmd_totals,
        ),
        CommandEntry::new(
            "categories",
            "Show spending per category",
            "categories",
            cmd_categories,
        ),
        CommandEntry::new(
            "monthly",
            "Show spending per month split by payer",
            "monthly",
            cmd_monthly,
        ),
    ]
}

fn cmd_totals(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let totals = context.ledger.compute_totals();
    let symbol = context.config.currency_symbol.clone();
    output::section("Totals");
    output::info(format!("Total expenses: {}", context.money(totals.total_expenses)));
    output::info(format!("Share per person: {}", context.money(totals.share_amount)));
    for payer in Payer::ALL {
        output::info(format!(
            "{} paid: {}",
            label(payer),
            context.money(totals.subtotal(payer))
        ));
    }
    for payer in Payer::TRACKED {
        if let Some(balance) = totals.balance(payer) {
            output::info(format!(
                "{payer} balance: {}",
                format_signed(balance, &symbol)
            ));
        }
    }
    Ok(())
}

fn cmd_categories(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let expenses = context.ledger.list();
    let totals = SummaryService::by_category(&expenses);
    if totals.is_empty() {
        output::info("No expenses recorded.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = totals
        .iter()
        .map(|total| {
            vec![
                total.category.clone(),
                total.count.to_string(),
                context.money(total.amount),
            ]
        })
        .collect();
    output::print_table(&["Category", "Count", "Amount"], &rows);
    Ok(())
}

fn cmd_monthly(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let expenses = context.ledger.list();
    let months = SummaryService::by_month(&expenses);
    if months.is_empty() {
        output::info("No expenses recorded.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = months
        .iter()
        .map(|month| {
            vec![
                month.label.clone(),
                context.money(month.samarth),
                context.money(month.prachi),
                context.money(month.unattributed),
                context.money(month.total),
            ]
        })
        .collect();
    output::print_table(
        &["Month", "Samarth", "Prachi", "Unattributed", "Total"],
        &rows,
    );
    Ok(())
}

fn label(payer: Payer) -> &'static str {
    if payer.is_tracked() {
        payer.as_str()
    } else {
        "Unattributed"
    }
}
