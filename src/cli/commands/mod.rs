pub mod bill;
pub mod expense;
pub mod notification;
pub mod report;
pub mod system;

use chrono::NaiveDate;

use crate::cli::core::CommandError;
use crate::cli::registry::CommandEntry;
use crate::currency::parse_amount;
use crate::domain::Payer;

pub(crate) fn all() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(expense::definitions());
    commands.extend(report::definitions());
    commands.extend(notification::definitions());
    commands.extend(bill::definitions());
    commands.extend(system::definitions());
    commands
}

pub(crate) fn parse_date_arg(raw: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{raw}` (expected YYYY-MM-DD)"))
    })
}

pub(crate) fn parse_amount_arg(raw: &str, symbol: &str) -> Result<f64, CommandError> {
    parse_amount(raw, symbol)
        .ok_or_else(|| CommandError::InvalidArguments(format!("invalid amount `{raw}`")))
}

pub(crate) fn parse_payer_arg(raw: &str) -> Result<Payer, CommandError> {
    raw.parse::<Payer>().map_err(CommandError::InvalidArguments)
}

pub(crate) fn usage_error(usage: &str) -> CommandError {
    CommandError::InvalidArguments(format!("usage: {usage}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_names_are_unique() {
        let mut names: Vec<_> = all().into_iter().map(|entry| entry.name).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn argument_parsers_reject_garbage() {
        assert!(parse_date_arg("2025-02-30").is_err());
        assert_eq!(parse_amount_arg("$1,200.50", "$").unwrap(), 1200.5);
        assert!(parse_amount_arg("twelve", "$").is_err());
        assert_eq!(parse_payer_arg("samarth").unwrap(), Payer::Samarth);
    }
}
