mod common;

use std::path::Path;

use assert_cmd::Command;
use common::{quiet_config, temp_base_dir};
use predicates::prelude::*;
use predicates::str::contains;
use shared_expenses::config::ConfigManager;

fn shell(base: &Path, input: &str) -> assert_cmd::assert::Assert {
    Command::cargo_bin("shared_expenses_cli")
        .unwrap()
        .env("SHARED_EXPENSES_CLI_SCRIPT", "1")
        .env("SHARED_EXPENSES_HOME", base)
        .env("NO_COLOR", "1")
        .write_stdin(input.to_string())
        .assert()
}

fn quiet_home() -> std::path::PathBuf {
    let base = temp_base_dir();
    let manager = ConfigManager::with_base_dir(base.clone()).unwrap();
    manager.save(&quiet_config(&base)).unwrap();
    base
}

#[test]
fn script_mode_records_expenses_and_reports_balances() {
    let base = quiet_home();
    let input = "add 2025-01-01 Rent Housing 1200 Samarth\n\
                 add 2025-01-02 Groceries Groceries 400 prachi\n\
                 totals\n\
                 exit\n";

    shell(&base, input)
        .success()
        .stdout(contains("Added \"Rent\" ($1200.00) paid by Samarth"))
        .stdout(contains("Total expenses: $1600.00"))
        .stdout(contains("Share per person: $800.00"))
        .stdout(contains("Samarth balance: +$400.00"))
        .stdout(contains("Prachi balance: -$400.00"));

    let json = std::fs::read_to_string(base.join("expenses.json")).unwrap();
    assert!(json.contains("\"Groceries\""));
}

#[test]
fn notifications_follow_each_mutation() {
    let base = quiet_home();
    let input = "add 2025-03-01 \"Movie Tickets\" Entertainment 28 Prachi\n\
                 notifications\n\
                 read-all\n\
                 notifications expense_added\n";

    shell(&base, input)
        .success()
        .stdout(contains("Notifications (1 unread)"))
        .stdout(contains("New expense \"Movie Tickets\" ($28.00) added"))
        .stdout(contains("Marked 1 notification(s) as read."))
        .stdout(contains("Notifications (0 unread)"));
}

#[test]
fn invalid_input_is_reported_and_the_shell_continues() {
    let base = quiet_home();
    let input = "add 2025-01-01 Rent Yachts 10 Samarth\n\
                 delete deadbeef\n\
                 totls\n\
                 list\n";

    shell(&base, input)
        .success()
        .stdout(contains("unknown category `Yachts`"))
        .stdout(contains("No expense matches `deadbeef`."))
        .stdout(contains("Suggestion: `totals`?"))
        .stdout(contains("No expenses recorded."));
}

#[test]
fn bills_can_be_paid_and_repriced_by_id_prefix() {
    let base = quiet_home();
    let input = "bills\n\
                 bill-paid b1110003\n\
                 bill-amount b1110002 120.50\n\
                 notifications bill_updated\n";

    shell(&base, input)
        .success()
        .stdout(contains("Rent Payment").and(contains("due soon")))
        .stdout(contains("Bill \"Wi-Fi Internet\" marked as paid."))
        .stdout(contains("Bill \"Electricity + Gas\" now $120.50 (was $100.00)."))
        .stdout(contains("Bill \"Wi-Fi Internet\" ($30.00) marked as paid"));
}

#[test]
fn init_db_moves_the_session_into_sqlite() {
    let base = quiet_home();
    let input = "add 2025-01-01 Rent Housing 1200 Samarth\n\
                 init-db\n\
                 list\n";

    shell(&base, input)
        .success()
        .stdout(contains("Copied 1 expense(s) into the database."))
        .stdout(contains("now using the sqlite store"))
        .stdout(contains("1 expense(s)."));
    assert!(base.join("expenses.sqlite3").exists());

    shell(&base, "list\n")
        .success()
        .stdout(contains("Rent"))
        .stdout(contains("$1200.00"));
}
