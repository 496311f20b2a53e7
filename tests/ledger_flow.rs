mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::{expense, memory_ledger};
use shared_expenses::{
    domain::{ExpenseStatus, ExpenseUpdate, NotificationKind, Payer},
    LedgerError,
};
use uuid::Uuid;

#[test]
fn two_person_split_scenario() {
    let (mut ledger, log) = memory_ledger();

    let rent = ledger
        .add(expense("Rent", "Housing", 1200.0, Payer::Samarth))
        .expect("add rent");
    assert_eq!(ledger.len(), 1);
    assert_eq!(rent.status, ExpenseStatus::Paid);

    let totals = ledger.compute_totals();
    assert_eq!(totals.total_expenses, 1200.0);
    assert_eq!(totals.share_amount, 600.0);
    assert_eq!(totals.samarth_balance, 600.0);
    assert_eq!(totals.prachi_balance, -600.0);

    ledger
        .add(expense("Groceries", "Groceries", 400.0, Payer::Prachi))
        .expect("add groceries");
    let totals = ledger.compute_totals();
    assert_eq!(totals.total_expenses, 1600.0);
    assert_eq!(totals.share_amount, 800.0);
    assert_eq!(totals.samarth_balance, 400.0);
    assert_eq!(totals.prachi_balance, -400.0);
    assert_eq!(totals.samarth_balance + totals.prachi_balance, 0.0);

    let kinds: Vec<_> = log.list().into_iter().map(|n| n.kind).collect();
    assert_eq!(
        kinds,
        [NotificationKind::ExpenseAdded, NotificationKind::ExpenseAdded]
    );
    assert_eq!(log.unread_count(), 2);
}

#[test]
fn edit_then_delete_keeps_notification_history() {
    let (mut ledger, log) = memory_ledger();
    let rent = ledger
        .add(expense("Rent", "Housing", 100.0, Payer::Samarth))
        .unwrap();

    ledger
        .update(rent.id, ExpenseUpdate::new().amount(150.0).paid_by(Payer::Prachi))
        .unwrap();
    let removed = ledger.delete(rent.id).unwrap();
    assert_eq!(removed.amount, 150.0);
    assert_eq!(removed.paid_by, Payer::Prachi);
    assert!(ledger.get(rent.id).is_none());

    let messages: Vec<_> = log.list().into_iter().map(|n| n.message).collect();
    assert_eq!(
        messages,
        [
            "Expense \"Rent\" ($150.00) deleted",
            "Expense \"Rent\" updated from $100.00 to $150.00",
            "New expense \"Rent\" ($100.00) added",
        ]
    );
}

#[test]
fn failed_mutations_have_no_side_effects() {
    let (mut ledger, log) = memory_ledger();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let _subscription = ledger.subscribe(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let missing = Uuid::new_v4();
    assert!(matches!(ledger.delete(missing), Err(LedgerError::NotFound(id)) if id == missing));
    assert!(matches!(
        ledger.update(missing, ExpenseUpdate::new().name("x")),
        Err(LedgerError::NotFound(_))
    ));
    assert!(matches!(
        ledger.add(expense("", "Housing", 1.0, Payer::User)),
        Err(LedgerError::Validation(_))
    ));

    assert!(ledger.is_empty());
    assert!(log.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn unattributed_spending_counts_toward_the_total_only() {
    let (mut ledger, _log) = memory_ledger();
    ledger
        .add(expense("Rent", "Housing", 1000.0, Payer::Samarth))
        .unwrap();
    ledger
        .add(expense("Utilities", "Household utilities", 200.0, Payer::User))
        .unwrap();

    let totals = ledger.compute_totals();
    assert_eq!(totals.share_amount, 600.0);
    assert_eq!(totals.unattributed_total, 200.0);
    assert_eq!(totals.samarth_balance, 400.0);
    assert_eq!(totals.prachi_balance, -600.0);
    assert_eq!(
        totals.samarth_balance + totals.prachi_balance,
        totals.samarth_total + totals.prachi_total - totals.total_expenses
    );
}
