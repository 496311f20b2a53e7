//! Recurring household bills and their payment state.

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::core::notification_log::NotificationLog;
use crate::core::subscribers::{Listeners, Subscription};
use crate::currency::{format_amount, DEFAULT_SYMBOL};
use crate::domain::{Bill, BillDue, BillStatus, NotificationKind};
use crate::errors::{LedgerError, Result};

/// The bills a new household starts with. Their ids are fixed so a bill can be
/// referred to by the same id prefix in every session.
pub fn default_bills() -> Vec<Bill> {
    let due = |month, day| NaiveDate::from_ymd_opt(2025, month, day).map(BillDue::On);
    let mut bills = Vec::new();
    if let Some(date) = due(1, 1) {
        bills.push(
            Bill::new("Rent Payment", "Monthly apartment rent", date, 1845.0)
                .with_id(default_bill_id(1))
                .with_status(BillStatus::DueSoon),
        );
    }
    if let Some(date) = due(1, 5) {
        bills.push(
            Bill::new("Electricity + Gas", "Monthly utility bill", date, 100.0)
                .with_id(default_bill_id(2)),
        );
    }
    if let Some(date) = due(1, 3) {
        bills.push(
            Bill::new("Wi-Fi Internet", "Monthly internet service", date, 30.0)
                .with_id(default_bill_id(3)),
        );
    }
    bills.push(
        Bill::new(
            "Groceries Budget",
            "Weekly grocery shopping",
            BillDue::Weekly,
            100.0,
        )
        .with_id(default_bill_id(4)),
    );
    bills
}

/// Fixed id whose leading group differs per bill, so 8-char prefixes are unique.
fn default_bill_id(n: u128) -> Uuid {
    Uuid::from_u128(0xb111_0000_0000_4000_8000_0000_0000_0000 | (n << 96) | n)
}

/// Bill list that reports every change to the shared notification log.
pub struct BillBook {
    bills: Vec<Bill>,
    notifications: Arc<NotificationLog>,
    listeners: Listeners,
    currency_symbol: String,
}

impl BillBook {
    pub fn with_default_bills(notifications: Arc<NotificationLog>) -> Self {
        Self::with_bills(default_bills(), notifications)
    }

    pub fn with_bills(bills: Vec<Bill>, notifications: Arc<NotificationLog>) -> Self {
        Self {
            bills,
            notifications,
            listeners: Listeners::new(),
            currency_symbol: DEFAULT_SYMBOL.to_string(),
        }
    }

    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    pub fn list(&self) -> Vec<Bill> {
        self.bills.clone()
    }

    pub fn get(&self, id: Uuid) -> Option<Bill> {
        self.bills.iter().find(|bill| bill.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.bills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bills.is_empty()
    }

    pub fn mark_paid(&mut self, id: Uuid) -> Result<Bill> {
        let bill = self.bill_mut(id)?;
        bill.status = BillStatus::Paid;
        let bill = bill.clone();
        tracing::info!(id = %id, "bill marked as paid");
        let message = format!(
            "Bill \"{}\" ({}) marked as paid",
            bill.title,
            format_amount(bill.amount, &self.currency_symbol)
        );
        self.notifications.add(message, NotificationKind::BillUpdated);
        self.listeners.notify();
        Ok(bill)
    }

    pub fn update_amount(&mut self, id: Uuid, amount: f64) -> Result<Bill> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(LedgerError::validation(
                "bill amount must be a finite, non-negative number",
            ));
        }
        let bill = self.bill_mut(id)?;
        let previous = bill.amount;
        bill.amount = amount;
        let bill = bill.clone();
        tracing::info!(id = %id, previous, amount, "bill amount updated");
        let message = format!(
            "Bill \"{}\" amount updated from {} to {}",
            bill.title,
            format_amount(previous, &self.currency_symbol),
            format_amount(amount, &self.currency_symbol)
        );
        self.notifications.add(message, NotificationKind::BillUpdated);
        self.listeners.notify();
        Ok(bill)
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.listeners.subscribe(callback)
    }

    fn bill_mut(&mut self, id: Uuid) -> Result<&mut Bill> {
        self.bills
            .iter_mut()
            .find(|bill| bill.id == id)
            .ok_or(LedgerError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> (BillBook, Arc<NotificationLog>) {
        let log = NotificationLog::shared();
        (BillBook::with_default_bills(Arc::clone(&log)), log)
    }

    fn find(book: &BillBook, title: &str) -> Bill {
        book.list()
            .into_iter()
            .find(|bill| bill.title == title)
            .expect("default bill")
    }

    #[test]
    fn default_bills_are_seeded() {
        let (book, _log) = book();
        assert_eq!(book.len(), 4);
        let rent = find(&book, "Rent Payment");
        assert_eq!(rent.amount, 1845.0);
        assert_eq!(rent.status, BillStatus::DueSoon);
        assert_eq!(find(&book, "Groceries Budget").due, BillDue::Weekly);
    }

    #[test]
    fn default_bill_subtitles() {
        let subtitles: Vec<(String, String)> = default_bills()
            .into_iter()
            .map(|bill| (bill.title, bill.subtitle))
            .collect();
        let expected = [
            ("Rent Payment", "Monthly apartment rent"),
            ("Electricity + Gas", "Monthly utility bill"),
            ("Wi-Fi Internet", "Monthly internet service"),
            ("Groceries Budget", "Weekly grocery shopping"),
        ];
        for (title, subtitle) in expected {
            assert!(
                subtitles.iter().any(|(t, s)| t == title && s == subtitle),
                "{title} should read `{subtitle}`"
            );
        }
    }

    #[test]
    fn default_bill_ids_are_stable_and_distinct() {
        let first: Vec<_> = default_bills().into_iter().map(|bill| bill.id).collect();
        let second: Vec<_> = default_bills().into_iter().map(|bill| bill.id).collect();
        assert_eq!(first, second);
        assert_eq!(first[2].to_string(), "b1110003-0000-4000-8000-000000000003");
    }

    #[test]
    fn mark_paid_emits_bill_updated() {
        let (mut book, log) = book();
        let wifi = find(&book, "Wi-Fi Internet");
        let paid = book.mark_paid(wifi.id).unwrap();
        assert_eq!(paid.status, BillStatus::Paid);
        let entries = log.list();
        assert_eq!(entries[0].kind, NotificationKind::BillUpdated);
        assert_eq!(entries[0].message, "Bill \"Wi-Fi Internet\" ($30.00) marked as paid");
    }

    #[test]
    fn update_amount_reports_both_values() {
        let (mut book, log) = book();
        let power = find(&book, "Electricity + Gas");
        book.update_amount(power.id, 120.5).unwrap();
        assert_eq!(book.get(power.id).unwrap().amount, 120.5);
        assert_eq!(
            log.list()[0].message,
            "Bill \"Electricity + Gas\" amount updated from $100.00 to $120.50"
        );
    }

    #[test]
    fn failures_leave_bills_and_log_untouched() {
        let (mut book, log) = book();
        let rent = find(&book, "Rent Payment");
        assert!(matches!(
            book.mark_paid(Uuid::new_v4()),
            Err(LedgerError::NotFound(_))
        ));
        assert!(matches!(
            book.update_amount(rent.id, -5.0),
            Err(LedgerError::Validation(_))
        ));
        assert_eq!(book.get(rent.id).unwrap(), rent);
        assert!(log.is_empty());
    }
}
