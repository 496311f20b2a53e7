//! Fixed demo dataset used to seed an empty store.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::{Expense, ExpenseStatus, Payer};

/// `(year, month, day, name, category, amount)`; every row is unattributed.
pub const DEMO_ROWS: [(i32, u32, u32, &str, &str, f64); 24] = [
    (2025, 8, 1, "Rent", "Housing", 1200.0),
    (2025, 8, 3, "Electricity Bill", "Housing", 85.0),
    (2025, 8, 5, "WiFi Bill", "Housing", 60.0),
    (2025, 8, 7, "Gas Bill", "Housing", 45.0),
    (2025, 8, 10, "Groceries", "Groceries", 120.0),
    (2025, 8, 12, "Pizza Night", "Take out food", 35.0),
    (2025, 8, 15, "Cleaning Supplies", "Household utilities", 25.0),
    (2025, 8, 18, "Uber Ride", "Transportation", 18.0),
    (2025, 8, 20, "Movie Tickets", "Entertainment", 28.0),
    (2025, 8, 22, "Groceries", "Groceries", 95.0),
    (2025, 8, 25, "Chinese Takeout", "Take out food", 42.0),
    (2025, 8, 28, "Laundry Detergent", "Household utilities", 15.0),
    (2025, 9, 1, "Rent", "Housing", 1200.0),
    (2025, 9, 3, "Electricity Bill", "Housing", 92.0),
    (2025, 9, 5, "WiFi Bill", "Housing", 60.0),
    (2025, 9, 8, "Gas Bill", "Housing", 38.0),
    (2025, 9, 10, "Weekly Groceries", "Groceries", 135.0),
    (2025, 9, 12, "Sushi Dinner", "Take out food", 65.0),
    (2025, 9, 15, "Toilet Paper & Tissues", "Household utilities", 22.0),
    (2025, 9, 17, "Gas Station", "Transportation", 45.0),
    (2025, 9, 20, "Concert Tickets", "Entertainment", 85.0),
    (2025, 9, 22, "Groceries", "Groceries", 110.0),
    (2025, 9, 25, "Thai Food", "Take out food", 38.0),
    (2025, 9, 28, "Dish Soap & Sponges", "Household utilities", 12.0),
];

/// Materializes [`DEMO_ROWS`] as expenses stamped with `now`.
pub fn demo_expenses(now: DateTime<Utc>) -> Vec<Expense> {
    DEMO_ROWS
        .iter()
        .filter_map(|&(year, month, day, name, category, amount)| {
            let date = NaiveDate::from_ymd_opt(year, month, day)?;
            Some(Expense {
                id: Uuid::new_v4(),
                date,
                name: name.to_string(),
                category: category.to_string(),
                amount,
                paid_by: Payer::User,
                status: ExpenseStatus::Paid,
                created_at: now,
                updated_at: now,
            })
        })
        .collect()
}
