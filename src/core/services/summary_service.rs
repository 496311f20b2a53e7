use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::domain::{Expense, Payer};

/// Total spent in one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
    pub count: usize,
}

/// Spending for one calendar month split by payer.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyBreakdown {
    pub year: i32,
    pub month: u32,
    /// Short label such as `Aug 2025`.
    pub label: String,
    pub samarth: f64,
    pub prachi: f64,
    pub unattributed: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PayerTotal {
    pub payer: Payer,
    pub amount: f64,
    pub count: usize,
}

/// Criteria for [`SummaryService::filter`]; unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    /// Case-insensitive substring of the name or category.
    pub search: Option<String>,
    pub category: Option<String>,
    pub payer: Option<Payer>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl ExpenseFilter {
    fn matches(&self, expense: &Expense, needle: Option<&str>) -> bool {
        if let Some(needle) = needle {
            let hit = expense.name.to_lowercase().contains(needle)
                || expense.category.to_lowercase().contains(needle);
            if !hit {
                return false;
            }
        }
        if let Some(category) = self.category.as_deref() {
            if !expense.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        self.payer.map_or(true, |payer| expense.paid_by == payer)
            && self.year.map_or(true, |year| expense.date.year() == year)
            && self.month.map_or(true, |month| expense.date.month() == month)
    }
}

/// Read-only aggregations over an expense snapshot.
pub struct SummaryService;

impl SummaryService {
    /// Category totals, largest first; equal amounts ordered by name.
    pub fn by_category(expenses: &[Expense]) -> Vec<CategoryTotal> {
        let mut grouped: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
        for expense in expenses {
            let entry = grouped.entry(expense.category.as_str()).or_default();
            entry.0 += expense.amount;
            entry.1 += 1;
        }
        let mut totals: Vec<CategoryTotal> = grouped
            .into_iter()
            .map(|(category, (amount, count))| CategoryTotal {
                category: category.to_string(),
                amount,
                count,
            })
            .collect();
        totals.sort_by(|a, b| {
            b.amount
                .total_cmp(&a.amount)
                .then_with(|| a.category.cmp(&b.category))
        });
        totals
    }

    /// One row per month with spending, oldest first.
    pub fn by_month(expenses: &[Expense]) -> Vec<MonthlyBreakdown> {
        let mut grouped: BTreeMap<(i32, u32), MonthlyBreakdown> = BTreeMap::new();
        for expense in expenses {
            let key = (expense.date.year(), expense.date.month());
            let row = grouped
                .entry(key)
                .or_insert_with(|| MonthlyBreakdown {
                    year: key.0,
                    month: key.1,
                    label: month_label(expense.date),
                    samarth: 0.0,
                    prachi: 0.0,
                    unattributed: 0.0,
                    total: 0.0,
                });
            match expense.paid_by {
                Payer::Samarth => row.samarth += expense.amount,
                Payer::Prachi => row.prachi += expense.amount,
                Payer::User => row.unattributed += expense.amount,
            }
            row.total += expense.amount;
        }
        grouped.into_values().collect()
    }

    /// Totals for every payer, including those with nothing recorded.
    pub fn by_payer(expenses: &[Expense]) -> Vec<PayerTotal> {
        Payer::ALL
            .into_iter()
            .map(|payer| {
                let (amount, count) = expenses
                    .iter()
                    .filter(|expense| expense.paid_by == payer)
                    .fold((0.0, 0), |(sum, n), expense| (sum + expense.amount, n + 1));
                PayerTotal {
                    payer,
                    amount,
                    count,
                }
            })
            .collect()
    }

    /// Expenses matching `filter`, in their original order.
    pub fn filter(expenses: &[Expense], filter: &ExpenseFilter) -> Vec<Expense> {
        let needle = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase);
        expenses
            .iter()
            .filter(|expense| filter.matches(expense, needle.as_deref()))
            .cloned()
            .collect()
    }
}

fn month_label(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}
