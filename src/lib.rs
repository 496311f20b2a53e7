#![doc(test(attr(deny(warnings))))]

//! Shared Expenses tracks what a two-person household spends, who paid for
//! it and how far each person is from an even split.
//!
//! The [`core::ExpenseLedger`] owns the expense list and writes every change
//! through to an [`storage::ExpenseStore`]; each successful change lands in the
//! shared [`core::NotificationLog`] and is announced to subscribers.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

pub use errors::{LedgerError, Result};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Shared expenses tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
