//! Stateful services: the expense ledger, the notification log, bills and
//! read-only summaries.

pub mod bills;
pub mod expense_ledger;
pub mod notification_log;
pub mod services;
pub mod subscribers;

pub use bills::BillBook;
pub use expense_ledger::{ExpenseLedger, LedgerOptions, Totals};
pub use notification_log::{NotificationLog, NotificationQuery, SortOrder};
pub use subscribers::{Listeners, Subscription};
