//! Domain models shared by the ledger, notification log and storage backends.

pub mod bill;
pub mod common;
pub mod expense;
pub mod notification;

pub use bill::{Bill, BillDue, BillStatus};
pub use common::{Displayable, Identifiable, NamedEntity};
pub use expense::{Expense, ExpenseStatus, ExpenseUpdate, NewExpense, Payer};
pub use notification::{Notification, NotificationKind};
