//! paisa-core: record types and calendar utilities for the paisa SMS engine

pub mod records;
pub mod time;

pub use records::{Category, Subscription, Transaction, TxnKind};
pub use time::{add_one_month, local_date, parse_timezone, resolve_day_month, DateFragment};
