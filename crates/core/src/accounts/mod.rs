//! Chart-of-accounts defaults and account typing.
//!
//! The five canonical default accounts (cash, receivable, payable,
//! revenue, expense) are defined here; the persistence layer upserts
//! them per company on first use.

pub mod types;

pub use types::{AccountSet, AccountType, DefaultAccountKind};
