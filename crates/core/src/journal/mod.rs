//! Balanced journal entry construction.
//!
//! Turns commercial documents and payments into draft journal entries
//! with balanced debit/credit line sets. Persistence, the idempotency
//! guard, and the order-source capability fallback live in the db crate.

pub mod builder;
pub mod error;
pub mod types;

pub use builder::{DocumentPosting, JournalBuilder, PaymentPosting, PostingLine};
pub use error::JournalError;
pub use types::{
    order_fallback_memo, JournalEntryDraft, JournalLineDraft, JournalSourceType, JournalStatus,
};
