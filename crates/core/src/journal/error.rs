//! Journal construction error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while building a journal entry.
#[derive(Debug, Error)]
pub enum JournalError {
    /// Debits and credits do not sum to the same total.
    #[error("Journal entry is not balanced. Debit: {debit}, Credit: {credit}")]
    Unbalanced {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// A line carries an amount on both sides, on neither, or a negative one.
    #[error("Journal line must carry a positive amount on exactly one side")]
    InvalidLineAmounts,

    /// An order posting was requested for a non-order document type.
    #[error("Document type {0} cannot be posted as an order")]
    NotAnOrder(String),
}
