//! Commercial document arithmetic and payment state.
//!
//! Line totals, header totals, and the derived payment state shared by
//! invoices and bills live here; document persistence is the db crate's
//! concern.

pub mod lines;
pub mod types;

pub use lines::{document_total, line_total};
pub use types::{DocumentLineInput, DocumentStatus, PaymentState};
