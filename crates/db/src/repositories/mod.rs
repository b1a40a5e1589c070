//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Multi-step writes receive an explicit transaction object;
//! there is no ambient shared client.

pub mod account;
pub mod analytic;
pub mod document;
pub mod journal;
pub mod payment;

pub use account::{AccountError, AccountRepository};
pub use analytic::{AnalyticError, AnalyticRepository};
pub use document::{CreateDocumentInput, DocumentError, DocumentRepository, DocumentWithLines};
pub use journal::{
    BackfillFailure, BackfillReport, JournalRepository, PostingCapabilities, PostingError,
};
pub use payment::{PaymentError, PaymentRepository, PaymentWithAllocations};
