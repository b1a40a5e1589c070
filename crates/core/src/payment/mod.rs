//! Payment allocation rules.
//!
//! Validates allocation sets against the payment amount and against each
//! target's remaining balance, and recomputes derived paid amounts. The
//! db crate applies these rules inside the payment-creation transaction.

pub mod error;
pub mod service;
pub mod types;

pub use error::AllocationError;
pub use service::PaymentService;
pub use types::{
    AllocationInput, AllocationTargetType, CreatePaymentInput, PaymentDirection, PaymentStatus,
};
