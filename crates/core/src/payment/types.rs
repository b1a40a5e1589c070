//! Payment domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tectona_shared::types::{CompanyId, ContactId, Currency, DocumentId};

/// Direction of money movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentDirection {
    /// Money received from a customer.
    Inbound,
    /// Money paid out to a vendor.
    Outbound,
}

/// Payment lifecycle status.
///
/// Only allocations of posted payments count toward a document's paid
/// amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Payment is being drafted.
    Draft,
    /// Payment has been posted and journaled.
    Posted,
    /// Payment has been voided.
    Void,
}

/// What kind of document an allocation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationTargetType {
    /// A customer invoice (inbound payments).
    CustomerInvoice,
    /// A vendor bill (outbound payments).
    VendorBill,
}

impl AllocationTargetType {
    /// Returns the string representation used by the persistence layer.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CustomerInvoice => "customer_invoice",
            Self::VendorBill => "vendor_bill",
        }
    }
}

/// One requested allocation of a payment against a document.
#[derive(Debug, Clone)]
pub struct AllocationInput {
    /// Kind of target document.
    pub target_type: AllocationTargetType,
    /// The invoice or bill being paid down.
    pub target_id: DocumentId,
    /// Portion of the payment applied to this target.
    pub amount: Decimal,
}

/// Input for creating a payment with its allocations.
#[derive(Debug, Clone)]
pub struct CreatePaymentInput {
    /// Owning company.
    pub company_id: CompanyId,
    /// Direction of the payment.
    pub direction: PaymentDirection,
    /// Counterparty.
    pub contact_id: ContactId,
    /// Total payment amount.
    pub amount: Decimal,
    /// Payment currency.
    pub currency: Currency,
    /// Value date of the payment.
    pub payment_date: NaiveDate,
    /// Optional memo.
    pub memo: Option<String>,
    /// Allocations to apply; their sum must not exceed `amount`.
    pub allocations: Vec<AllocationInput>,
}
