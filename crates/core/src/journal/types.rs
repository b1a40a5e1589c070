//! Journal domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tectona_shared::types::{
    AnalyticAccountId, CompanyId, ContactId, DocumentId, GlAccountId, ProductId,
};
use uuid::Uuid;

use super::error::JournalError;

/// Journal entry lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalStatus {
    /// Entry is being drafted.
    Draft,
    /// Entry has been posted (immutable).
    Posted,
}

/// What kind of source document produced a journal entry.
///
/// Together with the company and a non-null source id this forms the
/// idempotency key for posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalSourceType {
    /// Hand-written entry, or the fallback for orders on older schemas.
    Manual,
    /// Posted customer invoice.
    CustomerInvoice,
    /// Posted vendor bill.
    VendorBill,
    /// Posted payment.
    Payment,
    /// Confirmed sales order.
    SalesOrder,
    /// Confirmed purchase order.
    PurchaseOrder,
}

impl JournalSourceType {
    /// Returns the string representation used by the persistence layer.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::CustomerInvoice => "customer_invoice",
            Self::VendorBill => "vendor_bill",
            Self::Payment => "payment",
            Self::SalesOrder => "sales_order",
            Self::PurchaseOrder => "purchase_order",
        }
    }

    /// True for the order source types that older schemas may lack.
    #[must_use]
    pub const fn is_order_source(&self) -> bool {
        matches!(self, Self::SalesOrder | Self::PurchaseOrder)
    }
}

/// The memo prefix identifying an order posted through the manual
/// fallback, used as the secondary idempotency key on schemas whose
/// source-type enum lacks order labels.
#[must_use]
pub fn order_fallback_memo(document_id: DocumentId) -> String {
    format!("order:{document_id}")
}

/// A draft journal line.
///
/// Built through [`JournalLineDraft::debit`] and
/// [`JournalLineDraft::credit`] so a line never starts out with amounts
/// on both sides; [`JournalEntryDraft::validate`] re-checks before
/// anything is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalLineDraft {
    /// The general-ledger account this line posts to.
    pub gl_account_id: GlAccountId,
    /// Debit amount (zero on credit lines).
    pub debit: Decimal,
    /// Credit amount (zero on debit lines).
    pub credit: Decimal,
    /// Analytic account tag, if resolved.
    pub analytic_account_id: Option<AnalyticAccountId>,
    /// Counterparty, where meaningful (receivable/payable lines).
    pub contact_id: Option<ContactId>,
    /// Product, carried through from the source line.
    pub product_id: Option<ProductId>,
    /// Free-form line memo.
    pub memo: Option<String>,
}

impl JournalLineDraft {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(gl_account_id: GlAccountId, amount: Decimal) -> Self {
        Self {
            gl_account_id,
            debit: amount,
            credit: Decimal::ZERO,
            analytic_account_id: None,
            contact_id: None,
            product_id: None,
            memo: None,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(gl_account_id: GlAccountId, amount: Decimal) -> Self {
        Self {
            gl_account_id,
            debit: Decimal::ZERO,
            credit: amount,
            analytic_account_id: None,
            contact_id: None,
            product_id: None,
            memo: None,
        }
    }

    /// Tags the line with an analytic account.
    #[must_use]
    pub fn with_analytic(mut self, analytic_account_id: Option<AnalyticAccountId>) -> Self {
        self.analytic_account_id = analytic_account_id;
        self
    }

    /// Tags the line with a counterparty.
    #[must_use]
    pub fn with_contact(mut self, contact_id: Option<ContactId>) -> Self {
        self.contact_id = contact_id;
        self
    }

    /// Tags the line with a product.
    #[must_use]
    pub fn with_product(mut self, product_id: Option<ProductId>) -> Self {
        self.product_id = product_id;
        self
    }

    /// Attaches a memo to the line.
    #[must_use]
    pub fn with_memo(mut self, memo: Option<String>) -> Self {
        self.memo = memo;
        self
    }

    /// True when exactly one side carries a positive amount.
    #[must_use]
    pub fn is_one_sided(&self) -> bool {
        (self.debit > Decimal::ZERO && self.credit == Decimal::ZERO)
            || (self.credit > Decimal::ZERO && self.debit == Decimal::ZERO)
    }

    /// Returns the signed amount (positive for debit, negative for credit).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.debit - self.credit
    }
}

/// A draft journal entry, ready to persist.
#[derive(Debug, Clone)]
pub struct JournalEntryDraft {
    /// Owning company.
    pub company_id: CompanyId,
    /// Entry date; always the source document's date.
    pub entry_date: NaiveDate,
    /// What produced this entry.
    pub source_type: JournalSourceType,
    /// Source document id; the idempotency key when present.
    pub source_id: Option<Uuid>,
    /// Free-form memo; carries the fallback prefix for manual-source orders.
    pub memo: Option<String>,
    /// The balanced line set.
    pub lines: Vec<JournalLineDraft>,
}

impl JournalEntryDraft {
    /// Total of all debit amounts.
    #[must_use]
    pub fn total_debit(&self) -> Decimal {
        self.lines.iter().map(|l| l.debit).sum()
    }

    /// Total of all credit amounts.
    #[must_use]
    pub fn total_credit(&self) -> Decimal {
        self.lines.iter().map(|l| l.credit).sum()
    }

    /// True when debits equal credits.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.total_debit() == self.total_credit()
    }

    /// Validates the entry before persistence.
    ///
    /// # Errors
    ///
    /// Returns `InvalidLineAmounts` if any line is not strictly one-sided,
    /// or `Unbalanced` if debits and credits differ.
    pub fn validate(&self) -> Result<(), JournalError> {
        for line in &self.lines {
            if !line.is_one_sided() {
                return Err(JournalError::InvalidLineAmounts);
            }
        }

        if !self.is_balanced() {
            return Err(JournalError::Unbalanced {
                debit: self.total_debit(),
                credit: self.total_credit(),
            });
        }

        Ok(())
    }

    /// Rewrites the entry for the manual-source fallback.
    ///
    /// Schemas whose source-type enum lacks order labels store order
    /// entries as `manual` with no source id; the memo prefix then serves
    /// as the secondary idempotency key.
    #[must_use]
    pub fn into_manual_fallback(mut self, document_id: DocumentId) -> Self {
        let prefix = order_fallback_memo(document_id);
        self.source_type = JournalSourceType::Manual;
        self.source_id = None;
        self.memo = match self.memo {
            Some(memo) => Some(format!("{prefix} {memo}")),
            None => Some(prefix),
        };
        self
    }
}
