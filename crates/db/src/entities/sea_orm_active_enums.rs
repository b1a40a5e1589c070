//! Database enum mappings.
//!
//! Each enum mirrors a PostgreSQL enum type created by the initial
//! migration, with `From` conversions to and from the core domain enums.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use tectona_core::accounts::AccountType as CoreAccountType;
use tectona_core::analytic::DocType as CoreDocType;
use tectona_core::document::{DocumentStatus as CoreDocumentStatus, PaymentState as CorePaymentState};
use tectona_core::journal::{JournalSourceType as CoreSourceType, JournalStatus as CoreJournalStatus};
use tectona_core::payment::{
    AllocationTargetType as CoreAllocationTargetType, PaymentDirection as CorePaymentDirection,
    PaymentStatus as CorePaymentStatus,
};

/// General-ledger account classification.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Asset account.
    #[sea_orm(string_value = "asset")]
    Asset,
    /// Liability account.
    #[sea_orm(string_value = "liability")]
    Liability,
    /// Income account.
    #[sea_orm(string_value = "income")]
    Income,
    /// Expense account.
    #[sea_orm(string_value = "expense")]
    Expense,
}

/// Commercial document classification.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "doc_type")]
#[serde(rename_all = "snake_case")]
pub enum DocType {
    /// Sales order.
    #[sea_orm(string_value = "sales_order")]
    SalesOrder,
    /// Purchase order.
    #[sea_orm(string_value = "purchase_order")]
    PurchaseOrder,
    /// Customer invoice.
    #[sea_orm(string_value = "customer_invoice")]
    CustomerInvoice,
    /// Vendor bill.
    #[sea_orm(string_value = "vendor_bill")]
    VendorBill,
}

/// Document lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "document_status")]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Draft, editable.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Posted/confirmed, journaled once.
    #[sea_orm(string_value = "posted")]
    Posted,
    /// Cancelled, never reversed in the ledger.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Derived payment progress.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_state")]
#[serde(rename_all = "snake_case")]
pub enum PaymentState {
    /// Nothing allocated yet.
    #[sea_orm(string_value = "not_paid")]
    NotPaid,
    /// Partially covered.
    #[sea_orm(string_value = "partially_paid")]
    PartiallyPaid,
    /// Fully covered.
    #[sea_orm(string_value = "paid")]
    Paid,
}

/// Direction of a payment.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_direction")]
#[serde(rename_all = "lowercase")]
pub enum PaymentDirection {
    /// Money received.
    #[sea_orm(string_value = "inbound")]
    Inbound,
    /// Money paid out.
    #[sea_orm(string_value = "outbound")]
    Outbound,
}

/// Payment lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_status")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Draft payment.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Posted payment; its allocations count.
    #[sea_orm(string_value = "posted")]
    Posted,
    /// Voided payment.
    #[sea_orm(string_value = "void")]
    Void,
}

/// What kind of document a payment allocation targets.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "allocation_target_type")]
#[serde(rename_all = "snake_case")]
pub enum AllocationTargetType {
    /// Customer invoice.
    #[sea_orm(string_value = "customer_invoice")]
    CustomerInvoice,
    /// Vendor bill.
    #[sea_orm(string_value = "vendor_bill")]
    VendorBill,
}

/// Journal entry lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "journal_status")]
#[serde(rename_all = "lowercase")]
pub enum JournalStatus {
    /// Draft entry.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Posted entry.
    #[sea_orm(string_value = "posted")]
    Posted,
}

/// Source document type of a journal entry.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "journal_source_type")]
#[serde(rename_all = "snake_case")]
pub enum JournalSourceType {
    /// Hand-written or fallback entry.
    #[sea_orm(string_value = "manual")]
    Manual,
    /// Customer invoice.
    #[sea_orm(string_value = "customer_invoice")]
    CustomerInvoice,
    /// Vendor bill.
    #[sea_orm(string_value = "vendor_bill")]
    VendorBill,
    /// Payment.
    #[sea_orm(string_value = "payment")]
    Payment,
    /// Sales order.
    #[sea_orm(string_value = "sales_order")]
    SalesOrder,
    /// Purchase order.
    #[sea_orm(string_value = "purchase_order")]
    PurchaseOrder,
}

// ============================================================================
// Conversions between db enums and core domain enums
// ============================================================================

impl From<CoreAccountType> for AccountType {
    fn from(value: CoreAccountType) -> Self {
        match value {
            CoreAccountType::Asset => Self::Asset,
            CoreAccountType::Liability => Self::Liability,
            CoreAccountType::Income => Self::Income,
            CoreAccountType::Expense => Self::Expense,
        }
    }
}

impl From<AccountType> for CoreAccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Income => Self::Income,
            AccountType::Expense => Self::Expense,
        }
    }
}

impl From<CoreDocType> for DocType {
    fn from(value: CoreDocType) -> Self {
        match value {
            CoreDocType::SalesOrder => Self::SalesOrder,
            CoreDocType::PurchaseOrder => Self::PurchaseOrder,
            CoreDocType::CustomerInvoice => Self::CustomerInvoice,
            CoreDocType::VendorBill => Self::VendorBill,
        }
    }
}

impl From<DocType> for CoreDocType {
    fn from(value: DocType) -> Self {
        match value {
            DocType::SalesOrder => Self::SalesOrder,
            DocType::PurchaseOrder => Self::PurchaseOrder,
            DocType::CustomerInvoice => Self::CustomerInvoice,
            DocType::VendorBill => Self::VendorBill,
        }
    }
}

impl From<CoreDocumentStatus> for DocumentStatus {
    fn from(value: CoreDocumentStatus) -> Self {
        match value {
            CoreDocumentStatus::Draft => Self::Draft,
            CoreDocumentStatus::Posted => Self::Posted,
            CoreDocumentStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<DocumentStatus> for CoreDocumentStatus {
    fn from(value: DocumentStatus) -> Self {
        match value {
            DocumentStatus::Draft => Self::Draft,
            DocumentStatus::Posted => Self::Posted,
            DocumentStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<CorePaymentState> for PaymentState {
    fn from(value: CorePaymentState) -> Self {
        match value {
            CorePaymentState::NotPaid => Self::NotPaid,
            CorePaymentState::PartiallyPaid => Self::PartiallyPaid,
            CorePaymentState::Paid => Self::Paid,
        }
    }
}

impl From<PaymentState> for CorePaymentState {
    fn from(value: PaymentState) -> Self {
        match value {
            PaymentState::NotPaid => Self::NotPaid,
            PaymentState::PartiallyPaid => Self::PartiallyPaid,
            PaymentState::Paid => Self::Paid,
        }
    }
}

impl From<CorePaymentDirection> for PaymentDirection {
    fn from(value: CorePaymentDirection) -> Self {
        match value {
            CorePaymentDirection::Inbound => Self::Inbound,
            CorePaymentDirection::Outbound => Self::Outbound,
        }
    }
}

impl From<PaymentDirection> for CorePaymentDirection {
    fn from(value: PaymentDirection) -> Self {
        match value {
            PaymentDirection::Inbound => Self::Inbound,
            PaymentDirection::Outbound => Self::Outbound,
        }
    }
}

impl From<CorePaymentStatus> for PaymentStatus {
    fn from(value: CorePaymentStatus) -> Self {
        match value {
            CorePaymentStatus::Draft => Self::Draft,
            CorePaymentStatus::Posted => Self::Posted,
            CorePaymentStatus::Void => Self::Void,
        }
    }
}

impl From<PaymentStatus> for CorePaymentStatus {
    fn from(value: PaymentStatus) -> Self {
        match value {
            PaymentStatus::Draft => Self::Draft,
            PaymentStatus::Posted => Self::Posted,
            PaymentStatus::Void => Self::Void,
        }
    }
}

impl From<CoreAllocationTargetType> for AllocationTargetType {
    fn from(value: CoreAllocationTargetType) -> Self {
        match value {
            CoreAllocationTargetType::CustomerInvoice => Self::CustomerInvoice,
            CoreAllocationTargetType::VendorBill => Self::VendorBill,
        }
    }
}

impl From<AllocationTargetType> for CoreAllocationTargetType {
    fn from(value: AllocationTargetType) -> Self {
        match value {
            AllocationTargetType::CustomerInvoice => Self::CustomerInvoice,
            AllocationTargetType::VendorBill => Self::VendorBill,
        }
    }
}

impl From<CoreJournalStatus> for JournalStatus {
    fn from(value: CoreJournalStatus) -> Self {
        match value {
            CoreJournalStatus::Draft => Self::Draft,
            CoreJournalStatus::Posted => Self::Posted,
        }
    }
}

impl From<CoreSourceType> for JournalSourceType {
    fn from(value: CoreSourceType) -> Self {
        match value {
            CoreSourceType::Manual => Self::Manual,
            CoreSourceType::CustomerInvoice => Self::CustomerInvoice,
            CoreSourceType::VendorBill => Self::VendorBill,
            CoreSourceType::Payment => Self::Payment,
            CoreSourceType::SalesOrder => Self::SalesOrder,
            CoreSourceType::PurchaseOrder => Self::PurchaseOrder,
        }
    }
}

impl From<JournalSourceType> for CoreSourceType {
    fn from(value: JournalSourceType) -> Self {
        match value {
            JournalSourceType::Manual => Self::Manual,
            JournalSourceType::CustomerInvoice => Self::CustomerInvoice,
            JournalSourceType::VendorBill => Self::VendorBill,
            JournalSourceType::Payment => Self::Payment,
            JournalSourceType::SalesOrder => Self::SalesOrder,
            JournalSourceType::PurchaseOrder => Self::PurchaseOrder,
        }
    }
}
