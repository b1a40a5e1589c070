//! Domain types for analytic account resolution.

use serde::{Deserialize, Serialize};
use tectona_shared::types::{
    AnalyticAccountId, AnalyticModelId, AnalyticRuleId, CategoryId, CompanyId, ContactId,
    ContactTagId, ProductId,
};

/// Commercial document classification.
///
/// Rules are scoped to exactly one document type; a sales-order rule never
/// fires for an invoice even when every predicate would match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocType {
    /// Confirmed sales order.
    SalesOrder,
    /// Confirmed purchase order.
    PurchaseOrder,
    /// Customer invoice.
    CustomerInvoice,
    /// Vendor bill.
    VendorBill,
}

impl DocType {
    /// Returns the string representation used by the persistence layer.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SalesOrder => "sales_order",
            Self::PurchaseOrder => "purchase_order",
            Self::CustomerInvoice => "customer_invoice",
            Self::VendorBill => "vendor_bill",
        }
    }

    /// True for document types on the sales side (revenue treatment).
    #[must_use]
    pub const fn is_sale(&self) -> bool {
        matches!(self, Self::SalesOrder | Self::CustomerInvoice)
    }

    /// True for orders (as opposed to invoices/bills).
    #[must_use]
    pub const fn is_order(&self) -> bool {
        matches!(self, Self::SalesOrder | Self::PurchaseOrder)
    }
}

impl std::str::FromStr for DocType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sales_order" => Ok(Self::SalesOrder),
            "purchase_order" => Ok(Self::PurchaseOrder),
            "customer_invoice" => Ok(Self::CustomerInvoice),
            "vendor_bill" => Ok(Self::VendorBill),
            _ => Err(format!("Unknown document type: {s}")),
        }
    }
}

/// The document context a resolution runs against.
#[derive(Debug, Clone)]
pub struct AnalyticContext {
    /// The company whose rules apply.
    pub company_id: CompanyId,
    /// Document type being processed.
    pub doc_type: DocType,
    /// Product on the line, if any.
    pub product_id: Option<ProductId>,
    /// Product category, if known.
    pub category_id: Option<CategoryId>,
    /// Counterparty contact, if any.
    pub contact_id: Option<ContactId>,
    /// Tags carried by the contact (empty when there is no contact).
    pub contact_tag_ids: Vec<ContactTagId>,
}

/// A single matching rule within a model.
///
/// Predicates that are `None` are unset and do not participate in
/// matching. A rule with all predicates unset never matches.
#[derive(Debug, Clone)]
pub struct AnalyticRule {
    /// Unique identifier for the rule.
    pub id: AnalyticRuleId,
    /// Document type this rule applies to.
    pub doc_type: DocType,
    /// Matches when the context's product equals this id.
    pub match_product_id: Option<ProductId>,
    /// Matches when the context's category equals this id.
    pub match_category_id: Option<CategoryId>,
    /// Matches when the context's contact equals this id.
    pub match_contact_id: Option<ContactId>,
    /// Matches when the contact carries this tag.
    pub match_contact_tag_id: Option<ContactTagId>,
    /// The analytic account assigned when this rule wins.
    pub assign_analytic_account_id: AnalyticAccountId,
    /// Priority within the model (lower = higher priority).
    pub rule_priority: i16,
}

/// A prioritized group of rules.
#[derive(Debug, Clone)]
pub struct AnalyticModel {
    /// Unique identifier for the model.
    pub id: AnalyticModelId,
    /// Priority across models (lower = higher priority).
    pub priority: i16,
    /// The model's rules, ordered by `rule_priority` ascending.
    pub rules: Vec<AnalyticRule>,
}

/// The outcome of a successful resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticResolution {
    /// The analytic account to assign.
    pub analytic_account_id: AnalyticAccountId,
    /// The model the winning rule belongs to.
    pub model_id: AnalyticModelId,
    /// The winning rule.
    pub rule_id: AnalyticRuleId,
    /// How many of the rule's set predicates matched the context.
    pub matched_fields: u8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_doc_type_as_str_roundtrip() {
        for doc_type in [
            DocType::SalesOrder,
            DocType::PurchaseOrder,
            DocType::CustomerInvoice,
            DocType::VendorBill,
        ] {
            assert_eq!(DocType::from_str(doc_type.as_str()).unwrap(), doc_type);
        }
    }

    #[test]
    fn test_doc_type_from_str_invalid() {
        assert!(DocType::from_str("credit_note").is_err());
        assert!(DocType::from_str("").is_err());
    }

    #[test]
    fn test_doc_type_classification() {
        assert!(DocType::SalesOrder.is_sale());
        assert!(DocType::CustomerInvoice.is_sale());
        assert!(!DocType::PurchaseOrder.is_sale());
        assert!(!DocType::VendorBill.is_sale());

        assert!(DocType::SalesOrder.is_order());
        assert!(DocType::PurchaseOrder.is_order());
        assert!(!DocType::CustomerInvoice.is_order());
        assert!(!DocType::VendorBill.is_order());
    }
}
