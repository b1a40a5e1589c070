//! Document domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tectona_shared::types::{AnalyticAccountId, GlAccountId, ProductId};

/// Document lifecycle status.
///
/// Posting a draft document creates its journal entry; cancelling a
/// posted document leaves the entry in place (no reversal is generated).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Document is being drafted and can be modified.
    Draft,
    /// Document has been posted (orders: confirmed); journaled once.
    Posted,
    /// Document has been cancelled; any existing journal entry remains.
    Cancelled,
}

impl DocumentStatus {
    /// Returns true if the document can still be modified.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }
}

/// Derived payment progress of an invoice or bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentState {
    /// Nothing allocated yet.
    NotPaid,
    /// Some, but not all, of the total is covered.
    PartiallyPaid,
    /// Fully covered.
    Paid,
}

impl PaymentState {
    /// Derives the payment state from paid and total amounts.
    ///
    /// Pure function of the two amounts: `Paid` when `paid >= total`,
    /// `PartiallyPaid` when `0 < paid < total`, `NotPaid` otherwise.
    /// Recomputed from source allocation rows after every change, never
    /// transitioned incrementally.
    #[must_use]
    pub fn derive(paid: Decimal, total: Decimal) -> Self {
        if paid >= total {
            Self::Paid
        } else if paid > Decimal::ZERO {
            Self::PartiallyPaid
        } else {
            Self::NotPaid
        }
    }
}

/// Input for a single document line.
#[derive(Debug, Clone)]
pub struct DocumentLineInput {
    /// Product on the line, if any.
    pub product_id: Option<ProductId>,
    /// Free-form line description.
    pub description: Option<String>,
    /// Quantity.
    pub qty: Decimal,
    /// Unit price before tax.
    pub unit_price: Decimal,
    /// Flat tax percentage (18 means 18%).
    pub tax_rate: Decimal,
    /// Override GL account; defaults to revenue/expense when absent.
    pub gl_account_id: Option<GlAccountId>,
    /// Caller-supplied analytic account; wins over the rule engine.
    pub analytic_account_id: Option<AnalyticAccountId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_document_status_editable() {
        assert!(DocumentStatus::Draft.is_editable());
        assert!(!DocumentStatus::Posted.is_editable());
        assert!(!DocumentStatus::Cancelled.is_editable());
    }

    #[test]
    fn test_payment_state_derive() {
        assert_eq!(
            PaymentState::derive(dec!(0), dec!(100)),
            PaymentState::NotPaid
        );
        assert_eq!(
            PaymentState::derive(dec!(40), dec!(100)),
            PaymentState::PartiallyPaid
        );
        assert_eq!(
            PaymentState::derive(dec!(100), dec!(100)),
            PaymentState::Paid
        );
        assert_eq!(
            PaymentState::derive(dec!(150), dec!(100)),
            PaymentState::Paid
        );
    }

    #[test]
    fn test_payment_state_zero_total_is_paid() {
        // A zero-total document has nothing outstanding.
        assert_eq!(PaymentState::derive(dec!(0), dec!(0)), PaymentState::Paid);
    }

    #[test]
    fn test_payment_state_never_regresses_with_growing_paid() {
        // paid only ever grows through posted allocations; the derived
        // state must move not_paid -> partially_paid -> paid.
        let total = dec!(73750);
        let mut last = PaymentState::derive(dec!(0), total);
        assert_eq!(last, PaymentState::NotPaid);

        for paid in [dec!(40000), dec!(73750)] {
            let state = PaymentState::derive(paid, total);
            let rank = |s: PaymentState| match s {
                PaymentState::NotPaid => 0,
                PaymentState::PartiallyPaid => 1,
                PaymentState::Paid => 2,
            };
            assert!(rank(state) >= rank(last));
            last = state;
        }
        assert_eq!(last, PaymentState::Paid);
    }
}
