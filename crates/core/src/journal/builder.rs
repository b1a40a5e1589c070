//! Construction of balanced journal entries from source documents.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tectona_shared::types::{
    AnalyticAccountId, CompanyId, ContactId, DocumentId, GlAccountId, PaymentId, ProductId,
};

use super::error::JournalError;
use super::types::{JournalEntryDraft, JournalLineDraft, JournalSourceType};
use crate::accounts::AccountSet;
use crate::analytic::DocType;
use crate::payment::PaymentDirection;

/// One source-document line, reduced to what posting needs.
#[derive(Debug, Clone)]
pub struct PostingLine {
    /// The line's total (qty * price * tax factor, already rounded).
    pub line_total: Decimal,
    /// Override GL account; the default revenue/expense account applies
    /// when absent.
    pub gl_account_id: Option<GlAccountId>,
    /// Resolved analytic account, if any.
    pub analytic_account_id: Option<AnalyticAccountId>,
    /// Product on the line, if any.
    pub product_id: Option<ProductId>,
    /// Line description, carried into the journal line memo.
    pub description: Option<String>,
}

/// Posting payload for an invoice, bill, or order.
#[derive(Debug, Clone)]
pub struct DocumentPosting {
    /// Owning company.
    pub company_id: CompanyId,
    /// The source document.
    pub document_id: DocumentId,
    /// Counterparty, tagged onto the receivable/payable line.
    pub contact_id: Option<ContactId>,
    /// Document date; becomes the entry date.
    pub document_date: NaiveDate,
    /// Header memo for the entry.
    pub memo: Option<String>,
    /// The document's lines.
    pub lines: Vec<PostingLine>,
}

/// Posting payload for a payment.
#[derive(Debug, Clone)]
pub struct PaymentPosting {
    /// Owning company.
    pub company_id: CompanyId,
    /// The source payment.
    pub payment_id: PaymentId,
    /// Counterparty.
    pub contact_id: ContactId,
    /// Direction of the payment.
    pub direction: PaymentDirection,
    /// Payment amount.
    pub amount: Decimal,
    /// Payment date; becomes the entry date.
    pub payment_date: NaiveDate,
    /// Header memo for the entry.
    pub memo: Option<String>,
}

/// Stateless builder turning postings into balanced entry drafts.
///
/// Every build returns `Ok(None)` for a non-positive total (no zero or
/// negative entries are ever created) and validates balance before
/// handing the draft back.
pub struct JournalBuilder;

impl JournalBuilder {
    /// Builds the entry for a customer invoice: debit receivable for the
    /// total, credit revenue (or each line's override account) per line.
    ///
    /// # Errors
    ///
    /// Returns `JournalError` when the constructed lines fail validation.
    pub fn invoice_entry(
        accounts: &AccountSet,
        posting: &DocumentPosting,
    ) -> Result<Option<JournalEntryDraft>, JournalError> {
        Self::document_entry(accounts, posting, JournalSourceType::CustomerInvoice)
    }

    /// Builds the entry for a vendor bill: credit payable for the total,
    /// debit expense (or each line's override account) per line.
    ///
    /// # Errors
    ///
    /// Returns `JournalError` when the constructed lines fail validation.
    pub fn bill_entry(
        accounts: &AccountSet,
        posting: &DocumentPosting,
    ) -> Result<Option<JournalEntryDraft>, JournalError> {
        Self::document_entry(accounts, posting, JournalSourceType::VendorBill)
    }

    /// Builds the entry for a confirmed order, mirroring the invoice
    /// treatment for sales orders and the bill treatment for purchase
    /// orders.
    ///
    /// # Errors
    ///
    /// Returns `NotAnOrder` for invoice/bill document types, or a
    /// validation error from line construction.
    pub fn order_entry(
        accounts: &AccountSet,
        posting: &DocumentPosting,
        doc_type: DocType,
    ) -> Result<Option<JournalEntryDraft>, JournalError> {
        let source_type = match doc_type {
            DocType::SalesOrder => JournalSourceType::SalesOrder,
            DocType::PurchaseOrder => JournalSourceType::PurchaseOrder,
            other => return Err(JournalError::NotAnOrder(other.as_str().to_string())),
        };
        Self::document_entry(accounts, posting, source_type)
    }

    /// Builds the entry for a posted payment.
    ///
    /// Inbound: debit cash, credit receivable. Outbound: debit payable,
    /// credit cash. Both sides carry the payment amount.
    ///
    /// # Errors
    ///
    /// Returns `JournalError` when the constructed lines fail validation.
    pub fn payment_entry(
        accounts: &AccountSet,
        posting: &PaymentPosting,
    ) -> Result<Option<JournalEntryDraft>, JournalError> {
        if posting.amount <= Decimal::ZERO {
            return Ok(None);
        }

        let (debit_account, credit_account) = match posting.direction {
            PaymentDirection::Inbound => (accounts.cash, accounts.receivable),
            PaymentDirection::Outbound => (accounts.payable, accounts.cash),
        };

        let contact = Some(posting.contact_id);
        let entry = JournalEntryDraft {
            company_id: posting.company_id,
            entry_date: posting.payment_date,
            source_type: JournalSourceType::Payment,
            source_id: Some(posting.payment_id.into_inner()),
            memo: posting.memo.clone(),
            lines: vec![
                JournalLineDraft::debit(debit_account, posting.amount).with_contact(contact),
                JournalLineDraft::credit(credit_account, posting.amount).with_contact(contact),
            ],
        };

        entry.validate()?;
        Ok(Some(entry))
    }

    /// Shared invoice/bill/order construction.
    fn document_entry(
        accounts: &AccountSet,
        posting: &DocumentPosting,
        source_type: JournalSourceType,
    ) -> Result<Option<JournalEntryDraft>, JournalError> {
        let total: Decimal = posting.lines.iter().map(|l| l.line_total).sum();
        if total <= Decimal::ZERO {
            return Ok(None);
        }

        let is_sale = matches!(
            source_type,
            JournalSourceType::CustomerInvoice | JournalSourceType::SalesOrder
        );

        let mut lines = Vec::with_capacity(posting.lines.len() + 1);

        // Counterpart line for the full document total.
        let counterpart = if is_sale {
            JournalLineDraft::debit(accounts.receivable, total)
        } else {
            JournalLineDraft::credit(accounts.payable, total)
        };
        lines.push(counterpart.with_contact(posting.contact_id));

        // One line per document line, against revenue/expense or the
        // line's override account. Zero lines contribute nothing and are
        // dropped rather than persisted.
        for line in &posting.lines {
            if line.line_total == Decimal::ZERO {
                continue;
            }

            let default_account = if is_sale {
                accounts.revenue
            } else {
                accounts.expense
            };
            let gl_account = line.gl_account_id.unwrap_or(default_account);

            let draft = if is_sale {
                JournalLineDraft::credit(gl_account, line.line_total)
            } else {
                JournalLineDraft::debit(gl_account, line.line_total)
            };

            lines.push(
                draft
                    .with_analytic(line.analytic_account_id)
                    .with_product(line.product_id)
                    .with_memo(line.description.clone()),
            );
        }

        let entry = JournalEntryDraft {
            company_id: posting.company_id,
            entry_date: posting.document_date,
            source_type,
            source_id: Some(posting.document_id.into_inner()),
            memo: posting.memo.clone(),
            lines,
        };

        entry.validate()?;
        Ok(Some(entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn make_accounts() -> AccountSet {
        AccountSet {
            cash: GlAccountId::new(),
            receivable: GlAccountId::new(),
            payable: GlAccountId::new(),
            revenue: GlAccountId::new(),
            expense: GlAccountId::new(),
        }
    }

    fn make_posting(lines: Vec<PostingLine>) -> DocumentPosting {
        DocumentPosting {
            company_id: CompanyId::new(),
            document_id: DocumentId::new(),
            contact_id: Some(ContactId::new()),
            document_date: NaiveDate::from_ymd_opt(2026, 7, 15).unwrap(),
            memo: None,
            lines,
        }
    }

    fn make_line(total: Decimal) -> PostingLine {
        PostingLine {
            line_total: total,
            gl_account_id: None,
            analytic_account_id: None,
            product_id: None,
            description: None,
        }
    }

    #[test]
    fn test_invoice_entry_single_line() {
        // Invoice with one line of 73,750: one debit to receivable, one
        // credit to revenue, both for the full amount.
        let accounts = make_accounts();
        let posting = make_posting(vec![make_line(dec!(73750))]);

        let entry = JournalBuilder::invoice_entry(&accounts, &posting)
            .unwrap()
            .unwrap();

        assert_eq!(entry.source_type, JournalSourceType::CustomerInvoice);
        assert_eq!(entry.source_id, Some(posting.document_id.into_inner()));
        assert_eq!(entry.entry_date, posting.document_date);
        assert_eq!(entry.lines.len(), 2);

        let debit = &entry.lines[0];
        assert_eq!(debit.gl_account_id, accounts.receivable);
        assert_eq!(debit.debit, dec!(73750));
        assert_eq!(debit.contact_id, posting.contact_id);

        let credit = &entry.lines[1];
        assert_eq!(credit.gl_account_id, accounts.revenue);
        assert_eq!(credit.credit, dec!(73750));

        assert!(entry.is_balanced());
    }

    #[test]
    fn test_invoice_entry_multi_line_with_override() {
        let accounts = make_accounts();
        let override_account = GlAccountId::new();
        let analytic = AnalyticAccountId::new();

        let mut line_a = make_line(dec!(1000));
        line_a.gl_account_id = Some(override_account);
        line_a.analytic_account_id = Some(analytic);
        let line_b = make_line(dec!(250.50));

        let posting = make_posting(vec![line_a, line_b]);
        let entry = JournalBuilder::invoice_entry(&accounts, &posting)
            .unwrap()
            .unwrap();

        assert_eq!(entry.lines.len(), 3);
        assert_eq!(entry.total_debit(), dec!(1250.50));
        assert_eq!(entry.total_credit(), dec!(1250.50));
        assert_eq!(entry.lines[1].gl_account_id, override_account);
        assert_eq!(entry.lines[1].analytic_account_id, Some(analytic));
        assert_eq!(entry.lines[2].gl_account_id, accounts.revenue);
    }

    #[test]
    fn test_bill_entry_mirrors_invoice() {
        let accounts = make_accounts();
        let posting = make_posting(vec![make_line(dec!(500)), make_line(dec!(300))]);

        let entry = JournalBuilder::bill_entry(&accounts, &posting)
            .unwrap()
            .unwrap();

        assert_eq!(entry.source_type, JournalSourceType::VendorBill);
        // Credit payable for the total, debit expense per line.
        assert_eq!(entry.lines[0].gl_account_id, accounts.payable);
        assert_eq!(entry.lines[0].credit, dec!(800));
        assert_eq!(entry.lines[1].gl_account_id, accounts.expense);
        assert_eq!(entry.lines[1].debit, dec!(500));
        assert_eq!(entry.lines[2].debit, dec!(300));
        assert!(entry.is_balanced());
    }

    #[test]
    fn test_zero_total_skips_posting() {
        let accounts = make_accounts();
        let posting = make_posting(vec![make_line(dec!(0))]);
        assert!(JournalBuilder::invoice_entry(&accounts, &posting)
            .unwrap()
            .is_none());

        let empty = make_posting(vec![]);
        assert!(JournalBuilder::bill_entry(&accounts, &empty)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_negative_total_skips_posting() {
        let accounts = make_accounts();
        let posting = make_posting(vec![make_line(dec!(-100))]);
        assert!(JournalBuilder::invoice_entry(&accounts, &posting)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_zero_lines_dropped_but_total_kept() {
        let accounts = make_accounts();
        let posting = make_posting(vec![make_line(dec!(100)), make_line(dec!(0))]);
        let entry = JournalBuilder::invoice_entry(&accounts, &posting)
            .unwrap()
            .unwrap();
        // Counterpart plus one credit line; the zero line is dropped.
        assert_eq!(entry.lines.len(), 2);
        assert!(entry.is_balanced());
    }

    #[test]
    fn test_payment_entry_inbound() {
        let accounts = make_accounts();
        let posting = PaymentPosting {
            company_id: CompanyId::new(),
            payment_id: PaymentId::new(),
            contact_id: ContactId::new(),
            direction: PaymentDirection::Inbound,
            amount: dec!(40000),
            payment_date: NaiveDate::from_ymd_opt(2026, 7, 20).unwrap(),
            memo: None,
        };

        let entry = JournalBuilder::payment_entry(&accounts, &posting)
            .unwrap()
            .unwrap();

        assert_eq!(entry.source_type, JournalSourceType::Payment);
        assert_eq!(entry.lines.len(), 2);
        assert_eq!(entry.lines[0].gl_account_id, accounts.cash);
        assert_eq!(entry.lines[0].debit, dec!(40000));
        assert_eq!(entry.lines[1].gl_account_id, accounts.receivable);
        assert_eq!(entry.lines[1].credit, dec!(40000));
        assert!(entry.is_balanced());
    }

    #[test]
    fn test_payment_entry_outbound() {
        let accounts = make_accounts();
        let posting = PaymentPosting {
            company_id: CompanyId::new(),
            payment_id: PaymentId::new(),
            contact_id: ContactId::new(),
            direction: PaymentDirection::Outbound,
            amount: dec!(1200.75),
            payment_date: NaiveDate::from_ymd_opt(2026, 7, 20).unwrap(),
            memo: Some("Vendor settlement".to_string()),
        };

        let entry = JournalBuilder::payment_entry(&accounts, &posting)
            .unwrap()
            .unwrap();

        assert_eq!(entry.lines[0].gl_account_id, accounts.payable);
        assert_eq!(entry.lines[0].debit, dec!(1200.75));
        assert_eq!(entry.lines[1].gl_account_id, accounts.cash);
        assert_eq!(entry.lines[1].credit, dec!(1200.75));
        assert_eq!(entry.memo, Some("Vendor settlement".to_string()));
    }

    #[test]
    fn test_payment_entry_zero_amount_skips() {
        let accounts = make_accounts();
        let posting = PaymentPosting {
            company_id: CompanyId::new(),
            payment_id: PaymentId::new(),
            contact_id: ContactId::new(),
            direction: PaymentDirection::Inbound,
            amount: dec!(0),
            payment_date: NaiveDate::from_ymd_opt(2026, 7, 20).unwrap(),
            memo: None,
        };
        assert!(JournalBuilder::payment_entry(&accounts, &posting)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_order_entry_sales_mirrors_invoice() {
        let accounts = make_accounts();
        let posting = make_posting(vec![make_line(dec!(900))]);

        let entry = JournalBuilder::order_entry(&accounts, &posting, DocType::SalesOrder)
            .unwrap()
            .unwrap();
        assert_eq!(entry.source_type, JournalSourceType::SalesOrder);
        assert_eq!(entry.lines[0].gl_account_id, accounts.receivable);
        assert_eq!(entry.lines[1].gl_account_id, accounts.revenue);
        assert!(entry.is_balanced());
    }

    #[test]
    fn test_order_entry_purchase_mirrors_bill() {
        let accounts = make_accounts();
        let posting = make_posting(vec![make_line(dec!(900))]);

        let entry = JournalBuilder::order_entry(&accounts, &posting, DocType::PurchaseOrder)
            .unwrap()
            .unwrap();
        assert_eq!(entry.source_type, JournalSourceType::PurchaseOrder);
        assert_eq!(entry.lines[0].gl_account_id, accounts.payable);
        assert_eq!(entry.lines[1].gl_account_id, accounts.expense);
    }

    #[test]
    fn test_order_entry_rejects_non_order() {
        let accounts = make_accounts();
        let posting = make_posting(vec![make_line(dec!(900))]);

        let result = JournalBuilder::order_entry(&accounts, &posting, DocType::CustomerInvoice);
        assert!(matches!(result, Err(JournalError::NotAnOrder(_))));
    }

    proptest! {
        /// Every entry the builder produces is balanced, for any mix of
        /// positive line totals, with or without overrides.
        #[test]
        fn prop_built_entries_are_balanced(
            line_cents in prop::collection::vec(1i64..100_000_000, 1..12),
            use_override in prop::collection::vec(any::<bool>(), 12),
            sale in any::<bool>(),
        ) {
            let accounts = make_accounts();
            let lines: Vec<PostingLine> = line_cents
                .iter()
                .zip(use_override.iter())
                .map(|(&cents, &with_override)| PostingLine {
                    line_total: Decimal::new(cents, 2),
                    gl_account_id: with_override.then(GlAccountId::new),
                    analytic_account_id: None,
                    product_id: None,
                    description: None,
                })
                .collect();
            let posting = make_posting(lines);

            let entry = if sale {
                JournalBuilder::invoice_entry(&accounts, &posting)
            } else {
                JournalBuilder::bill_entry(&accounts, &posting)
            }
            .unwrap()
            .unwrap();

            prop_assert!(entry.is_balanced());
            prop_assert!(entry.validate().is_ok());
            prop_assert_eq!(
                entry.total_debit(),
                line_cents.iter().map(|&c| Decimal::new(c, 2)).sum::<Decimal>()
            );
        }
    }
}
