//! Document repository for invoices, bills, and orders.
//!
//! Creation computes line totals and auto-assigns analytic accounts;
//! posting flips the status and journals the document in one
//! transaction. Cancelling never reverses the ledger: a posted
//! document's entry stays in place.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tectona_core::analytic::{AnalyticContext, DocType};
use tectona_core::document::{self, DocumentLineInput};
use tectona_shared::error::AppError;
use tectona_shared::types::{
    AnalyticAccountId, CategoryId, CompanyId, ContactId, Currency, DocumentId, GlAccountId,
    ProductId,
};
use uuid::Uuid;

use super::analytic::{AnalyticError, AnalyticRepository};
use super::journal::{document_posting, JournalRepository, PostingError};
use crate::entities::sea_orm_active_enums::{
    DocType as DbDocType, DocumentStatus as DbDocumentStatus, PaymentState as DbPaymentState,
};
use crate::entities::{document_lines, documents, products};

/// Error types for document operations.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Document not found.
    #[error("Document not found: {0}")]
    NotFound(Uuid),

    /// A line references a product that does not exist.
    #[error("Invalid product reference: {0}")]
    InvalidProduct(Uuid),

    /// Only draft documents can be posted.
    #[error("Document {0} is not in draft status")]
    NotDraft(Uuid),

    /// Analytic resolution failed.
    #[error(transparent)]
    Analytic(#[from] AnalyticError),

    /// Journal posting failed.
    #[error(transparent)]
    Posting(#[from] PostingError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::NotFound(id) => Self::NotFound {
                entity: "document",
                id: id.to_string(),
            },
            DocumentError::InvalidProduct(id) => Self::InvalidProduct(id.to_string()),
            DocumentError::NotDraft(id) => {
                Self::Validation(format!("document {id} is not in draft status"))
            }
            DocumentError::Analytic(AnalyticError::Database(inner))
            | DocumentError::Database(inner) => Self::Database(inner.to_string()),
            DocumentError::Posting(inner) => inner.into(),
        }
    }
}

/// Input for creating a document.
#[derive(Debug, Clone)]
pub struct CreateDocumentInput {
    /// Owning company.
    pub company_id: CompanyId,
    /// Document type.
    pub doc_type: DocType,
    /// Counterparty contact.
    pub contact_id: Option<ContactId>,
    /// Document currency.
    pub currency: Currency,
    /// Document date.
    pub document_date: chrono::NaiveDate,
    /// Human-facing reference (e.g. INV-0001).
    pub reference: Option<String>,
    /// Free-form memo.
    pub memo: Option<String>,
    /// The document lines.
    pub lines: Vec<DocumentLineInput>,
}

/// A document with its lines.
#[derive(Debug, Clone)]
pub struct DocumentWithLines {
    /// Document header.
    pub document: documents::Model,
    /// Lines ordered by line_no.
    pub lines: Vec<document_lines::Model>,
}

/// Document repository for CRUD and posting operations.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    db: DatabaseConnection,
    analytic: AnalyticRepository,
    journal: JournalRepository,
}

impl DocumentRepository {
    /// Creates a new document repository.
    #[must_use]
    pub fn new(db: DatabaseConnection, journal: JournalRepository) -> Self {
        let analytic = AnalyticRepository::new(db.clone());
        Self {
            db,
            analytic,
            journal,
        }
    }

    /// Creates a draft document with computed line totals and resolved
    /// analytic accounts.
    ///
    /// Product references are validated first; a line naming an unknown
    /// product fails the whole creation before anything is written. For
    /// each line the caller-supplied analytic account wins; otherwise the
    /// rule engine runs with the line's product/category and the header
    /// contact, and an unmatched line stays unassigned.
    ///
    /// # Errors
    ///
    /// Returns `InvalidProduct` for unknown product references, or a
    /// database error; no partial document is ever visible.
    pub async fn create_document(
        &self,
        input: CreateDocumentInput,
    ) -> Result<DocumentWithLines, DocumentError> {
        // Validate product references and collect categories before any
        // write.
        let mut categories: std::collections::HashMap<Uuid, Option<Uuid>> =
            std::collections::HashMap::new();
        for line in &input.lines {
            if let Some(product_id) = line.product_id {
                let product = products::Entity::find_by_id(product_id.into_inner())
                    .filter(products::Column::CompanyId.eq(input.company_id.into_inner()))
                    .one(&self.db)
                    .await?
                    .ok_or(DocumentError::InvalidProduct(product_id.into_inner()))?;
                categories.insert(product.id, product.category_id);
            }
        }

        // Resolve analytic accounts per line; a caller-supplied id wins.
        let mut resolved: Vec<(Decimal, Option<AnalyticAccountId>)> =
            Vec::with_capacity(input.lines.len());
        for line in &input.lines {
            let analytic_account_id = match line.analytic_account_id {
                Some(id) => Some(id),
                None => {
                    let category_id = line
                        .product_id
                        .and_then(|p| categories.get(&p.into_inner()).copied().flatten())
                        .map(CategoryId::from_uuid);
                    self.analytic
                        .resolve(AnalyticContext {
                            company_id: input.company_id,
                            doc_type: input.doc_type,
                            product_id: line.product_id,
                            category_id,
                            contact_id: input.contact_id,
                            contact_tag_ids: vec![],
                        })
                        .await?
                        .map(|r| r.analytic_account_id)
                }
            };

            let line_total =
                document::line_total(line.qty, line.unit_price, line.tax_rate, input.currency);
            resolved.push((line_total, analytic_account_id));
        }

        let total_amount: Decimal = resolved.iter().map(|(total, _)| *total).sum();

        // Persist header and lines atomically.
        let txn = self.db.begin().await?;
        let now = chrono::Utc::now().into();
        let document_id = Uuid::new_v4();

        let document = documents::ActiveModel {
            id: Set(document_id),
            company_id: Set(input.company_id.into_inner()),
            doc_type: Set(input.doc_type.into()),
            contact_id: Set(input.contact_id.map(ContactId::into_inner)),
            currency: Set(input.currency.to_string()),
            status: Set(DbDocumentStatus::Draft),
            document_date: Set(input.document_date),
            reference: Set(input.reference.clone()),
            total_amount: Set(total_amount),
            paid_amount: Set(Decimal::ZERO),
            payment_state: Set(DbPaymentState::NotPaid),
            memo: Set(input.memo.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let document = document.insert(&txn).await?;

        let mut lines = Vec::with_capacity(input.lines.len());
        for (idx, (line, (line_total, analytic_account_id))) in
            input.lines.iter().zip(resolved).enumerate()
        {
            let line_no = i32::try_from(idx + 1).unwrap_or(i32::MAX);
            let row = document_lines::ActiveModel {
                id: Set(Uuid::new_v4()),
                document_id: Set(document_id),
                line_no: Set(line_no),
                product_id: Set(line.product_id.map(ProductId::into_inner)),
                description: Set(line.description.clone()),
                qty: Set(line.qty),
                unit_price: Set(line.unit_price),
                tax_rate: Set(line.tax_rate),
                line_total: Set(line_total),
                gl_account_id: Set(line.gl_account_id.map(GlAccountId::into_inner)),
                analytic_account_id: Set(
                    analytic_account_id.map(AnalyticAccountId::into_inner)
                ),
                created_at: Set(now),
            };
            lines.push(row.insert(&txn).await?);
        }

        txn.commit().await?;

        Ok(DocumentWithLines { document, lines })
    }

    /// Posts a draft document: status moves to posted and the journal
    /// entry is created in the same transaction.
    ///
    /// Retrying after a failed attempt is safe; the poster's idempotency
    /// guard makes a second entry impossible.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown documents, `NotDraft` when the
    /// document already left draft, or any posting failure (which rolls
    /// back the status change too).
    pub async fn post_document(
        &self,
        company_id: CompanyId,
        document_id: DocumentId,
    ) -> Result<DocumentWithLines, DocumentError> {
        let (document, lines) = self.load(company_id, document_id).await?;

        if document.status != DbDocumentStatus::Draft {
            return Err(DocumentError::NotDraft(document_id.into_inner()));
        }

        let doc_type: DocType = document.doc_type.clone().into();
        let posting = document_posting(&document, &lines);

        let txn = self.db.begin().await?;

        let mut active: documents::ActiveModel = document.into();
        active.status = Set(DbDocumentStatus::Posted);
        active.updated_at = Set(chrono::Utc::now().into());
        let document = active.update(&txn).await?;

        match doc_type {
            DocType::CustomerInvoice => self.journal.post_invoice(&txn, &posting).await?,
            DocType::VendorBill => self.journal.post_bill(&txn, &posting).await?,
            DocType::SalesOrder | DocType::PurchaseOrder => {
                self.journal.post_order(&txn, &posting, doc_type).await?;
            }
        }

        txn.commit().await?;

        Ok(DocumentWithLines { document, lines })
    }

    /// Cancels a document.
    ///
    /// Draft documents simply never post; posted documents keep their
    /// journal entry, no compensating entry is generated. Cancelling an
    /// already-cancelled document is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown documents or a database error.
    pub async fn cancel_document(
        &self,
        company_id: CompanyId,
        document_id: DocumentId,
    ) -> Result<documents::Model, DocumentError> {
        let (document, _) = self.load(company_id, document_id).await?;

        if document.status == DbDocumentStatus::Cancelled {
            return Ok(document);
        }

        let mut active: documents::ActiveModel = document.into();
        active.status = Set(DbDocumentStatus::Cancelled);
        active.updated_at = Set(chrono::Utc::now().into());
        let document = active.update(&self.db).await?;

        Ok(document)
    }

    /// Gets a document with its lines.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown documents or a database error.
    pub async fn get_document(
        &self,
        company_id: CompanyId,
        document_id: DocumentId,
    ) -> Result<DocumentWithLines, DocumentError> {
        let (document, lines) = self.load(company_id, document_id).await?;
        Ok(DocumentWithLines { document, lines })
    }

    /// Lists a company's documents of one type.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_documents(
        &self,
        company_id: CompanyId,
        doc_type: DocType,
    ) -> Result<Vec<documents::Model>, DocumentError> {
        let rows = documents::Entity::find()
            .filter(documents::Column::CompanyId.eq(company_id.into_inner()))
            .filter(documents::Column::DocType.eq(DbDocType::from(doc_type)))
            .order_by_desc(documents::Column::DocumentDate)
            .order_by_desc(documents::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(rows)
    }

    /// Loads a document header and its ordered lines.
    async fn load(
        &self,
        company_id: CompanyId,
        document_id: DocumentId,
    ) -> Result<(documents::Model, Vec<document_lines::Model>), DocumentError> {
        let document = documents::Entity::find_by_id(document_id.into_inner())
            .filter(documents::Column::CompanyId.eq(company_id.into_inner()))
            .one(&self.db)
            .await?
            .ok_or(DocumentError::NotFound(document_id.into_inner()))?;

        let lines = document_lines::Entity::find()
            .filter(document_lines::Column::DocumentId.eq(document_id.into_inner()))
            .order_by_asc(document_lines::Column::LineNo)
            .all(&self.db)
            .await?;

        Ok((document, lines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_document_error_maps_to_app_error() {
        let id = Uuid::new_v4();

        let err: AppError = DocumentError::NotFound(id).into();
        assert_eq!(err.status_code(), 404);

        let err: AppError = DocumentError::InvalidProduct(id).into();
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.error_code(), "INVALID_PRODUCT");

        let err: AppError = DocumentError::NotDraft(id).into();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_create_input_line_totals_match_scenario() {
        // The repository computes totals through core::document; the
        // canonical furniture line must come out at 73,750.
        let total = document::line_total(dec!(5), dec!(12500), dec!(18), Currency::Idr);
        assert_eq!(total, dec!(73750));
    }
}
