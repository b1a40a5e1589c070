//! Journal posting repository.
//!
//! Persists the balanced entries built by the core `JournalBuilder`,
//! guarded so each source document is journaled at most once. Callers
//! hand in the transaction the posting must join; the source document's
//! own status change and its entry then commit or roll back together.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseBackend, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, QueryFilter, QueryOrder, Set, Statement,
    TransactionTrait,
};
use tectona_core::analytic::DocType;
use tectona_core::journal::{
    order_fallback_memo, DocumentPosting, JournalBuilder, JournalEntryDraft, JournalError,
    JournalSourceType, PaymentPosting, PostingLine,
};
use tectona_shared::error::AppError;
use tectona_shared::types::{
    AnalyticAccountId, CompanyId, ContactId, DocumentId, GlAccountId, ProductId,
};
use uuid::Uuid;

use super::account::{AccountError, AccountRepository};
use crate::entities::sea_orm_active_enums::{
    DocType as DbDocType, DocumentStatus as DbDocumentStatus, JournalSourceType as DbSourceType,
    JournalStatus as DbJournalStatus,
};
use crate::entities::{document_lines, documents, journal_entries, journal_lines};

/// Error types for journal posting.
#[derive(Debug, thiserror::Error)]
pub enum PostingError {
    /// Entry construction failed (unbalanced or malformed lines).
    #[error(transparent)]
    Build(#[from] JournalError),

    /// Default account resolution failed.
    #[error(transparent)]
    Account(#[from] AccountError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<PostingError> for AppError {
    fn from(err: PostingError) -> Self {
        match err {
            PostingError::Build(inner) => Self::Validation(inner.to_string()),
            PostingError::Account(AccountError::NotFound(id)) => Self::NotFound {
                entity: "account",
                id: id.to_string(),
            },
            PostingError::Account(AccountError::Database(inner))
            | PostingError::Database(inner) => Self::Database(inner.to_string()),
        }
    }
}

/// Whether the schema's journal_source_type enum carries order labels.
///
/// Resolved once at startup; the per-call behavior of the poster then
/// depends on this flag only, never on live enum introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostingCapabilities {
    /// True when 'sales_order' and 'purchase_order' are valid source
    /// types. When false, orders post as 'manual' with a memo prefix.
    pub order_sources: bool,
}

impl PostingCapabilities {
    /// Builds capabilities from a known flag (e.g., a config override).
    #[must_use]
    pub const fn new(order_sources: bool) -> Self {
        Self { order_sources }
    }

    /// Detects capabilities from the database's enum labels.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog query fails.
    pub async fn detect(db: &DatabaseConnection) -> Result<Self, DbErr> {
        let rows = db
            .query_all(Statement::from_string(
                DatabaseBackend::Postgres,
                "SELECT e.enumlabel FROM pg_enum e \
                 JOIN pg_type t ON t.oid = e.enumtypid \
                 WHERE t.typname = 'journal_source_type'"
                    .to_owned(),
            ))
            .await?;

        let mut has_sales = false;
        let mut has_purchase = false;
        for row in rows {
            match row.try_get::<String>("", "enumlabel")?.as_str() {
                "sales_order" => has_sales = true,
                "purchase_order" => has_purchase = true,
                _ => {}
            }
        }

        Ok(Self {
            order_sources: has_sales && has_purchase,
        })
    }

    /// Applies a config override when present, otherwise detects.
    ///
    /// # Errors
    ///
    /// Returns an error if detection is needed and the catalog query fails.
    pub async fn resolve(
        db: &DatabaseConnection,
        config_override: Option<bool>,
    ) -> Result<Self, DbErr> {
        match config_override {
            Some(order_sources) => Ok(Self::new(order_sources)),
            None => Self::detect(db).await,
        }
    }
}

/// One order the backfill sweep could not post.
#[derive(Debug, Clone)]
pub struct BackfillFailure {
    /// The order that failed.
    pub document_id: Uuid,
    /// Why posting failed.
    pub reason: String,
}

/// Aggregate outcome of a backfill sweep.
#[derive(Debug, Clone, Default)]
pub struct BackfillReport {
    /// Orders journaled by this sweep.
    pub posted: u32,
    /// Orders that already had an entry.
    pub skipped: u32,
    /// Orders that failed; the sweep continued past each.
    pub failures: Vec<BackfillFailure>,
}

impl BackfillReport {
    /// True when every order either posted or was already journaled.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Total number of orders examined.
    #[must_use]
    pub fn attempted(&self) -> u32 {
        self.posted + self.skipped + u32::try_from(self.failures.len()).unwrap_or(u32::MAX)
    }
}

/// Repository that turns documents and payments into journal entries.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
    accounts: AccountRepository,
    capabilities: PostingCapabilities,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub fn new(db: DatabaseConnection, capabilities: PostingCapabilities) -> Self {
        let accounts = AccountRepository::new(db.clone());
        Self {
            db,
            accounts,
            capabilities,
        }
    }

    /// Posts the journal entry for a customer invoice.
    ///
    /// Debit receivable for the total, credit revenue (or each line's
    /// override account) per line. A no-op when the invoice is already
    /// journaled or its total is not positive.
    ///
    /// # Errors
    ///
    /// Returns an error if account resolution, entry construction, or a
    /// write fails; the caller's transaction then rolls everything back.
    pub async fn post_invoice(
        &self,
        txn: &DatabaseTransaction,
        posting: &DocumentPosting,
    ) -> Result<(), PostingError> {
        self.post_source_entry(txn, posting, JournalSourceType::CustomerInvoice)
            .await
    }

    /// Posts the journal entry for a vendor bill.
    ///
    /// Credit payable for the total, debit expense (or each line's
    /// override account) per line.
    ///
    /// # Errors
    ///
    /// Returns an error if account resolution, entry construction, or a
    /// write fails.
    pub async fn post_bill(
        &self,
        txn: &DatabaseTransaction,
        posting: &DocumentPosting,
    ) -> Result<(), PostingError> {
        self.post_source_entry(txn, posting, JournalSourceType::VendorBill)
            .await
    }

    /// Posts the journal entry for a payment.
    ///
    /// Inbound: debit cash, credit receivable. Outbound: debit payable,
    /// credit cash.
    ///
    /// # Errors
    ///
    /// Returns an error if account resolution, entry construction, or a
    /// write fails.
    pub async fn post_payment(
        &self,
        txn: &DatabaseTransaction,
        posting: &PaymentPosting,
    ) -> Result<(), PostingError> {
        let company_id = posting.company_id;
        let source_id = posting.payment_id.into_inner();

        if self
            .find_source_entry(txn, company_id, DbSourceType::Payment, source_id)
            .await?
            .is_some()
        {
            tracing::debug!(payment_id = %posting.payment_id, "payment already journaled, skipping");
            return Ok(());
        }

        let accounts = self
            .accounts
            .ensure_default_accounts(txn, company_id)
            .await?;

        let Some(entry) = JournalBuilder::payment_entry(&accounts, posting)? else {
            tracing::debug!(payment_id = %posting.payment_id, "non-positive amount, nothing to post");
            return Ok(());
        };

        self.persist_entry(txn, entry).await?;
        Ok(())
    }

    /// Posts the journal entry for a confirmed order, mirroring the
    /// invoice treatment for sales orders and the bill treatment for
    /// purchase orders.
    ///
    /// On schemas without order source labels the entry is stored as
    /// `manual` with the `order:{id}` memo prefix serving as the
    /// idempotency key.
    ///
    /// # Errors
    ///
    /// Returns `NotAnOrder` for invoice/bill document types, or any
    /// resolution/write failure.
    pub async fn post_order(
        &self,
        txn: &DatabaseTransaction,
        posting: &DocumentPosting,
        doc_type: DocType,
    ) -> Result<(), PostingError> {
        let source_type = match doc_type {
            DocType::SalesOrder => JournalSourceType::SalesOrder,
            DocType::PurchaseOrder => JournalSourceType::PurchaseOrder,
            other => {
                return Err(JournalError::NotAnOrder(other.as_str().to_string()).into());
            }
        };

        let already_posted = if self.capabilities.order_sources {
            self.find_source_entry(
                txn,
                posting.company_id,
                source_type.into(),
                posting.document_id.into_inner(),
            )
            .await?
            .is_some()
        } else {
            self.find_fallback_entry(txn, posting.company_id, posting.document_id)
                .await?
                .is_some()
        };

        if already_posted {
            tracing::debug!(document_id = %posting.document_id, "order already journaled, skipping");
            return Ok(());
        }

        let accounts = self
            .accounts
            .ensure_default_accounts(txn, posting.company_id)
            .await?;

        let Some(entry) = JournalBuilder::order_entry(&accounts, posting, doc_type)? else {
            tracing::debug!(document_id = %posting.document_id, "non-positive total, nothing to post");
            return Ok(());
        };

        let entry = if self.capabilities.order_sources {
            entry
        } else {
            entry.into_manual_fallback(posting.document_id)
        };

        self.persist_entry(txn, entry).await?;
        Ok(())
    }

    /// Scans posted orders that lack a journal entry and posts each in
    /// its own transaction.
    ///
    /// Individual failures are logged and collected in the report; the
    /// sweep continues with the next order instead of aborting.
    ///
    /// # Errors
    ///
    /// Returns an error only when the scan itself fails; per-order
    /// posting failures end up in the report.
    pub async fn backfill_order_journals(
        &self,
        company_id: CompanyId,
    ) -> Result<BackfillReport, PostingError> {
        let orders = documents::Entity::find()
            .filter(documents::Column::CompanyId.eq(company_id.into_inner()))
            .filter(
                documents::Column::DocType
                    .is_in([DbDocType::SalesOrder, DbDocType::PurchaseOrder]),
            )
            .filter(documents::Column::Status.eq(DbDocumentStatus::Posted))
            .order_by_asc(documents::Column::DocumentDate)
            .order_by_asc(documents::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let mut report = BackfillReport::default();

        for order in orders {
            let doc_type: DocType = order.doc_type.clone().into();
            let already_posted = if self.capabilities.order_sources {
                let source_type = match doc_type {
                    DocType::SalesOrder => DbSourceType::SalesOrder,
                    _ => DbSourceType::PurchaseOrder,
                };
                self.find_source_entry(&self.db, company_id, source_type, order.id)
                    .await?
                    .is_some()
            } else {
                self.find_fallback_entry(&self.db, company_id, DocumentId::from_uuid(order.id))
                    .await?
                    .is_some()
            };

            if already_posted {
                report.skipped += 1;
                continue;
            }

            let lines = document_lines::Entity::find()
                .filter(document_lines::Column::DocumentId.eq(order.id))
                .order_by_asc(document_lines::Column::LineNo)
                .all(&self.db)
                .await?;
            let posting = document_posting(&order, &lines);

            let txn = self.db.begin().await?;
            match self.post_order(&txn, &posting, doc_type).await {
                Ok(()) => match txn.commit().await {
                    Ok(()) => {
                        tracing::info!(document_id = %order.id, "backfilled order journal entry");
                        report.posted += 1;
                    }
                    Err(err) => {
                        tracing::warn!(document_id = %order.id, error = %err, "backfill commit failed, continuing");
                        report.failures.push(BackfillFailure {
                            document_id: order.id,
                            reason: err.to_string(),
                        });
                    }
                },
                Err(err) => {
                    tracing::warn!(document_id = %order.id, error = %err, "backfill posting failed, continuing");
                    report.failures.push(BackfillFailure {
                        document_id: order.id,
                        reason: err.to_string(),
                    });
                    if let Err(rollback_err) = txn.rollback().await {
                        tracing::error!(error = %rollback_err, "rollback failed after posting error");
                    }
                }
            }
        }

        Ok(report)
    }

    /// Shared invoice/bill posting path.
    async fn post_source_entry(
        &self,
        txn: &DatabaseTransaction,
        posting: &DocumentPosting,
        source_type: JournalSourceType,
    ) -> Result<(), PostingError> {
        if self
            .find_source_entry(
                txn,
                posting.company_id,
                source_type.into(),
                posting.document_id.into_inner(),
            )
            .await?
            .is_some()
        {
            tracing::debug!(document_id = %posting.document_id, "document already journaled, skipping");
            return Ok(());
        }

        let accounts = self
            .accounts
            .ensure_default_accounts(txn, posting.company_id)
            .await?;

        let built = match source_type {
            JournalSourceType::CustomerInvoice => JournalBuilder::invoice_entry(&accounts, posting),
            _ => JournalBuilder::bill_entry(&accounts, posting),
        }?;

        let Some(entry) = built else {
            tracing::debug!(document_id = %posting.document_id, "non-positive total, nothing to post");
            return Ok(());
        };

        self.persist_entry(txn, entry).await?;
        Ok(())
    }

    /// Looks up an existing entry by its source identity.
    async fn find_source_entry<C: ConnectionTrait>(
        &self,
        conn: &C,
        company_id: CompanyId,
        source_type: DbSourceType,
        source_id: Uuid,
    ) -> Result<Option<journal_entries::Model>, PostingError> {
        let entry = journal_entries::Entity::find()
            .filter(journal_entries::Column::CompanyId.eq(company_id.into_inner()))
            .filter(journal_entries::Column::SourceType.eq(source_type))
            .filter(journal_entries::Column::SourceId.eq(source_id))
            .one(conn)
            .await?;

        Ok(entry)
    }

    /// Looks up an order's fallback entry by the memo prefix.
    async fn find_fallback_entry<C: ConnectionTrait>(
        &self,
        conn: &C,
        company_id: CompanyId,
        document_id: DocumentId,
    ) -> Result<Option<journal_entries::Model>, PostingError> {
        let prefix = order_fallback_memo(document_id);
        let entry = journal_entries::Entity::find()
            .filter(journal_entries::Column::CompanyId.eq(company_id.into_inner()))
            .filter(journal_entries::Column::SourceType.eq(DbSourceType::Manual))
            .filter(journal_entries::Column::Memo.starts_with(prefix))
            .one(conn)
            .await?;

        Ok(entry)
    }

    /// Inserts a draft entry with its lines.
    async fn persist_entry<C: ConnectionTrait>(
        &self,
        conn: &C,
        draft: JournalEntryDraft,
    ) -> Result<Uuid, PostingError> {
        let now = chrono::Utc::now().into();
        let entry_id = Uuid::new_v4();

        let entry = journal_entries::ActiveModel {
            id: Set(entry_id),
            company_id: Set(draft.company_id.into_inner()),
            entry_date: Set(draft.entry_date),
            status: Set(DbJournalStatus::Posted),
            source_type: Set(draft.source_type.into()),
            source_id: Set(draft.source_id),
            memo: Set(draft.memo.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        entry.insert(conn).await?;

        for (idx, line) in draft.lines.iter().enumerate() {
            let line_no = i32::try_from(idx + 1).unwrap_or(i32::MAX);
            let row = journal_lines::ActiveModel {
                id: Set(Uuid::new_v4()),
                entry_id: Set(entry_id),
                line_no: Set(line_no),
                gl_account_id: Set(line.gl_account_id.into_inner()),
                analytic_account_id: Set(line
                    .analytic_account_id
                    .map(AnalyticAccountId::into_inner)),
                contact_id: Set(line.contact_id.map(ContactId::into_inner)),
                product_id: Set(line.product_id.map(ProductId::into_inner)),
                debit: Set(line.debit),
                credit: Set(line.credit),
                memo: Set(line.memo.clone()),
                created_at: Set(now),
            };
            row.insert(conn).await?;
        }

        Ok(entry_id)
    }
}

/// Maps a document row and its lines into a posting payload.
pub(crate) fn document_posting(
    document: &documents::Model,
    lines: &[document_lines::Model],
) -> DocumentPosting {
    DocumentPosting {
        company_id: CompanyId::from_uuid(document.company_id),
        document_id: DocumentId::from_uuid(document.id),
        contact_id: document.contact_id.map(ContactId::from_uuid),
        document_date: document.document_date,
        memo: document
            .reference
            .clone()
            .or_else(|| document.memo.clone()),
        lines: lines
            .iter()
            .map(|line| PostingLine {
                line_total: line.line_total,
                gl_account_id: line.gl_account_id.map(GlAccountId::from_uuid),
                analytic_account_id: line.analytic_account_id.map(AnalyticAccountId::from_uuid),
                product_id: line.product_id.map(ProductId::from_uuid),
                description: line.description.clone(),
            })
            .collect(),
    }
}
