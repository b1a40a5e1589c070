//! Payment repository with allocation handling.
//!
//! A payment, its journal entry, its allocations, and every target
//! document's recomputed paid state commit or roll back as one unit.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    JoinType, QueryFilter, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use tectona_core::document::PaymentState;
use tectona_core::journal::PaymentPosting;
use tectona_core::payment::{AllocationError, CreatePaymentInput, PaymentService};
use tectona_shared::error::AppError;
use tectona_shared::types::{CompanyId, DocumentId, PaymentId};
use uuid::Uuid;

use super::journal::{JournalRepository, PostingError};
use crate::entities::sea_orm_active_enums::{
    AllocationTargetType as DbTargetType, DocType as DbDocType, PaymentStatus as DbPaymentStatus,
};
use crate::entities::{documents, payment_allocations, payments};

/// Error types for payment operations.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// Payment not found.
    #[error("Payment not found: {0}")]
    NotFound(Uuid),

    /// An allocation rule was violated.
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    /// Journal posting failed.
    #[error(transparent)]
    Posting(#[from] PostingError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::NotFound(id) => Self::NotFound {
                entity: "payment",
                id: id.to_string(),
            },
            PaymentError::Allocation(AllocationError::TargetNotFound(id)) => Self::NotFound {
                entity: "document",
                id: id.to_string(),
            },
            PaymentError::Allocation(inner) => Self::InvalidAllocation(inner.to_string()),
            PaymentError::Posting(inner) => inner.into(),
            PaymentError::Database(inner) => Self::Database(inner.to_string()),
        }
    }
}

/// A payment with its allocations.
#[derive(Debug, Clone)]
pub struct PaymentWithAllocations {
    /// Payment header.
    pub payment: payments::Model,
    /// Allocations applied by this payment.
    pub allocations: Vec<payment_allocations::Model>,
}

/// Payment repository for creation, allocation, and voiding.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
    journal: JournalRepository,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, journal: JournalRepository) -> Self {
        Self { db, journal }
    }

    /// Creates a posted payment and applies its allocations.
    ///
    /// The allocation-sum ceiling is checked before anything is written.
    /// Inside one transaction the payment row is inserted, its journal
    /// entry posted, and each allocation applied: the target is loaded,
    /// checked against its remaining balance, the allocation row
    /// inserted, and the target's paid amount recomputed from posted
    /// allocation rows (never incremented). Any failure rolls the whole
    /// payment back.
    ///
    /// # Errors
    ///
    /// Returns an allocation rule violation, a missing target, a posting
    /// failure, or a database error; in every case no partial payment is
    /// visible afterwards.
    pub async fn create_payment(
        &self,
        input: CreatePaymentInput,
    ) -> Result<PaymentWithAllocations, PaymentError> {
        // Fail fast, before any write.
        PaymentService::validate_allocations(input.amount, &input.allocations)?;

        let txn = self.db.begin().await?;
        let now = chrono::Utc::now().into();
        let payment_id = Uuid::new_v4();

        let payment = payments::ActiveModel {
            id: Set(payment_id),
            company_id: Set(input.company_id.into_inner()),
            direction: Set(input.direction.into()),
            contact_id: Set(input.contact_id.into_inner()),
            amount: Set(input.amount),
            currency: Set(input.currency.to_string()),
            payment_date: Set(input.payment_date),
            status: Set(DbPaymentStatus::Posted),
            memo: Set(input.memo.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let payment = payment.insert(&txn).await?;

        self.journal
            .post_payment(
                &txn,
                &PaymentPosting {
                    company_id: input.company_id,
                    payment_id: PaymentId::from_uuid(payment_id),
                    contact_id: input.contact_id,
                    direction: input.direction,
                    amount: input.amount,
                    payment_date: input.payment_date,
                    memo: input.memo.clone(),
                },
            )
            .await?;

        let mut allocations = Vec::with_capacity(input.allocations.len());
        for allocation in &input.allocations {
            let target = documents::Entity::find_by_id(allocation.target_id.into_inner())
                .filter(documents::Column::CompanyId.eq(input.company_id.into_inner()))
                .one(&txn)
                .await?
                .ok_or(AllocationError::TargetNotFound(
                    allocation.target_id.into_inner(),
                ))?;

            // The target must actually be the kind of document the
            // allocation claims to pay down.
            if target.doc_type != expected_doc_type(allocation.target_type.into()) {
                return Err(AllocationError::TargetNotFound(
                    allocation.target_id.into_inner(),
                )
                .into());
            }

            PaymentService::validate_against_balance(
                DocumentId::from_uuid(target.id),
                target.total_amount,
                target.paid_amount,
                allocation.amount,
            )?;

            let row = payment_allocations::ActiveModel {
                id: Set(Uuid::new_v4()),
                payment_id: Set(payment_id),
                target_type: Set(allocation.target_type.into()),
                target_id: Set(allocation.target_id.into_inner()),
                amount: Set(allocation.amount),
                created_at: Set(now),
            };
            allocations.push(row.insert(&txn).await?);

            self.recompute_target_paid(&txn, target).await?;
        }

        txn.commit().await?;

        Ok(PaymentWithAllocations {
            payment,
            allocations,
        })
    }

    /// Voids a posted payment and re-derives each target's paid state.
    ///
    /// The payment's allocations stop counting (only posted payments
    /// contribute); the journal entry is left in place, mirroring the
    /// treatment of cancelled documents. Voiding a voided payment is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown payments or a database error.
    pub async fn void_payment(
        &self,
        company_id: CompanyId,
        payment_id: PaymentId,
    ) -> Result<payments::Model, PaymentError> {
        let payment = payments::Entity::find_by_id(payment_id.into_inner())
            .filter(payments::Column::CompanyId.eq(company_id.into_inner()))
            .one(&self.db)
            .await?
            .ok_or(PaymentError::NotFound(payment_id.into_inner()))?;

        if payment.status == DbPaymentStatus::Void {
            return Ok(payment);
        }

        let allocations = payment_allocations::Entity::find()
            .filter(payment_allocations::Column::PaymentId.eq(payment_id.into_inner()))
            .all(&self.db)
            .await?;

        let txn = self.db.begin().await?;

        let mut active: payments::ActiveModel = payment.into();
        active.status = Set(DbPaymentStatus::Void);
        active.updated_at = Set(chrono::Utc::now().into());
        let payment = active.update(&txn).await?;

        let mut seen: std::collections::HashSet<Uuid> = std::collections::HashSet::new();
        for allocation in allocations {
            if !seen.insert(allocation.target_id) {
                continue;
            }
            let target = documents::Entity::find_by_id(allocation.target_id)
                .one(&txn)
                .await?
                .ok_or(AllocationError::TargetNotFound(allocation.target_id))?;
            self.recompute_target_paid(&txn, target).await?;
        }

        txn.commit().await?;

        tracing::info!(payment_id = %payment_id, "payment voided, target balances re-derived");
        Ok(payment)
    }

    /// Gets a payment with its allocations.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown payments or a database error.
    pub async fn get_payment(
        &self,
        company_id: CompanyId,
        payment_id: PaymentId,
    ) -> Result<PaymentWithAllocations, PaymentError> {
        let payment = payments::Entity::find_by_id(payment_id.into_inner())
            .filter(payments::Column::CompanyId.eq(company_id.into_inner()))
            .one(&self.db)
            .await?
            .ok_or(PaymentError::NotFound(payment_id.into_inner()))?;

        let allocations = payment_allocations::Entity::find()
            .filter(payment_allocations::Column::PaymentId.eq(payment_id.into_inner()))
            .all(&self.db)
            .await?;

        Ok(PaymentWithAllocations {
            payment,
            allocations,
        })
    }

    /// Recomputes a target document's paid amount and payment state from
    /// the allocations of posted payments against it.
    ///
    /// Derived from source rows on every call, which stays consistent
    /// under retried or concurrent allocation writes.
    async fn recompute_target_paid<C: ConnectionTrait>(
        &self,
        conn: &C,
        target: documents::Model,
    ) -> Result<(), PaymentError> {
        let rows = payment_allocations::Entity::find()
            .filter(payment_allocations::Column::TargetId.eq(target.id))
            .join(
                JoinType::InnerJoin,
                payment_allocations::Relation::Payments.def(),
            )
            .filter(payments::Column::Status.eq(DbPaymentStatus::Posted))
            .all(conn)
            .await?;

        let amounts: Vec<Decimal> = rows.iter().map(|row| row.amount).collect();
        let paid_amount = PaymentService::recompute_paid(&amounts);
        let payment_state = PaymentState::derive(paid_amount, target.total_amount);

        let mut active: documents::ActiveModel = target.into();
        active.paid_amount = Set(paid_amount);
        active.payment_state = Set(payment_state.into());
        active.updated_at = Set(chrono::Utc::now().into());
        active.update(conn).await?;

        Ok(())
    }
}

/// The document type an allocation target kind must point at.
fn expected_doc_type(target_type: DbTargetType) -> DbDocType {
    match target_type {
        DbTargetType::CustomerInvoice => DbDocType::CustomerInvoice,
        DbTargetType::VendorBill => DbDocType::VendorBill,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_payment_error_maps_to_app_error() {
        let id = Uuid::new_v4();

        let err: AppError = PaymentError::NotFound(id).into();
        assert_eq!(err.status_code(), 404);

        let err: AppError = PaymentError::Allocation(AllocationError::InvalidAllocation {
            allocated: dec!(110),
            amount: dec!(100),
        })
        .into();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "INVALID_ALLOCATION");

        let err: AppError =
            PaymentError::Allocation(AllocationError::TargetNotFound(id)).into();
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_target_type_to_doc_type_pairing() {
        // An invoice allocation may only land on an invoice, a bill
        // allocation only on a bill.
        assert_eq!(
            expected_doc_type(DbTargetType::CustomerInvoice),
            DbDocType::CustomerInvoice
        );
        assert_eq!(
            expected_doc_type(DbTargetType::VendorBill),
            DbDocType::VendorBill
        );
    }
}
