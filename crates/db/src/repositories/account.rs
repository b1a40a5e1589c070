//! Account repository for chart of accounts database operations.
//!
//! Owns the lazy creation of the five default accounts every company
//! needs before posting, plus lookup and soft-archival.

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set,
};
use tectona_core::accounts::{AccountSet, DefaultAccountKind};
use tectona_shared::types::{CompanyId, GlAccountId};
use uuid::Uuid;

use crate::entities::gl_accounts;

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account not found.
    #[error("Account not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Account repository for chart-of-accounts operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Ensures the five default accounts exist for a company and returns
    /// their ids.
    ///
    /// Each account is upserted on the (company_id, code) unique
    /// constraint: an existing code gets its name and type refreshed, a
    /// missing one is created active. Safe for concurrent callers; two
    /// racing requests both land on the same rows instead of creating
    /// duplicates. Runs on the caller's connection so the poster can
    /// resolve accounts inside its own transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails.
    pub async fn ensure_default_accounts<C: ConnectionTrait>(
        &self,
        conn: &C,
        company_id: CompanyId,
    ) -> Result<AccountSet, AccountError> {
        let mut ids = [Uuid::nil(); 5];
        for (slot, kind) in ids.iter_mut().zip(DefaultAccountKind::ALL) {
            *slot = self.upsert_default(conn, company_id, kind).await?;
        }

        Ok(AccountSet {
            cash: GlAccountId::from_uuid(ids[0]),
            receivable: GlAccountId::from_uuid(ids[1]),
            payable: GlAccountId::from_uuid(ids[2]),
            revenue: GlAccountId::from_uuid(ids[3]),
            expense: GlAccountId::from_uuid(ids[4]),
        })
    }

    /// Upserts one default account and returns its id.
    async fn upsert_default<C: ConnectionTrait>(
        &self,
        conn: &C,
        company_id: CompanyId,
        kind: DefaultAccountKind,
    ) -> Result<Uuid, AccountError> {
        let now = chrono::Utc::now().into();
        let account = gl_accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(company_id.into_inner()),
            code: Set(kind.code().to_string()),
            name: Set(kind.name().to_string()),
            account_type: Set(kind.account_type().into()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = gl_accounts::Entity::insert(account)
            .on_conflict(
                OnConflict::columns([gl_accounts::Column::CompanyId, gl_accounts::Column::Code])
                    .update_columns([
                        gl_accounts::Column::Name,
                        gl_accounts::Column::AccountType,
                        gl_accounts::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(conn)
            .await?;

        Ok(model.id)
    }

    /// Finds an account by its company-scoped code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_code(
        &self,
        company_id: CompanyId,
        code: &str,
    ) -> Result<Option<gl_accounts::Model>, AccountError> {
        let account = gl_accounts::Entity::find()
            .filter(gl_accounts::Column::CompanyId.eq(company_id.into_inner()))
            .filter(gl_accounts::Column::Code.eq(code))
            .one(&self.db)
            .await?;

        Ok(account)
    }

    /// Soft-archives an account (is_active = false).
    ///
    /// Accounts referenced by posted lines stay in place; archival only
    /// hides them from new documents.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is missing or the update fails.
    pub async fn archive_account(&self, id: GlAccountId) -> Result<(), AccountError> {
        let account = gl_accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(AccountError::NotFound(id.into_inner()))?;

        let mut active: gl_accounts::ActiveModel = account.into();
        active.is_active = Set(false);
        active.updated_at = Set(chrono::Utc::now().into());
        active.update(&self.db).await?;

        Ok(())
    }
}
