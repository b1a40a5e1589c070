//! Analytic account resolution repository.
//!
//! Loads a company's active auto-analytic models with their rules and
//! runs the core engine against a document context. A pure read; the
//! same context always resolves to the same account.

use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use tectona_core::analytic::{
    AnalyticContext, AnalyticEngine, AnalyticModel, AnalyticResolution, AnalyticRule, DocType,
};
use tectona_shared::types::{
    AnalyticAccountId, AnalyticModelId, AnalyticRuleId, CategoryId, CompanyId, ContactId,
    ContactTagId, ProductId,
};

use crate::entities::sea_orm_active_enums::DocType as DbDocType;
use crate::entities::{auto_analytic_models, auto_analytic_rules, contact_tag_links};

/// Error types for analytic resolution.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Repository for analytic account resolution.
#[derive(Debug, Clone)]
pub struct AnalyticRepository {
    db: DatabaseConnection,
}

impl AnalyticRepository {
    /// Creates a new analytic repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Resolves the analytic account for a document context.
    ///
    /// Loads the contact's tag ids when the context does not carry them,
    /// loads the company's active models with their active rules for the
    /// context's document type, and ranks candidates in the core engine.
    /// Returns `None` when nothing matches; callers then leave the line
    /// unassigned or use a caller-supplied analytic account.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn resolve(
        &self,
        context: AnalyticContext,
    ) -> Result<Option<AnalyticResolution>, AnalyticError> {
        let mut context = context;
        if context.contact_tag_ids.is_empty()
            && let Some(contact_id) = context.contact_id
        {
            context.contact_tag_ids = self.contact_tag_ids(contact_id).await?;
        }

        let models = self.load_models(context.company_id, context.doc_type).await?;
        Ok(AnalyticEngine::resolve(&models, &context))
    }

    /// Loads the tag ids carried by a contact (empty for unknown contacts).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn contact_tag_ids(
        &self,
        contact_id: ContactId,
    ) -> Result<Vec<ContactTagId>, AnalyticError> {
        let links = contact_tag_links::Entity::find()
            .filter(contact_tag_links::Column::ContactId.eq(contact_id.into_inner()))
            .all(&self.db)
            .await?;

        Ok(links
            .into_iter()
            .map(|link| ContactTagId::from_uuid(link.tag_id))
            .collect())
    }

    /// Loads a company's active models with their active rules for one
    /// document type, in deterministic priority order.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn load_models(
        &self,
        company_id: CompanyId,
        doc_type: DocType,
    ) -> Result<Vec<AnalyticModel>, AnalyticError> {
        let model_rows = auto_analytic_models::Entity::find()
            .filter(auto_analytic_models::Column::CompanyId.eq(company_id.into_inner()))
            .filter(auto_analytic_models::Column::IsActive.eq(true))
            .order_by_asc(auto_analytic_models::Column::Priority)
            .order_by_asc(auto_analytic_models::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let mut models = Vec::with_capacity(model_rows.len());
        for model_row in model_rows {
            let rule_rows = auto_analytic_rules::Entity::find()
                .filter(auto_analytic_rules::Column::ModelId.eq(model_row.id))
                .filter(auto_analytic_rules::Column::DocType.eq(DbDocType::from(doc_type)))
                .filter(auto_analytic_rules::Column::IsActive.eq(true))
                .order_by_asc(auto_analytic_rules::Column::RulePriority)
                .order_by_asc(auto_analytic_rules::Column::CreatedAt)
                .all(&self.db)
                .await?;

            models.push(AnalyticModel {
                id: AnalyticModelId::from_uuid(model_row.id),
                priority: model_row.priority,
                rules: rule_rows.into_iter().map(rule_from_row).collect(),
            });
        }

        Ok(models)
    }
}

/// Maps a rule row into the core domain type.
fn rule_from_row(row: auto_analytic_rules::Model) -> AnalyticRule {
    AnalyticRule {
        id: AnalyticRuleId::from_uuid(row.id),
        doc_type: row.doc_type.into(),
        match_product_id: row.match_product_id.map(ProductId::from_uuid),
        match_category_id: row.match_category_id.map(CategoryId::from_uuid),
        match_contact_id: row.match_contact_id.map(ContactId::from_uuid),
        match_contact_tag_id: row.match_contact_tag_id.map(ContactTagId::from_uuid),
        assign_analytic_account_id: AnalyticAccountId::from_uuid(row.assign_analytic_account_id),
        rule_priority: row.rule_priority,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn make_rule_row() -> auto_analytic_rules::Model {
        let now = chrono::Utc::now().into();
        auto_analytic_rules::Model {
            id: Uuid::new_v4(),
            model_id: Uuid::new_v4(),
            doc_type: DbDocType::VendorBill,
            match_product_id: Some(Uuid::new_v4()),
            match_category_id: None,
            match_contact_id: Some(Uuid::new_v4()),
            match_contact_tag_id: None,
            assign_analytic_account_id: Uuid::new_v4(),
            rule_priority: 3,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_rule_from_row_maps_all_fields() {
        let row = make_rule_row();
        let rule = rule_from_row(row.clone());

        assert_eq!(rule.id.into_inner(), row.id);
        assert_eq!(rule.doc_type, DocType::VendorBill);
        assert_eq!(
            rule.match_product_id.map(ProductId::into_inner),
            row.match_product_id
        );
        assert_eq!(rule.match_category_id, None);
        assert_eq!(
            rule.match_contact_id.map(ContactId::into_inner),
            row.match_contact_id
        );
        assert_eq!(rule.match_contact_tag_id, None);
        assert_eq!(
            rule.assign_analytic_account_id.into_inner(),
            row.assign_analytic_account_id
        );
        assert_eq!(rule.rule_priority, 3);
    }

    #[test]
    fn test_mapped_rule_participates_in_resolution() {
        // A mapped rule must be usable by the engine as-is.
        let row = make_rule_row();
        let rule = rule_from_row(row);
        let model = AnalyticModel {
            id: AnalyticModelId::new(),
            priority: 1,
            rules: vec![rule.clone()],
        };

        let context = AnalyticContext {
            company_id: CompanyId::new(),
            doc_type: DocType::VendorBill,
            product_id: rule.match_product_id,
            category_id: None,
            contact_id: None,
            contact_tag_ids: vec![],
        };

        let resolution = AnalyticEngine::resolve(&[model], &context).unwrap();
        assert_eq!(resolution.rule_id, rule.id);
        assert_eq!(resolution.matched_fields, 1);
    }
}
