//! `SeaORM` Entity for the auto_analytic_rules table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::DocType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "auto_analytic_rules")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub model_id: Uuid,
    pub doc_type: DocType,
    /// Match predicates; NULL means unset. A rule with all four unset
    /// never matches.
    pub match_product_id: Option<Uuid>,
    pub match_category_id: Option<Uuid>,
    pub match_contact_id: Option<Uuid>,
    pub match_contact_tag_id: Option<Uuid>,
    pub assign_analytic_account_id: Uuid,
    /// Lower value wins within the model.
    pub rule_priority: i16,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::auto_analytic_models::Entity",
        from = "Column::ModelId",
        to = "super::auto_analytic_models::Column::Id"
    )]
    AutoAnalyticModels,
    #[sea_orm(
        belongs_to = "super::analytic_accounts::Entity",
        from = "Column::AssignAnalyticAccountId",
        to = "super::analytic_accounts::Column::Id"
    )]
    AnalyticAccounts,
}

impl Related<super::auto_analytic_models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AutoAnalyticModels.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
