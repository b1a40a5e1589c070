//! `SeaORM` Entity for the document_lines table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "document_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub document_id: Uuid,
    /// 1-based position within the document.
    pub line_no: i32,
    pub product_id: Option<Uuid>,
    pub description: Option<String>,
    pub qty: Decimal,
    pub unit_price: Decimal,
    /// Flat tax percentage (18 means 18%).
    pub tax_rate: Decimal,
    /// qty * unit_price * (1 + tax_rate/100), rounded to the currency's
    /// minor unit.
    pub line_total: Decimal,
    pub gl_account_id: Option<Uuid>,
    pub analytic_account_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::documents::Entity",
        from = "Column::DocumentId",
        to = "super::documents::Column::Id"
    )]
    Documents,
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id"
    )]
    Products,
    #[sea_orm(
        belongs_to = "super::analytic_accounts::Entity",
        from = "Column::AnalyticAccountId",
        to = "super::analytic_accounts::Column::Id"
    )]
    AnalyticAccounts,
}

impl Related<super::documents::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Documents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
