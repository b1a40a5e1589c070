//! `SeaORM` entity definitions for the Tectona schema.

pub mod analytic_accounts;
pub mod auto_analytic_models;
pub mod auto_analytic_rules;
pub mod companies;
pub mod contact_tag_links;
pub mod contact_tags;
pub mod contacts;
pub mod document_lines;
pub mod documents;
pub mod gl_accounts;
pub mod journal_entries;
pub mod journal_lines;
pub mod payment_allocations;
pub mod payments;
pub mod product_categories;
pub mod products;
pub mod sea_orm_active_enums;
