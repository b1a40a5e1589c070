//! Cost-center auto-assignment rule engine.
//!
//! Given a document context (doc type, product, category, contact, contact
//! tags), selects the best-matching analytic account from prioritized
//! models and rules. Pure logic; the persistence layer loads the models
//! and supplies the contact's tags.

pub mod engine;
pub mod types;

pub use engine::AnalyticEngine;
pub use types::{AnalyticContext, AnalyticModel, AnalyticResolution, AnalyticRule, DocType};
