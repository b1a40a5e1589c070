//! Rule matching and ranking for analytic account resolution.

use super::types::{AnalyticContext, AnalyticModel, AnalyticResolution, AnalyticRule};

/// Stateless engine for resolving the analytic account of a document line.
pub struct AnalyticEngine;

impl AnalyticEngine {
    /// Resolve the best-matching analytic account for a context.
    ///
    /// Candidates are rules whose document type matches the context and
    /// that have at least one set predicate matching it. Ranking:
    ///
    /// 1. Descending matched-predicate count (more specific wins)
    /// 2. Ascending model priority
    /// 3. Ascending rule priority
    ///
    /// Rules with no predicates set are skipped entirely; they are never
    /// candidates, so an accidentally-empty rule cannot act as a
    /// catch-all. Same inputs always produce the same result: the ranking
    /// key is total except for exact (count, model, rule-priority) ties,
    /// which fall back to input order; the repository loads models and
    /// rules in a fixed order, keeping those ties stable too.
    ///
    /// Returns `None` when no rule matched at least one predicate; callers
    /// treat that as "no auto-assignment".
    #[must_use]
    pub fn resolve(
        models: &[AnalyticModel],
        context: &AnalyticContext,
    ) -> Option<AnalyticResolution> {
        let mut best: Option<(u8, i16, i16, AnalyticResolution)> = None;

        for model in models {
            for rule in &model.rules {
                if rule.doc_type != context.doc_type {
                    continue;
                }

                let Some(matched) = Self::matched_fields(rule, context) else {
                    // No predicates set: never a candidate.
                    continue;
                };
                if matched == 0 {
                    continue;
                }

                let candidate = (
                    matched,
                    model.priority,
                    rule.rule_priority,
                    AnalyticResolution {
                        analytic_account_id: rule.assign_analytic_account_id,
                        model_id: model.id,
                        rule_id: rule.id,
                        matched_fields: matched,
                    },
                );

                best = match best {
                    None => Some(candidate),
                    Some(current) => {
                        if Self::outranks(&candidate, &current) {
                            Some(candidate)
                        } else {
                            Some(current)
                        }
                    }
                };
            }
        }

        best.map(|(_, _, _, resolution)| resolution)
    }

    /// Counts how many of the rule's set predicates match the context.
    ///
    /// Returns `None` when the rule has no predicates set at all.
    fn matched_fields(rule: &AnalyticRule, context: &AnalyticContext) -> Option<u8> {
        let mut set = 0u8;
        let mut matched = 0u8;

        if let Some(product_id) = rule.match_product_id {
            set += 1;
            if context.product_id == Some(product_id) {
                matched += 1;
            }
        }
        if let Some(category_id) = rule.match_category_id {
            set += 1;
            if context.category_id == Some(category_id) {
                matched += 1;
            }
        }
        if let Some(contact_id) = rule.match_contact_id {
            set += 1;
            if context.contact_id == Some(contact_id) {
                matched += 1;
            }
        }
        if let Some(tag_id) = rule.match_contact_tag_id {
            set += 1;
            if context.contact_tag_ids.contains(&tag_id) {
                matched += 1;
            }
        }

        if set == 0 { None } else { Some(matched) }
    }

    /// True when `candidate` strictly outranks `current`.
    ///
    /// Strict comparison keeps the first-seen candidate on exact ties,
    /// which makes resolution stable for a fixed input order.
    fn outranks(
        candidate: &(u8, i16, i16, AnalyticResolution),
        current: &(u8, i16, i16, AnalyticResolution),
    ) -> bool {
        let candidate_key = (std::cmp::Reverse(candidate.0), candidate.1, candidate.2);
        let current_key = (std::cmp::Reverse(current.0), current.1, current.2);
        candidate_key < current_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytic::types::DocType;
    use tectona_shared::types::{
        AnalyticAccountId, AnalyticModelId, AnalyticRuleId, CategoryId, CompanyId, ContactId,
        ContactTagId, ProductId,
    };

    fn make_context(doc_type: DocType) -> AnalyticContext {
        AnalyticContext {
            company_id: CompanyId::new(),
            doc_type,
            product_id: None,
            category_id: None,
            contact_id: None,
            contact_tag_ids: vec![],
        }
    }

    fn make_rule(doc_type: DocType, rule_priority: i16) -> AnalyticRule {
        AnalyticRule {
            id: AnalyticRuleId::new(),
            doc_type,
            match_product_id: None,
            match_category_id: None,
            match_contact_id: None,
            match_contact_tag_id: None,
            assign_analytic_account_id: AnalyticAccountId::new(),
            rule_priority,
        }
    }

    fn make_model(priority: i16, rules: Vec<AnalyticRule>) -> AnalyticModel {
        AnalyticModel {
            id: AnalyticModelId::new(),
            priority,
            rules,
        }
    }

    #[test]
    fn test_no_models_resolves_none() {
        let context = make_context(DocType::CustomerInvoice);
        assert_eq!(AnalyticEngine::resolve(&[], &context), None);
    }

    #[test]
    fn test_zero_predicate_rule_never_matches() {
        // A rule with no predicates set must not act as a catch-all.
        let rule = make_rule(DocType::CustomerInvoice, 1);
        let models = vec![make_model(1, vec![rule])];
        let context = make_context(DocType::CustomerInvoice);

        assert_eq!(AnalyticEngine::resolve(&models, &context), None);
    }

    #[test]
    fn test_single_predicate_match() {
        let product_id = ProductId::new();
        let mut rule = make_rule(DocType::CustomerInvoice, 1);
        rule.match_product_id = Some(product_id);
        let rule_id = rule.id;
        let account_id = rule.assign_analytic_account_id;
        let model = make_model(10, vec![rule]);
        let model_id = model.id;

        let mut context = make_context(DocType::CustomerInvoice);
        context.product_id = Some(product_id);

        let resolution = AnalyticEngine::resolve(&[model], &context).unwrap();
        assert_eq!(resolution.analytic_account_id, account_id);
        assert_eq!(resolution.model_id, model_id);
        assert_eq!(resolution.rule_id, rule_id);
        assert_eq!(resolution.matched_fields, 1);
    }

    #[test]
    fn test_set_predicate_mismatch_counts_zero() {
        // The rule's only predicate does not match, so it is not a candidate.
        let mut rule = make_rule(DocType::CustomerInvoice, 1);
        rule.match_product_id = Some(ProductId::new());
        let models = vec![make_model(1, vec![rule])];

        let mut context = make_context(DocType::CustomerInvoice);
        context.product_id = Some(ProductId::new());

        assert_eq!(AnalyticEngine::resolve(&models, &context), None);
    }

    #[test]
    fn test_doc_type_mismatch_skipped() {
        let product_id = ProductId::new();
        let mut rule = make_rule(DocType::VendorBill, 1);
        rule.match_product_id = Some(product_id);
        let models = vec![make_model(1, vec![rule])];

        let mut context = make_context(DocType::CustomerInvoice);
        context.product_id = Some(product_id);

        assert_eq!(AnalyticEngine::resolve(&models, &context), None);
    }

    #[test]
    fn test_more_specific_rule_wins() {
        let product_id = ProductId::new();
        let contact_id = ContactId::new();

        // One predicate matched.
        let mut broad = make_rule(DocType::VendorBill, 1);
        broad.match_product_id = Some(product_id);

        // Two predicates matched, despite a worse rule priority.
        let mut specific = make_rule(DocType::VendorBill, 5);
        specific.match_product_id = Some(product_id);
        specific.match_contact_id = Some(contact_id);
        let specific_id = specific.id;

        let models = vec![make_model(1, vec![broad, specific])];

        let mut context = make_context(DocType::VendorBill);
        context.product_id = Some(product_id);
        context.contact_id = Some(contact_id);

        let resolution = AnalyticEngine::resolve(&models, &context).unwrap();
        assert_eq!(resolution.rule_id, specific_id);
        assert_eq!(resolution.matched_fields, 2);
    }

    #[test]
    fn test_model_priority_breaks_ties() {
        // Two rules, each matching on product (count 1), under models with
        // priority 10 and 20. The priority-10 model's rule must win even
        // when listed second.
        let product_id = ProductId::new();

        let mut rule_a = make_rule(DocType::CustomerInvoice, 1);
        rule_a.match_product_id = Some(product_id);

        let mut rule_b = make_rule(DocType::CustomerInvoice, 1);
        rule_b.match_product_id = Some(product_id);
        let winner_id = rule_b.id;

        let low_priority_model = make_model(20, vec![rule_a]);
        let high_priority_model = make_model(10, vec![rule_b]);

        let mut context = make_context(DocType::CustomerInvoice);
        context.product_id = Some(product_id);

        // Insertion order must not matter.
        let models = vec![low_priority_model.clone(), high_priority_model.clone()];
        let resolution = AnalyticEngine::resolve(&models, &context).unwrap();
        assert_eq!(resolution.rule_id, winner_id);

        let models = vec![high_priority_model, low_priority_model];
        let resolution = AnalyticEngine::resolve(&models, &context).unwrap();
        assert_eq!(resolution.rule_id, winner_id);
    }

    #[test]
    fn test_rule_priority_breaks_ties_within_model() {
        let category_id = CategoryId::new();

        let mut late = make_rule(DocType::PurchaseOrder, 9);
        late.match_category_id = Some(category_id);

        let mut early = make_rule(DocType::PurchaseOrder, 2);
        early.match_category_id = Some(category_id);
        let winner_id = early.id;

        let models = vec![make_model(1, vec![late, early])];

        let mut context = make_context(DocType::PurchaseOrder);
        context.category_id = Some(category_id);

        let resolution = AnalyticEngine::resolve(&models, &context).unwrap();
        assert_eq!(resolution.rule_id, winner_id);
    }

    #[test]
    fn test_contact_tag_matching() {
        let tag_id = ContactTagId::new();
        let mut rule = make_rule(DocType::SalesOrder, 1);
        rule.match_contact_tag_id = Some(tag_id);
        let rule_id = rule.id;
        let models = vec![make_model(1, vec![rule])];

        let mut context = make_context(DocType::SalesOrder);
        context.contact_tag_ids = vec![ContactTagId::new(), tag_id];

        let resolution = AnalyticEngine::resolve(&models, &context).unwrap();
        assert_eq!(resolution.rule_id, rule_id);
        assert_eq!(resolution.matched_fields, 1);
    }

    #[test]
    fn test_all_four_predicates_matched() {
        let product_id = ProductId::new();
        let category_id = CategoryId::new();
        let contact_id = ContactId::new();
        let tag_id = ContactTagId::new();

        let mut rule = make_rule(DocType::CustomerInvoice, 1);
        rule.match_product_id = Some(product_id);
        rule.match_category_id = Some(category_id);
        rule.match_contact_id = Some(contact_id);
        rule.match_contact_tag_id = Some(tag_id);
        let models = vec![make_model(1, vec![rule])];

        let mut context = make_context(DocType::CustomerInvoice);
        context.product_id = Some(product_id);
        context.category_id = Some(category_id);
        context.contact_id = Some(contact_id);
        context.contact_tag_ids = vec![tag_id];

        let resolution = AnalyticEngine::resolve(&models, &context).unwrap();
        assert_eq!(resolution.matched_fields, 4);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        // Same inputs must always produce the same result.
        let product_id = ProductId::new();
        let contact_id = ContactId::new();

        let mut rule_a = make_rule(DocType::CustomerInvoice, 3);
        rule_a.match_product_id = Some(product_id);
        let mut rule_b = make_rule(DocType::CustomerInvoice, 1);
        rule_b.match_contact_id = Some(contact_id);
        let models = vec![make_model(5, vec![rule_a]), make_model(7, vec![rule_b])];

        let mut context = make_context(DocType::CustomerInvoice);
        context.product_id = Some(product_id);
        context.contact_id = Some(contact_id);

        let first = AnalyticEngine::resolve(&models, &context);
        for _ in 0..10 {
            assert_eq!(AnalyticEngine::resolve(&models, &context), first);
        }
    }
}
