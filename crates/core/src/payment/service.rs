//! Allocation validation and paid-amount recomputation.

use rust_decimal::Decimal;
use tectona_shared::types::DocumentId;

use super::error::AllocationError;
use super::types::AllocationInput;

/// Stateless service for payment allocation rules.
///
/// All checks are pure; the db crate runs them before and inside the
/// payment-creation transaction so a failing allocation never leaves a
/// partial payment behind.
pub struct PaymentService;

impl PaymentService {
    /// Validates an allocation set against the payment amount.
    ///
    /// Fails fast, before any write:
    /// - the payment amount must be positive
    /// - every allocation amount must be positive
    /// - the allocation sum must not exceed the payment amount
    ///
    /// # Errors
    ///
    /// Returns `AllocationError` describing the first violated rule.
    pub fn validate_allocations(
        payment_amount: Decimal,
        allocations: &[AllocationInput],
    ) -> Result<(), AllocationError> {
        if payment_amount <= Decimal::ZERO {
            return Err(AllocationError::NonPositiveAmount(payment_amount));
        }

        for allocation in allocations {
            if allocation.amount <= Decimal::ZERO {
                return Err(AllocationError::NonPositiveAllocation(allocation.amount));
            }
        }

        let allocated: Decimal = allocations.iter().map(|a| a.amount).sum();
        if allocated > payment_amount {
            return Err(AllocationError::InvalidAllocation {
                allocated,
                amount: payment_amount,
            });
        }

        Ok(())
    }

    /// Validates a single allocation against its target's remaining balance.
    ///
    /// # Errors
    ///
    /// Returns `AllocationExceedsBalance` when the requested amount is
    /// larger than `total - paid`.
    pub fn validate_against_balance(
        target_id: DocumentId,
        target_total: Decimal,
        target_paid: Decimal,
        requested: Decimal,
    ) -> Result<(), AllocationError> {
        let remaining = target_total - target_paid;
        if requested > remaining {
            return Err(AllocationError::AllocationExceedsBalance {
                target_id: target_id.into_inner(),
                requested,
                remaining,
            });
        }
        Ok(())
    }

    /// Recomputes a document's paid amount from its posted allocations.
    ///
    /// Always a sum over source rows, never an increment, so re-running
    /// after retried writes yields the same result.
    #[must_use]
    pub fn recompute_paid(posted_allocation_amounts: &[Decimal]) -> Decimal {
        posted_allocation_amounts.iter().copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::types::AllocationTargetType;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn make_allocation(amount: Decimal) -> AllocationInput {
        AllocationInput {
            target_type: AllocationTargetType::CustomerInvoice,
            target_id: DocumentId::new(),
            amount,
        }
    }

    #[test]
    fn test_validate_allocations_within_amount() {
        let allocations = vec![make_allocation(dec!(40000)), make_allocation(dec!(33750))];
        assert!(PaymentService::validate_allocations(dec!(73750), &allocations).is_ok());
    }

    #[test]
    fn test_validate_allocations_exact_amount() {
        let allocations = vec![make_allocation(dec!(100))];
        assert!(PaymentService::validate_allocations(dec!(100), &allocations).is_ok());
    }

    #[test]
    fn test_validate_allocations_sum_exceeds_amount() {
        let allocations = vec![make_allocation(dec!(60)), make_allocation(dec!(50))];
        let result = PaymentService::validate_allocations(dec!(100), &allocations);
        assert!(matches!(
            result,
            Err(AllocationError::InvalidAllocation {
                allocated,
                amount,
            }) if allocated == dec!(110) && amount == dec!(100)
        ));
    }

    #[test]
    fn test_validate_allocations_empty_set_ok() {
        // A payment may be created unallocated and matched later.
        assert!(PaymentService::validate_allocations(dec!(100), &[]).is_ok());
    }

    #[test]
    fn test_validate_allocations_zero_amount_rejected() {
        let allocations = vec![make_allocation(dec!(0))];
        assert!(matches!(
            PaymentService::validate_allocations(dec!(100), &allocations),
            Err(AllocationError::NonPositiveAllocation(_))
        ));
    }

    #[test]
    fn test_validate_allocations_negative_amount_rejected() {
        let allocations = vec![make_allocation(dec!(-5))];
        assert!(matches!(
            PaymentService::validate_allocations(dec!(100), &allocations),
            Err(AllocationError::NonPositiveAllocation(_))
        ));
    }

    #[test]
    fn test_validate_allocations_nonpositive_payment_rejected() {
        assert!(matches!(
            PaymentService::validate_allocations(dec!(0), &[]),
            Err(AllocationError::NonPositiveAmount(_))
        ));
        assert!(matches!(
            PaymentService::validate_allocations(dec!(-10), &[]),
            Err(AllocationError::NonPositiveAmount(_))
        ));
    }

    #[test]
    fn test_validate_against_balance_within_remaining() {
        let target = DocumentId::new();
        assert!(
            PaymentService::validate_against_balance(target, dec!(73750), dec!(40000), dec!(33750))
                .is_ok()
        );
    }

    #[test]
    fn test_validate_against_balance_exceeds_remaining() {
        let target = DocumentId::new();
        let result =
            PaymentService::validate_against_balance(target, dec!(73750), dec!(40000), dec!(40000));
        assert!(matches!(
            result,
            Err(AllocationError::AllocationExceedsBalance {
                remaining,
                ..
            }) if remaining == dec!(33750)
        ));
    }

    #[test]
    fn test_validate_against_balance_fully_paid_rejects_any_positive() {
        // Remaining zero: any further positive allocation must fail.
        let target = DocumentId::new();
        let result =
            PaymentService::validate_against_balance(target, dec!(73750), dec!(73750), dec!(0.01));
        assert!(matches!(
            result,
            Err(AllocationError::AllocationExceedsBalance { .. })
        ));
    }

    #[test]
    fn test_recompute_paid_sums_source_rows() {
        assert_eq!(
            PaymentService::recompute_paid(&[dec!(40000), dec!(33750)]),
            dec!(73750)
        );
        assert_eq!(PaymentService::recompute_paid(&[]), dec!(0));
    }

    proptest! {
        /// Any allocation set whose sum exceeds the payment amount is rejected,
        /// and any set within it (with positive amounts) is accepted.
        #[test]
        fn prop_allocation_ceiling(
            payment_cents in 1i64..10_000_000,
            allocation_cents in prop::collection::vec(1i64..1_000_000, 0..8),
        ) {
            let payment = Decimal::new(payment_cents, 2);
            let allocations: Vec<AllocationInput> = allocation_cents
                .iter()
                .map(|&c| make_allocation(Decimal::new(c, 2)))
                .collect();
            let allocated: Decimal = allocations.iter().map(|a| a.amount).sum();

            let result = PaymentService::validate_allocations(payment, &allocations);
            if allocated > payment {
                let is_invalid_allocation =
                    matches!(result, Err(AllocationError::InvalidAllocation { .. }));
                prop_assert!(is_invalid_allocation);
            } else {
                prop_assert!(result.is_ok());
            }
        }

        /// An allocation is accepted exactly when it fits the remaining balance.
        #[test]
        fn prop_balance_ceiling(
            total_cents in 0i64..10_000_000,
            paid_cents in 0i64..10_000_000,
            requested_cents in 1i64..10_000_000,
        ) {
            prop_assume!(paid_cents <= total_cents);
            let target = DocumentId::new();
            let total = Decimal::new(total_cents, 2);
            let paid = Decimal::new(paid_cents, 2);
            let requested = Decimal::new(requested_cents, 2);

            let result =
                PaymentService::validate_against_balance(target, total, paid, requested);
            if requested > total - paid {
                let is_exceeds_balance = matches!(
                    result,
                    Err(AllocationError::AllocationExceedsBalance { .. })
                );
                prop_assert!(is_exceeds_balance);
            } else {
                prop_assert!(result.is_ok());
            }
        }
    }
}
