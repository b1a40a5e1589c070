//! Payment error types.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while validating or applying a payment.
#[derive(Debug, Error)]
pub enum AllocationError {
    /// The allocation set sums past the payment amount.
    #[error("Allocated total {allocated} exceeds payment amount {amount}")]
    InvalidAllocation {
        /// Sum of the requested allocations.
        allocated: Decimal,
        /// The payment amount available.
        amount: Decimal,
    },

    /// An allocation amount is zero or negative.
    #[error("Allocation amount must be positive, got {0}")]
    NonPositiveAllocation(Decimal),

    /// Payment amount is zero or negative.
    #[error("Payment amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// A single allocation exceeds the target's remaining balance.
    #[error("Allocation {requested} exceeds remaining balance {remaining} of target {target_id}")]
    AllocationExceedsBalance {
        /// The allocation target.
        target_id: Uuid,
        /// The amount requested.
        requested: Decimal,
        /// What the target still has outstanding.
        remaining: Decimal,
    },

    /// Allocation target document does not exist.
    #[error("Allocation target not found: {0}")]
    TargetNotFound(Uuid),
}

impl AllocationError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAllocation { .. }
            | Self::NonPositiveAllocation(_)
            | Self::NonPositiveAmount(_)
            | Self::AllocationExceedsBalance { .. } => "INVALID_ALLOCATION",
            Self::TargetNotFound(_) => "NOT_FOUND",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AllocationError::InvalidAllocation {
                allocated: dec!(100),
                amount: dec!(50),
            }
            .error_code(),
            "INVALID_ALLOCATION"
        );
        assert_eq!(
            AllocationError::AllocationExceedsBalance {
                target_id: Uuid::nil(),
                requested: dec!(10),
                remaining: dec!(0),
            }
            .error_code(),
            "INVALID_ALLOCATION"
        );
        assert_eq!(
            AllocationError::TargetNotFound(Uuid::nil()).error_code(),
            "NOT_FOUND"
        );
    }

    #[test]
    fn test_error_display() {
        let err = AllocationError::InvalidAllocation {
            allocated: dec!(100.00),
            amount: dec!(75.00),
        };
        assert_eq!(
            err.to_string(),
            "Allocated total 100.00 exceeds payment amount 75.00"
        );
    }
}
