//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `PaymentId` where a
//! `DocumentId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

typed_id!(CompanyId, "Unique identifier for a company.");
typed_id!(ContactId, "Unique identifier for a contact.");
typed_id!(ContactTagId, "Unique identifier for a contact tag.");
typed_id!(ProductId, "Unique identifier for a product.");
typed_id!(CategoryId, "Unique identifier for a product category.");
typed_id!(GlAccountId, "Unique identifier for a general-ledger account.");
typed_id!(
    AnalyticAccountId,
    "Unique identifier for an analytic (cost-center) account."
);
typed_id!(
    AnalyticModelId,
    "Unique identifier for an auto-analytic model."
);
typed_id!(AnalyticRuleId, "Unique identifier for an auto-analytic rule.");
typed_id!(DocumentId, "Unique identifier for a commercial document.");
typed_id!(DocumentLineId, "Unique identifier for a document line.");
typed_id!(PaymentId, "Unique identifier for a payment.");
typed_id!(
    AllocationId,
    "Unique identifier for a payment allocation."
);
typed_id!(JournalEntryId, "Unique identifier for a journal entry.");
typed_id!(JournalLineId, "Unique identifier for a journal line.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_typed_ids_are_distinct_types() {
        // Compile-time check: these are separate types wrapping the same UUID.
        let uuid = Uuid::new_v4();
        let doc = DocumentId::from_uuid(uuid);
        let pay = PaymentId::from_uuid(uuid);
        assert_eq!(doc.into_inner(), pay.into_inner());
    }

    #[test]
    fn test_new_ids_are_unique() {
        let a = JournalEntryId::new();
        let b = JournalEntryId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_display_and_parse_roundtrip() {
        let id = GlAccountId::new();
        let parsed = GlAccountId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_parse_invalid_fails() {
        assert!(CompanyId::from_str("not-a-uuid").is_err());
    }

    #[test]
    fn test_uuid_conversions() {
        let uuid = Uuid::new_v4();
        let id: PaymentId = uuid.into();
        let back: Uuid = id.into();
        assert_eq!(uuid, back);
    }
}
