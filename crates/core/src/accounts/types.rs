//! Account domain types and canonical default account definitions.

use serde::{Deserialize, Serialize};
use tectona_shared::types::GlAccountId;

/// General-ledger account classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Asset account (cash, receivables).
    Asset,
    /// Liability account (payables).
    Liability,
    /// Income account (revenue).
    Income,
    /// Expense account.
    Expense,
}

impl AccountType {
    /// Returns the string representation used by the persistence layer.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

/// The five default accounts every company's ledger needs before any
/// document can be posted.
///
/// Each kind carries a fixed (code, name, type) triple. The persistence
/// layer upserts on (company, code), so re-running the resolver corrects
/// name/type drift without creating duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefaultAccountKind {
    /// Cash on hand / bank.
    Cash,
    /// Accounts receivable.
    Receivable,
    /// Accounts payable.
    Payable,
    /// Sales revenue.
    Revenue,
    /// Operating expenses.
    Expense,
}

impl DefaultAccountKind {
    /// All default account kinds, in upsert order.
    pub const ALL: [Self; 5] = [
        Self::Cash,
        Self::Receivable,
        Self::Payable,
        Self::Revenue,
        Self::Expense,
    ];

    /// The account code, unique per company.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Cash => "1000",
            Self::Receivable => "1100",
            Self::Payable => "2000",
            Self::Revenue => "4000",
            Self::Expense => "5000",
        }
    }

    /// The human-readable account name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Receivable => "Accounts Receivable",
            Self::Payable => "Accounts Payable",
            Self::Revenue => "Sales Revenue",
            Self::Expense => "Operating Expenses",
        }
    }

    /// The account classification.
    #[must_use]
    pub const fn account_type(&self) -> AccountType {
        match self {
            Self::Cash | Self::Receivable => AccountType::Asset,
            Self::Payable => AccountType::Liability,
            Self::Revenue => AccountType::Income,
            Self::Expense => AccountType::Expense,
        }
    }
}

/// The resolved default account ids for one company.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountSet {
    /// Cash account id.
    pub cash: GlAccountId,
    /// Accounts receivable id.
    pub receivable: GlAccountId,
    /// Accounts payable id.
    pub payable: GlAccountId,
    /// Sales revenue id.
    pub revenue: GlAccountId,
    /// Operating expenses id.
    pub expense: GlAccountId,
}

impl AccountSet {
    /// Returns the account id for the given default kind.
    #[must_use]
    pub const fn get(&self, kind: DefaultAccountKind) -> GlAccountId {
        match kind {
            DefaultAccountKind::Cash => self.cash,
            DefaultAccountKind::Receivable => self.receivable,
            DefaultAccountKind::Payable => self.payable,
            DefaultAccountKind::Revenue => self.revenue,
            DefaultAccountKind::Expense => self.expense,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_account_codes_are_unique() {
        let codes: HashSet<_> = DefaultAccountKind::ALL.iter().map(|k| k.code()).collect();
        assert_eq!(codes.len(), DefaultAccountKind::ALL.len());
    }

    #[test]
    fn test_default_account_types() {
        assert_eq!(DefaultAccountKind::Cash.account_type(), AccountType::Asset);
        assert_eq!(
            DefaultAccountKind::Receivable.account_type(),
            AccountType::Asset
        );
        assert_eq!(
            DefaultAccountKind::Payable.account_type(),
            AccountType::Liability
        );
        assert_eq!(
            DefaultAccountKind::Revenue.account_type(),
            AccountType::Income
        );
        assert_eq!(
            DefaultAccountKind::Expense.account_type(),
            AccountType::Expense
        );
    }

    #[test]
    fn test_account_type_as_str() {
        assert_eq!(AccountType::Asset.as_str(), "asset");
        assert_eq!(AccountType::Liability.as_str(), "liability");
        assert_eq!(AccountType::Income.as_str(), "income");
        assert_eq!(AccountType::Expense.as_str(), "expense");
    }

    #[test]
    fn test_account_set_get() {
        let set = AccountSet {
            cash: GlAccountId::new(),
            receivable: GlAccountId::new(),
            payable: GlAccountId::new(),
            revenue: GlAccountId::new(),
            expense: GlAccountId::new(),
        };
        assert_eq!(set.get(DefaultAccountKind::Cash), set.cash);
        assert_eq!(set.get(DefaultAccountKind::Receivable), set.receivable);
        assert_eq!(set.get(DefaultAccountKind::Payable), set.payable);
        assert_eq!(set.get(DefaultAccountKind::Revenue), set.revenue);
        assert_eq!(set.get(DefaultAccountKind::Expense), set.expense);
    }
}
