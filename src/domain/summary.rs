use serde::{Deserialize, Serialize};

/// Amounts are whole currency units stored as signed 64-bit integers.
/// SQLite has no unsigned column type, so non-negativity is enforced at the
/// service boundary rather than in the representation.
pub type Amount = i64;

/// Per-account financial summary with derived aggregates.
///
/// `savings_rate` and `total_balance` are never stored independently of the
/// income/expense totals they derive from: every constructor and mutation
/// recomputes them, so a summary read back from storage always satisfies the
/// formulas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialData {
    pub monthly_income: Amount,
    pub monthly_expenses: Amount,
    /// Percentage of income retained after expenses, truncated (0-100).
    pub savings_rate: Amount,
    pub total_balance: Amount,
}

impl FinancialData {
    /// Build a summary from income/expense totals, computing the derived
    /// fields. Callers must have validated `income >= expenses >= 0`.
    pub fn from_totals(income: Amount, expenses: Amount) -> Self {
        Self {
            monthly_income: income,
            monthly_expenses: expenses,
            savings_rate: savings_rate(income, expenses),
            total_balance: income - expenses,
        }
    }

    /// Fold a signed transaction amount into the running totals: positive
    /// amounts accumulate into income, negative ones (by absolute value)
    /// into expenses. Returns `None` when the fold would overflow the
    /// 64-bit totals.
    pub fn with_transaction(self, amount: Amount) -> Option<Self> {
        let (income, expenses) = if amount > 0 {
            (self.monthly_income.checked_add(amount)?, self.monthly_expenses)
        } else {
            (
                self.monthly_income,
                self.monthly_expenses.checked_add(amount.checked_abs()?)?,
            )
        };
        Some(Self::from_totals(income, expenses))
    }
}

/// Savings rate formula: 0 when there is no income, otherwise the retained
/// share of income as a truncated percentage (100 when expenses are zero).
/// The intermediate product is widened to i128 so totals near `i64::MAX`
/// cannot overflow; the result is always 0-100.
pub fn savings_rate(income: Amount, expenses: Amount) -> Amount {
    if income == 0 {
        0
    } else {
        ((income as i128 - expenses as i128) * 100 / income as i128) as Amount
    }
}
