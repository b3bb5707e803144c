use serde::{Deserialize, Serialize};

use super::Amount;

/// A spending envelope. Budgets are addressed by their position in the
/// account's list and mutated in place; the `spent <= limit` invariant is
/// enforced by the service before any write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub name: String,
    pub spent: Amount,
    pub limit: Amount,
}

impl Budget {
    pub fn new(name: String, spent: Amount, limit: Amount) -> Self {
        Self { name, spent, limit }
    }

    /// Amount still available in this envelope.
    pub fn remaining(&self) -> Amount {
        self.limit - self.spent
    }

    /// Spent share of the limit as a truncated percentage. A zero-limit
    /// budget reports 0. Widened to i128 so large amounts cannot overflow
    /// the intermediate product.
    pub fn percent_used(&self) -> Amount {
        if self.limit == 0 {
            0
        } else {
            (self.spent as i128 * 100 / self.limit as i128) as Amount
        }
    }
}
