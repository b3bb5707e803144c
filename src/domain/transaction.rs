use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Amount;

/// A single ledger entry. Transactions are append-only: once recorded they
/// are never edited or deleted, and insertion order is display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub description: String,
    pub category: String,
    pub date: DateTime<Utc>,
    /// Signed amount: positive for income, negative for expenses.
    pub amount: Amount,
    pub is_income: bool,
}

impl Transaction {
    pub fn new(
        description: String,
        category: String,
        date: DateTime<Utc>,
        amount: Amount,
    ) -> Self {
        Self {
            description,
            category,
            date,
            amount,
            is_income: amount > 0,
        }
    }
}
