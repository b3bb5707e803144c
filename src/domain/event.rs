use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{AccountId, Amount};

/// Change notification emitted after each committed mutation. Each variant
/// carries the post-mutation values, so an observer can mirror state or
/// write an audit trail without re-reading the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    FinancialDataUpdated {
        account: AccountId,
        monthly_income: Amount,
        monthly_expenses: Amount,
        savings_rate: Amount,
        total_balance: Amount,
    },
    TransactionAdded {
        account: AccountId,
        description: String,
        category: String,
        date: DateTime<Utc>,
        amount: Amount,
        is_income: bool,
    },
    BudgetAdded {
        account: AccountId,
        name: String,
        spent: Amount,
        limit: Amount,
    },
    BudgetUpdated {
        account: AccountId,
        index: usize,
        spent: Amount,
        limit: Amount,
    },
    SavingsGoalAdded {
        account: AccountId,
        name: String,
        current: Amount,
        target: Amount,
    },
    SavingsGoalUpdated {
        account: AccountId,
        index: usize,
        current: Amount,
        target: Amount,
    },
}

impl LedgerEvent {
    /// The account this event belongs to.
    pub fn account(&self) -> &AccountId {
        match self {
            LedgerEvent::FinancialDataUpdated { account, .. }
            | LedgerEvent::TransactionAdded { account, .. }
            | LedgerEvent::BudgetAdded { account, .. }
            | LedgerEvent::BudgetUpdated { account, .. }
            | LedgerEvent::SavingsGoalAdded { account, .. }
            | LedgerEvent::SavingsGoalUpdated { account, .. } => account,
        }
    }
}

/// Observer callback invoked with each committed event. Listeners run after
/// the storage commit and cannot veto the mutation.
pub type EventListener = Box<dyn Fn(&LedgerEvent) + Send + Sync>;
