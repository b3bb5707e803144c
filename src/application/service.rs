use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};

use crate::domain::{
    AccountId, Amount, Budget, EventListener, FinancialData, LedgerEvent, SavingsGoal, Transaction,
};
use crate::storage::Repository;

use super::AppError;

/// Application service providing high-level ledger operations.
/// This is the primary interface for any client (CLI, API, TUI, etc.).
///
/// Every operation is scoped to the caller-supplied `AccountId`; accounts
/// never observe each other's state. Each mutation validates its invariants
/// first, commits atomically, then notifies subscribed listeners with the
/// post-mutation values. Mutations hold a per-account lock for their full
/// read-modify-write span, so same-account mutations serialize while
/// different accounts and all reads proceed concurrently.
pub struct LedgerService {
    repo: Repository,
    listeners: Vec<EventListener>,
    mutation_locks: Mutex<HashMap<AccountId, Arc<Mutex<()>>>>,
}

/// Result of recording a transaction: the stored entry plus the summary it
/// folded into.
#[derive(Debug)]
pub struct TransactionResult {
    pub transaction: Transaction,
    pub summary: FinancialData,
}

impl LedgerService {
    /// Create a new ledger service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self {
            repo,
            listeners: Vec::new(),
            mutation_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Register an observer for committed mutations. Listeners run after the
    /// storage commit; they cannot veto or roll back.
    pub fn subscribe(&mut self, listener: EventListener) {
        self.listeners.push(listener);
    }

    /// Take the account's mutation lock. Without it, two concurrent
    /// read-modify-write mutations could read the same baseline and the
    /// later commit would silently drop the earlier fold.
    async fn lock_account(&self, account: &AccountId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.mutation_locks.lock().await;
            Arc::clone(locks.entry(account.clone()).or_default())
        };
        lock.lock_owned().await
    }

    fn emit(&self, event: LedgerEvent) {
        debug!(account = %event.account(), "emitting ledger event");
        for listener in &self.listeners {
            listener(&event);
        }
    }

    // ========================
    // Financial summary
    // ========================

    /// Replace the account's financial summary with totals derived from the
    /// given income/expense figures. Replace semantics: prior totals are
    /// discarded, unlike `add_transaction` which accumulates.
    pub async fn update_financial_data(
        &self,
        account: &AccountId,
        income: Amount,
        expenses: Amount,
    ) -> Result<FinancialData, AppError> {
        non_negative(income, "Income")?;
        non_negative(expenses, "Expenses")?;
        if income < expenses {
            return Err(AppError::invalid(
                "Income must be greater than or equal to expenses",
            ));
        }

        let data = FinancialData::from_totals(income, expenses);
        let _guard = self.lock_account(account).await;
        self.repo.save_summary(account, &data).await?;

        info!(
            account = %account,
            income = data.monthly_income,
            expenses = data.monthly_expenses,
            savings_rate = data.savings_rate,
            "financial data updated"
        );
        self.emit(LedgerEvent::FinancialDataUpdated {
            account: account.clone(),
            monthly_income: data.monthly_income,
            monthly_expenses: data.monthly_expenses,
            savings_rate: data.savings_rate,
            total_balance: data.total_balance,
        });
        Ok(data)
    }

    /// Read the account's summary. A fresh account reads all zeros.
    pub async fn financial_data(&self, account: &AccountId) -> Result<FinancialData, AppError> {
        Ok(self.repo.get_summary(account).await?.unwrap_or_default())
    }

    // ========================
    // Transactions
    // ========================

    /// Append a transaction and fold its amount into the running summary
    /// (additive semantics). Positive amounts accumulate into income,
    /// negative ones into expenses; the derived fields are recomputed from
    /// the new totals. The append and the summary write commit together.
    pub async fn add_transaction(
        &self,
        account: &AccountId,
        description: String,
        category: String,
        date: DateTime<Utc>,
        amount: Amount,
    ) -> Result<TransactionResult, AppError> {
        let _guard = self.lock_account(account).await;
        let current = self.repo.get_summary(account).await?.unwrap_or_default();
        let summary = current
            .with_transaction(amount)
            .ok_or_else(|| AppError::invalid("Transaction amount overflows summary totals"))?;
        let transaction = Transaction::new(description, category, date, amount);

        self.repo
            .append_transaction(account, &transaction, &summary)
            .await?;

        info!(
            account = %account,
            amount = transaction.amount,
            is_income = transaction.is_income,
            category = %transaction.category,
            "transaction recorded"
        );
        self.emit(LedgerEvent::TransactionAdded {
            account: account.clone(),
            description: transaction.description.clone(),
            category: transaction.category.clone(),
            date: transaction.date,
            amount: transaction.amount,
            is_income: transaction.is_income,
        });
        Ok(TransactionResult {
            transaction,
            summary,
        })
    }

    /// List the account's transactions in insertion order.
    pub async fn transactions(&self, account: &AccountId) -> Result<Vec<Transaction>, AppError> {
        Ok(self.repo.list_transactions(account).await?)
    }

    // ========================
    // Budgets
    // ========================

    /// Append a new budget envelope.
    pub async fn add_budget(
        &self,
        account: &AccountId,
        name: String,
        spent: Amount,
        limit: Amount,
    ) -> Result<Budget, AppError> {
        validate_budget(spent, limit)?;

        let budget = Budget::new(name, spent, limit);
        let _guard = self.lock_account(account).await;
        self.repo.append_budget(account, &budget).await?;

        info!(account = %account, name = %budget.name, "budget added");
        self.emit(LedgerEvent::BudgetAdded {
            account: account.clone(),
            name: budget.name.clone(),
            spent: budget.spent,
            limit: budget.limit,
        });
        Ok(budget)
    }

    /// Replace the budget at `index`. The bounds check runs before the
    /// invariant check, matching the original validation order.
    pub async fn update_budget(
        &self,
        account: &AccountId,
        index: usize,
        spent: Amount,
        limit: Amount,
    ) -> Result<Budget, AppError> {
        let _guard = self.lock_account(account).await;
        let len = self.repo.count_budgets(account).await?;
        if index >= len {
            return Err(AppError::IndexOutOfBounds {
                entity: "budget",
                index,
                len,
            });
        }
        validate_budget(spent, limit)?;

        let existing = self
            .repo
            .get_budget(account, index)
            .await?
            .ok_or(AppError::IndexOutOfBounds {
                entity: "budget",
                index,
                len,
            })?;
        let budget = Budget::new(existing.name, spent, limit);
        self.repo.replace_budget(account, index, &budget).await?;

        info!(account = %account, index, "budget updated");
        self.emit(LedgerEvent::BudgetUpdated {
            account: account.clone(),
            index,
            spent: budget.spent,
            limit: budget.limit,
        });
        Ok(budget)
    }

    /// List the account's budgets in insertion order.
    pub async fn budgets(&self, account: &AccountId) -> Result<Vec<Budget>, AppError> {
        Ok(self.repo.list_budgets(account).await?)
    }

    // ========================
    // Savings goals
    // ========================

    /// Append a new savings goal.
    pub async fn add_savings_goal(
        &self,
        account: &AccountId,
        name: String,
        current: Amount,
        target: Amount,
    ) -> Result<SavingsGoal, AppError> {
        validate_goal(current, target)?;

        let goal = SavingsGoal::new(name, current, target);
        let _guard = self.lock_account(account).await;
        self.repo.append_goal(account, &goal).await?;

        info!(account = %account, name = %goal.name, "savings goal added");
        self.emit(LedgerEvent::SavingsGoalAdded {
            account: account.clone(),
            name: goal.name.clone(),
            current: goal.current,
            target: goal.target,
        });
        Ok(goal)
    }

    /// Replace the savings goal at `index`.
    pub async fn update_savings_goal(
        &self,
        account: &AccountId,
        index: usize,
        current: Amount,
        target: Amount,
    ) -> Result<SavingsGoal, AppError> {
        let _guard = self.lock_account(account).await;
        let len = self.repo.count_goals(account).await?;
        if index >= len {
            return Err(AppError::IndexOutOfBounds {
                entity: "savings goal",
                index,
                len,
            });
        }
        validate_goal(current, target)?;

        let existing =
            self.repo
                .get_goal(account, index)
                .await?
                .ok_or(AppError::IndexOutOfBounds {
                    entity: "savings goal",
                    index,
                    len,
                })?;
        let goal = SavingsGoal::new(existing.name, current, target);
        self.repo.replace_goal(account, index, &goal).await?;

        info!(account = %account, index, "savings goal updated");
        self.emit(LedgerEvent::SavingsGoalUpdated {
            account: account.clone(),
            index,
            current: goal.current,
            target: goal.target,
        });
        Ok(goal)
    }

    /// List the account's savings goals in insertion order.
    pub async fn savings_goals(&self, account: &AccountId) -> Result<Vec<SavingsGoal>, AppError> {
        Ok(self.repo.list_goals(account).await?)
    }
}

fn non_negative(value: Amount, field: &str) -> Result<(), AppError> {
    if value < 0 {
        return Err(AppError::invalid(format!("{} must not be negative", field)));
    }
    Ok(())
}

fn validate_budget(spent: Amount, limit: Amount) -> Result<(), AppError> {
    non_negative(spent, "Spent amount")?;
    non_negative(limit, "Budget limit")?;
    if spent > limit {
        return Err(AppError::invalid("Spent amount cannot exceed budget"));
    }
    Ok(())
}

fn validate_goal(current: Amount, target: Amount) -> Result<(), AppError> {
    non_negative(current, "Current amount")?;
    non_negative(target, "Target amount")?;
    if current > target {
        return Err(AppError::invalid("Current amount cannot exceed target"));
    }
    Ok(())
}
