use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use crate::domain::{AccountId, Budget, FinancialData, SavingsGoal, Transaction};

use super::MIGRATION_001_INITIAL;

/// Repository for persisting and querying per-account ledger state.
///
/// Every table is keyed by the account id; no query ever crosses account
/// boundaries. Read-modify-write mutations run inside a single SQLite
/// transaction so a mutation either commits whole or not at all.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given path.
    pub async fn connect(database_url: &str) -> Result<Self> {
        tracing::debug!(database_url, "connecting to database");
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::raw_sql(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // Summary operations
    // ========================

    /// Upsert the account's financial summary.
    pub async fn save_summary(&self, account: &AccountId, data: &FinancialData) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO summaries (account, monthly_income, monthly_expenses, savings_rate, total_balance)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(account) DO UPDATE SET
                monthly_income = excluded.monthly_income,
                monthly_expenses = excluded.monthly_expenses,
                savings_rate = excluded.savings_rate,
                total_balance = excluded.total_balance
            "#,
        )
        .bind(account.as_str())
        .bind(data.monthly_income)
        .bind(data.monthly_expenses)
        .bind(data.savings_rate)
        .bind(data.total_balance)
        .execute(&self.pool)
        .await
        .context("Failed to save summary")?;
        Ok(())
    }

    /// Get the account's financial summary, if any mutation ever wrote one.
    pub async fn get_summary(&self, account: &AccountId) -> Result<Option<FinancialData>> {
        let row = sqlx::query(
            r#"
            SELECT monthly_income, monthly_expenses, savings_rate, total_balance
            FROM summaries
            WHERE account = ?
            "#,
        )
        .bind(account.as_str())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch summary")?;

        Ok(row.map(|row| FinancialData {
            monthly_income: row.get("monthly_income"),
            monthly_expenses: row.get("monthly_expenses"),
            savings_rate: row.get("savings_rate"),
            total_balance: row.get("total_balance"),
        }))
    }

    // ========================
    // Transaction operations
    // ========================

    /// Append a transaction and write the recomputed summary in one SQLite
    /// transaction. Insertion order is preserved by the autoincrement id.
    pub async fn append_transaction(
        &self,
        account: &AccountId,
        transaction: &Transaction,
        summary: &FinancialData,
    ) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        sqlx::query(
            r#"
            INSERT INTO transactions (account, description, category, date, amount, is_income)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(account.as_str())
        .bind(&transaction.description)
        .bind(&transaction.category)
        .bind(transaction.date.to_rfc3339())
        .bind(transaction.amount)
        .bind(transaction.is_income)
        .execute(&mut *tx)
        .await
        .context("Failed to append transaction")?;

        sqlx::query(
            r#"
            INSERT INTO summaries (account, monthly_income, monthly_expenses, savings_rate, total_balance)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(account) DO UPDATE SET
                monthly_income = excluded.monthly_income,
                monthly_expenses = excluded.monthly_expenses,
                savings_rate = excluded.savings_rate,
                total_balance = excluded.total_balance
            "#,
        )
        .bind(account.as_str())
        .bind(summary.monthly_income)
        .bind(summary.monthly_expenses)
        .bind(summary.savings_rate)
        .bind(summary.total_balance)
        .execute(&mut *tx)
        .await
        .context("Failed to update summary")?;

        tx.commit().await.context("Failed to commit transaction")?;
        Ok(())
    }

    /// List the account's transactions in insertion order.
    pub async fn list_transactions(&self, account: &AccountId) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(
            r#"
            SELECT description, category, date, amount, is_income
            FROM transactions
            WHERE account = ?
            ORDER BY id
            "#,
        )
        .bind(account.as_str())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list transactions")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    fn row_to_transaction(row: &sqlx::sqlite::SqliteRow) -> Result<Transaction> {
        let date_str: String = row.get("date");

        Ok(Transaction {
            description: row.get("description"),
            category: row.get("category"),
            date: DateTime::parse_from_rfc3339(&date_str)
                .context("Invalid transaction date")?
                .with_timezone(&Utc),
            amount: row.get("amount"),
            is_income: row.get::<i32, _>("is_income") != 0,
        })
    }

    // ========================
    // Budget operations
    // ========================

    /// Append a budget at the next free position for the account.
    pub async fn append_budget(&self, account: &AccountId, budget: &Budget) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let position: i64 = sqlx::query("SELECT COUNT(*) as count FROM budgets WHERE account = ?")
            .bind(account.as_str())
            .fetch_one(&mut *tx)
            .await
            .context("Failed to count budgets")?
            .get("count");

        sqlx::query(
            r#"
            INSERT INTO budgets (account, position, name, spent, limit_amount)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(account.as_str())
        .bind(position)
        .bind(&budget.name)
        .bind(budget.spent)
        .bind(budget.limit)
        .execute(&mut *tx)
        .await
        .context("Failed to append budget")?;

        tx.commit().await.context("Failed to commit budget")?;
        Ok(())
    }

    /// Number of budgets the account holds.
    pub async fn count_budgets(&self, account: &AccountId) -> Result<usize> {
        let count: i64 = sqlx::query("SELECT COUNT(*) as count FROM budgets WHERE account = ?")
            .bind(account.as_str())
            .fetch_one(&self.pool)
            .await
            .context("Failed to count budgets")?
            .get("count");
        Ok(count as usize)
    }

    /// Get the budget at a position, if present.
    pub async fn get_budget(&self, account: &AccountId, index: usize) -> Result<Option<Budget>> {
        let row = sqlx::query(
            r#"
            SELECT name, spent, limit_amount
            FROM budgets
            WHERE account = ? AND position = ?
            "#,
        )
        .bind(account.as_str())
        .bind(index as i64)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch budget")?;

        Ok(row.map(|row| Budget {
            name: row.get("name"),
            spent: row.get("spent"),
            limit: row.get("limit_amount"),
        }))
    }

    /// Replace the budget fields at a position.
    pub async fn replace_budget(
        &self,
        account: &AccountId,
        index: usize,
        budget: &Budget,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE budgets
            SET name = ?, spent = ?, limit_amount = ?
            WHERE account = ? AND position = ?
            "#,
        )
        .bind(&budget.name)
        .bind(budget.spent)
        .bind(budget.limit)
        .bind(account.as_str())
        .bind(index as i64)
        .execute(&self.pool)
        .await
        .context("Failed to update budget")?;
        Ok(())
    }

    /// List the account's budgets in insertion order.
    pub async fn list_budgets(&self, account: &AccountId) -> Result<Vec<Budget>> {
        let rows = sqlx::query(
            r#"
            SELECT name, spent, limit_amount
            FROM budgets
            WHERE account = ?
            ORDER BY position
            "#,
        )
        .bind(account.as_str())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list budgets")?;

        Ok(rows
            .iter()
            .map(|row| Budget {
                name: row.get("name"),
                spent: row.get("spent"),
                limit: row.get("limit_amount"),
            })
            .collect())
    }

    // ========================
    // Savings goal operations
    // ========================

    /// Append a savings goal at the next free position for the account.
    pub async fn append_goal(&self, account: &AccountId, goal: &SavingsGoal) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let position: i64 =
            sqlx::query("SELECT COUNT(*) as count FROM savings_goals WHERE account = ?")
                .bind(account.as_str())
                .fetch_one(&mut *tx)
                .await
                .context("Failed to count savings goals")?
                .get("count");

        sqlx::query(
            r#"
            INSERT INTO savings_goals (account, position, name, current_amount, target_amount)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(account.as_str())
        .bind(position)
        .bind(&goal.name)
        .bind(goal.current)
        .bind(goal.target)
        .execute(&mut *tx)
        .await
        .context("Failed to append savings goal")?;

        tx.commit().await.context("Failed to commit savings goal")?;
        Ok(())
    }

    /// Number of savings goals the account holds.
    pub async fn count_goals(&self, account: &AccountId) -> Result<usize> {
        let count: i64 =
            sqlx::query("SELECT COUNT(*) as count FROM savings_goals WHERE account = ?")
                .bind(account.as_str())
                .fetch_one(&self.pool)
                .await
                .context("Failed to count savings goals")?
                .get("count");
        Ok(count as usize)
    }

    /// Get the savings goal at a position, if present.
    pub async fn get_goal(&self, account: &AccountId, index: usize) -> Result<Option<SavingsGoal>> {
        let row = sqlx::query(
            r#"
            SELECT name, current_amount, target_amount
            FROM savings_goals
            WHERE account = ? AND position = ?
            "#,
        )
        .bind(account.as_str())
        .bind(index as i64)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch savings goal")?;

        Ok(row.map(|row| SavingsGoal {
            name: row.get("name"),
            current: row.get("current_amount"),
            target: row.get("target_amount"),
        }))
    }

    /// Replace the savings goal fields at a position.
    pub async fn replace_goal(
        &self,
        account: &AccountId,
        index: usize,
        goal: &SavingsGoal,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE savings_goals
            SET name = ?, current_amount = ?, target_amount = ?
            WHERE account = ? AND position = ?
            "#,
        )
        .bind(&goal.name)
        .bind(goal.current)
        .bind(goal.target)
        .bind(account.as_str())
        .bind(index as i64)
        .execute(&self.pool)
        .await
        .context("Failed to update savings goal")?;
        Ok(())
    }

    /// List the account's savings goals in insertion order.
    pub async fn list_goals(&self, account: &AccountId) -> Result<Vec<SavingsGoal>> {
        let rows = sqlx::query(
            r#"
            SELECT name, current_amount, target_amount
            FROM savings_goals
            WHERE account = ?
            ORDER BY position
            "#,
        )
        .bind(account.as_str())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list savings goals")?;

        Ok(rows
            .iter()
            .map(|row| SavingsGoal {
                name: row.get("name"),
                current: row.get("current_amount"),
                target: row.get("target_amount"),
            })
            .collect())
    }
}
