use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::{AccountId, Budget, FinancialData, SavingsGoal, Transaction};

/// Snapshot of one account's full ledger state, for JSON export.
#[derive(Debug, Clone, Serialize)]
pub struct AccountSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub account: AccountId,
    pub summary: FinancialData,
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    pub savings_goals: Vec<SavingsGoal>,
}

/// Exporter for converting one account's ledger data to external formats.
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export the account's transactions to CSV. Returns the row count.
    pub async fn export_transactions_csv<W: Write>(
        &self,
        account: &AccountId,
        writer: W,
    ) -> Result<usize> {
        let transactions = self.service.transactions(account).await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "date",
            "description",
            "category",
            "amount",
            "is_income",
        ])?;

        let mut count = 0;
        for transaction in &transactions {
            csv_writer.write_record([
                transaction.date.to_rfc3339(),
                transaction.description.clone(),
                transaction.category.clone(),
                transaction.amount.to_string(),
                transaction.is_income.to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export the full account state as a pretty-printed JSON snapshot.
    pub async fn export_snapshot_json<W: Write>(
        &self,
        account: &AccountId,
        mut writer: W,
    ) -> Result<()> {
        let snapshot = AccountSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            account: account.clone(),
            summary: self.service.financial_data(account).await?,
            transactions: self.service.transactions(account).await?,
            budgets: self.service.budgets(account).await?,
            savings_goals: self.service.savings_goals(account).await?,
        };

        serde_json::to_writer_pretty(&mut writer, &snapshot)?;
        writeln!(writer)?;
        Ok(())
    }
}
