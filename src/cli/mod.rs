use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::{AccountId, Amount};
use crate::io::Exporter;

/// Finboard - Personal Finance Dashboard Ledger
#[derive(Parser)]
#[command(name = "finboard")]
#[command(about = "A local-first multi-account finance dashboard ledger")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "finboard.db")]
    pub database: String,

    /// Account id all commands operate on
    #[arg(short, long, global = true, default_value = "default")]
    pub account: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Financial summary commands
    #[command(subcommand)]
    Summary(SummaryCommands),

    /// Transaction commands
    #[command(subcommand)]
    Tx(TxCommands),

    /// Budget commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Savings goal commands
    #[command(subcommand)]
    Goal(GoalCommands),

    /// Export account data to CSV or JSON
    Export {
        /// What to export: transactions, snapshot
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum SummaryCommands {
    /// Replace the monthly income/expense totals
    Set {
        /// Monthly income (whole units)
        #[arg(short, long)]
        income: Amount,

        /// Monthly expenses (whole units)
        #[arg(short, long)]
        expenses: Amount,
    },

    /// Show the current summary
    Show,
}

#[derive(Subcommand)]
pub enum TxCommands {
    /// Record a transaction (positive amount = income, negative = expense)
    Add {
        /// Description of the transaction
        description: String,

        /// Signed amount (e.g. 5000 for income, -2000 for an expense)
        #[arg(allow_hyphen_values = true)]
        amount: Amount,

        /// Category (e.g. "Income", "Housing", "Groceries")
        #[arg(short, long, default_value = "Uncategorized")]
        category: String,

        /// Date of the transaction (YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,
    },

    /// List all transactions
    List,
}

#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Add a budget envelope
    Add {
        /// Budget name
        name: String,

        /// Amount already spent
        #[arg(short, long, default_value = "0")]
        spent: Amount,

        /// Spending limit
        #[arg(short, long)]
        limit: Amount,
    },

    /// Update the budget at a position
    Update {
        /// Position in the budget list (0-based)
        index: usize,

        /// New spent amount
        #[arg(short, long)]
        spent: Amount,

        /// New spending limit
        #[arg(short, long)]
        limit: Amount,
    },

    /// List all budgets
    List,
}

#[derive(Subcommand)]
pub enum GoalCommands {
    /// Add a savings goal
    Add {
        /// Goal name
        name: String,

        /// Amount saved so far
        #[arg(short, long, default_value = "0")]
        current: Amount,

        /// Target amount
        #[arg(short, long)]
        target: Amount,
    },

    /// Update the savings goal at a position
    Update {
        /// Position in the goal list (0-based)
        index: usize,

        /// New saved amount
        #[arg(short, long)]
        current: Amount,

        /// New target amount
        #[arg(short, long)]
        target: Amount,
    },

    /// List all savings goals
    List,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let account = AccountId::new(self.account.clone());

        match self.command {
            Commands::Init => {
                LedgerService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Summary(summary_cmd) => {
                let service = LedgerService::connect(&self.database).await?;
                run_summary_command(&service, &account, summary_cmd).await?;
            }

            Commands::Tx(tx_cmd) => {
                let service = LedgerService::connect(&self.database).await?;
                run_tx_command(&service, &account, tx_cmd).await?;
            }

            Commands::Budget(budget_cmd) => {
                let service = LedgerService::connect(&self.database).await?;
                run_budget_command(&service, &account, budget_cmd).await?;
            }

            Commands::Goal(goal_cmd) => {
                let service = LedgerService::connect(&self.database).await?;
                run_goal_command(&service, &account, goal_cmd).await?;
            }

            Commands::Export {
                export_type,
                output,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                run_export_command(&service, &account, &export_type, output.as_deref()).await?;
            }
        }

        Ok(())
    }
}

async fn run_summary_command(
    service: &LedgerService,
    account: &AccountId,
    cmd: SummaryCommands,
) -> Result<()> {
    match cmd {
        SummaryCommands::Set { income, expenses } => {
            let data = service
                .update_financial_data(account, income, expenses)
                .await?;
            println!(
                "Summary updated: income {}, expenses {}, savings rate {}%, balance {}",
                data.monthly_income, data.monthly_expenses, data.savings_rate, data.total_balance
            );
        }
        SummaryCommands::Show => {
            let data = service.financial_data(account).await?;
            println!("Account: {}", account);
            println!("  Monthly income:   {}", data.monthly_income);
            println!("  Monthly expenses: {}", data.monthly_expenses);
            println!("  Savings rate:     {}%", data.savings_rate);
            println!("  Total balance:    {}", data.total_balance);
        }
    }
    Ok(())
}

async fn run_tx_command(service: &LedgerService, account: &AccountId, cmd: TxCommands) -> Result<()> {
    match cmd {
        TxCommands::Add {
            description,
            amount,
            category,
            date,
        } => {
            let timestamp = match date {
                Some(date_str) => parse_date(&date_str)
                    .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str))?,
                None => Utc::now(),
            };

            let result = service
                .add_transaction(account, description, category, timestamp, amount)
                .await?;

            let kind = if result.transaction.is_income {
                "income"
            } else {
                "expense"
            };
            println!(
                "Recorded {} {}: {} ({})",
                kind,
                result.transaction.amount,
                result.transaction.description,
                result.transaction.category
            );
            println!(
                "Summary: income {}, expenses {}, savings rate {}%, balance {}",
                result.summary.monthly_income,
                result.summary.monthly_expenses,
                result.summary.savings_rate,
                result.summary.total_balance
            );
        }
        TxCommands::List => {
            let transactions = service.transactions(account).await?;
            if transactions.is_empty() {
                println!("No transactions for account '{}'", account);
                return Ok(());
            }
            for (i, transaction) in transactions.iter().enumerate() {
                println!(
                    "{:4}  {}  {:>10}  {:<12}  {}",
                    i,
                    transaction.date.format("%Y-%m-%d"),
                    transaction.amount,
                    transaction.category,
                    transaction.description
                );
            }
        }
    }
    Ok(())
}

async fn run_budget_command(
    service: &LedgerService,
    account: &AccountId,
    cmd: BudgetCommands,
) -> Result<()> {
    match cmd {
        BudgetCommands::Add { name, spent, limit } => {
            let budget = service.add_budget(account, name, spent, limit).await?;
            println!(
                "Added budget '{}': {} / {} ({}%)",
                budget.name,
                budget.spent,
                budget.limit,
                budget.percent_used()
            );
        }
        BudgetCommands::Update {
            index,
            spent,
            limit,
        } => {
            let budget = service.update_budget(account, index, spent, limit).await?;
            println!(
                "Updated budget {} '{}': {} / {} ({}%)",
                index,
                budget.name,
                budget.spent,
                budget.limit,
                budget.percent_used()
            );
        }
        BudgetCommands::List => {
            let budgets = service.budgets(account).await?;
            if budgets.is_empty() {
                println!("No budgets for account '{}'", account);
                return Ok(());
            }
            for (i, budget) in budgets.iter().enumerate() {
                println!(
                    "{:4}  {:<20}  {:>10} / {:<10}  {}% used, {} remaining",
                    i,
                    budget.name,
                    budget.spent,
                    budget.limit,
                    budget.percent_used(),
                    budget.remaining()
                );
            }
        }
    }
    Ok(())
}

async fn run_goal_command(
    service: &LedgerService,
    account: &AccountId,
    cmd: GoalCommands,
) -> Result<()> {
    match cmd {
        GoalCommands::Add {
            name,
            current,
            target,
        } => {
            let goal = service
                .add_savings_goal(account, name, current, target)
                .await?;
            println!(
                "Added goal '{}': {} / {} ({}%)",
                goal.name,
                goal.current,
                goal.target,
                goal.percent_complete()
            );
        }
        GoalCommands::Update {
            index,
            current,
            target,
        } => {
            let goal = service
                .update_savings_goal(account, index, current, target)
                .await?;
            println!(
                "Updated goal {} '{}': {} / {} ({}%)",
                index,
                goal.name,
                goal.current,
                goal.target,
                goal.percent_complete()
            );
        }
        GoalCommands::List => {
            let goals = service.savings_goals(account).await?;
            if goals.is_empty() {
                println!("No savings goals for account '{}'", account);
                return Ok(());
            }
            for (i, goal) in goals.iter().enumerate() {
                println!(
                    "{:4}  {:<20}  {:>10} / {:<10}  {}% complete",
                    i,
                    goal.name,
                    goal.current,
                    goal.target,
                    goal.percent_complete()
                );
            }
        }
    }
    Ok(())
}

async fn run_export_command(
    service: &LedgerService,
    account: &AccountId,
    export_type: &str,
    output: Option<&str>,
) -> Result<()> {
    let exporter = Exporter::new(service);
    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(File::create(path).context("Failed to create output file")?),
        None => Box::new(std::io::stdout()),
    };

    match export_type {
        "transactions" => {
            let count = exporter.export_transactions_csv(account, &mut writer).await?;
            if output.is_some() {
                eprintln!("Exported {} transactions", count);
            }
        }
        "snapshot" => {
            exporter.export_snapshot_json(account, &mut writer).await?;
        }
        other => bail!("Unknown export type '{}'. Use: transactions, snapshot", other),
    }

    Ok(())
}

fn parse_date(date_str: &str) -> Result<DateTime<Utc>> {
    let naive = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")?;
    Ok(naive
        .and_hms_opt(0, 0, 0)
        .context("Invalid time components")?
        .and_utc())
}
