mod common;

use anyhow::Result;
use common::{account, parse_date, test_service};
use finboard::application::AppError;

#[tokio::test]
async fn test_transactions_are_scoped_per_account() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let alice = account("alice");
    let bob = account("bob");

    service
        .add_transaction(
            &alice,
            "Salary".into(),
            "Income".into(),
            parse_date("2024-03-01"),
            5000,
        )
        .await?;
    service
        .add_transaction(
            &bob,
            "Freelance".into(),
            "Income".into(),
            parse_date("2024-03-01"),
            1200,
        )
        .await?;

    let alice_txs = service.transactions(&alice).await?;
    let bob_txs = service.transactions(&bob).await?;

    assert_eq!(alice_txs.len(), 1);
    assert_eq!(alice_txs[0].description, "Salary");
    assert_eq!(bob_txs.len(), 1);
    assert_eq!(bob_txs[0].description, "Freelance");

    Ok(())
}

#[tokio::test]
async fn test_summaries_are_scoped_per_account() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let alice = account("alice");
    let bob = account("bob");

    service.update_financial_data(&alice, 5000, 3000).await?;

    // Bob's summary is untouched
    let bob_data = service.financial_data(&bob).await?;
    assert_eq!(bob_data.monthly_income, 0);
    assert_eq!(bob_data.total_balance, 0);

    let alice_data = service.financial_data(&alice).await?;
    assert_eq!(alice_data.monthly_income, 5000);

    Ok(())
}

#[tokio::test]
async fn test_index_bounds_are_per_account() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let alice = account("alice");
    let bob = account("bob");

    service
        .add_budget(&alice, "Groceries".into(), 300, 500)
        .await?;

    // Alice's budget does not make index 0 valid for Bob
    let err = service.update_budget(&bob, 0, 100, 500).await.unwrap_err();
    assert!(matches!(err, AppError::IndexOutOfBounds { len: 0, .. }));

    assert_eq!(service.budgets(&alice).await?.len(), 1);
    assert!(service.budgets(&bob).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_goals_are_scoped_per_account() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let alice = account("alice");
    let bob = account("bob");

    service
        .add_savings_goal(&alice, "Vacation".into(), 1000, 5000)
        .await?;
    service
        .add_savings_goal(&bob, "Car".into(), 0, 20000)
        .await?;

    let alice_goals = service.savings_goals(&alice).await?;
    let bob_goals = service.savings_goals(&bob).await?;
    assert_eq!(alice_goals.len(), 1);
    assert_eq!(alice_goals[0].name, "Vacation");
    assert_eq!(bob_goals.len(), 1);
    assert_eq!(bob_goals[0].name, "Car");

    Ok(())
}
