mod common;

use anyhow::Result;
use common::{account, test_service};
use finboard::application::AppError;

#[tokio::test]
async fn test_fresh_account_reads_zeroed_summary() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let alice = account("alice");

    let data = service.financial_data(&alice).await?;
    assert_eq!(data.monthly_income, 0);
    assert_eq!(data.monthly_expenses, 0);
    assert_eq!(data.savings_rate, 0);
    assert_eq!(data.total_balance, 0);

    Ok(())
}

#[tokio::test]
async fn test_update_computes_derived_fields() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let alice = account("alice");

    let data = service.update_financial_data(&alice, 5000, 3000).await?;
    assert_eq!(data.monthly_income, 5000);
    assert_eq!(data.monthly_expenses, 3000);
    assert_eq!(data.savings_rate, 40); // (5000-3000)/5000 * 100
    assert_eq!(data.total_balance, 2000);

    // Reading back returns the committed values
    let stored = service.financial_data(&alice).await?;
    assert_eq!(stored, data);

    Ok(())
}

#[tokio::test]
async fn test_update_replaces_rather_than_accumulates() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let alice = account("alice");

    service.update_financial_data(&alice, 5000, 3000).await?;
    let data = service.update_financial_data(&alice, 1000, 500).await?;

    // Prior totals are discarded entirely
    assert_eq!(data.monthly_income, 1000);
    assert_eq!(data.monthly_expenses, 500);
    assert_eq!(data.savings_rate, 50);
    assert_eq!(data.total_balance, 500);

    Ok(())
}

#[tokio::test]
async fn test_zero_expenses_yields_full_savings_rate() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let alice = account("alice");

    let data = service.update_financial_data(&alice, 4200, 0).await?;
    assert_eq!(data.savings_rate, 100);
    assert_eq!(data.total_balance, 4200);

    Ok(())
}

#[tokio::test]
async fn test_zero_income_yields_zero_savings_rate() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let alice = account("alice");

    let data = service.update_financial_data(&alice, 0, 0).await?;
    assert_eq!(data.savings_rate, 0);
    assert_eq!(data.total_balance, 0);

    Ok(())
}

#[tokio::test]
async fn test_savings_rate_truncates() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let alice = account("alice");

    // (3000-1000)/3000 * 100 = 66.66.. -> 66
    let data = service.update_financial_data(&alice, 3000, 1000).await?;
    assert_eq!(data.savings_rate, 66);

    Ok(())
}

#[tokio::test]
async fn test_expenses_exceeding_income_is_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let alice = account("alice");

    let err = service
        .update_financial_data(&alice, 3000, 5000)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));

    // Nothing was written
    let data = service.financial_data(&alice).await?;
    assert_eq!(data.monthly_income, 0);

    Ok(())
}

#[tokio::test]
async fn test_negative_inputs_are_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let alice = account("alice");

    let err = service
        .update_financial_data(&alice, -100, -200)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));

    Ok(())
}
