mod common;

use anyhow::Result;
use common::{account, test_service};
use finboard::application::AppError;

#[tokio::test]
async fn test_goal_add_and_list() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let alice = account("alice");

    service
        .add_savings_goal(&alice, "Vacation".into(), 1000, 5000)
        .await?;
    service
        .add_savings_goal(&alice, "Emergency fund".into(), 0, 10000)
        .await?;

    let goals = service.savings_goals(&alice).await?;
    assert_eq!(goals.len(), 2);
    assert_eq!(goals[0].name, "Vacation");
    assert_eq!(goals[0].current, 1000);
    assert_eq!(goals[0].target, 5000);
    assert_eq!(goals[1].name, "Emergency fund");

    Ok(())
}

#[tokio::test]
async fn test_goal_update_in_place() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let alice = account("alice");

    service
        .add_savings_goal(&alice, "Vacation".into(), 1000, 5000)
        .await?;
    let updated = service.update_savings_goal(&alice, 0, 2000, 6000).await?;

    assert_eq!(updated.name, "Vacation");
    assert_eq!(updated.current, 2000);
    assert_eq!(updated.target, 6000);

    let goals = service.savings_goals(&alice).await?;
    assert_eq!(goals[0], updated);

    Ok(())
}

#[tokio::test]
async fn test_goal_current_exceeding_target_is_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let alice = account("alice");

    let err = service
        .add_savings_goal(&alice, "Vacation".into(), 6000, 5000)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));
    assert!(service.savings_goals(&alice).await?.is_empty());

    service
        .add_savings_goal(&alice, "Vacation".into(), 1000, 5000)
        .await?;
    let err = service
        .update_savings_goal(&alice, 0, 9000, 5000)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));

    let goals = service.savings_goals(&alice).await?;
    assert_eq!(goals[0].current, 1000);

    Ok(())
}

#[tokio::test]
async fn test_goal_update_out_of_bounds() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let alice = account("alice");

    let err = service
        .update_savings_goal(&alice, 0, 100, 500)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::IndexOutOfBounds { index: 0, len: 0, .. }
    ));

    Ok(())
}

#[tokio::test]
async fn test_goal_reaching_target_is_allowed() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let alice = account("alice");

    let goal = service
        .add_savings_goal(&alice, "Vacation".into(), 5000, 5000)
        .await?;
    assert_eq!(goal.current, goal.target);

    Ok(())
}
