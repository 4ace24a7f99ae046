mod common;

use chrono::Duration;
use common::{create_package, create_user, setup};
use liftdesk::{
    domain::{PaymentStatus, Role, UpdatePackageRequest},
    error::AppError,
};
use uuid::Uuid;

#[tokio::test]
async fn end_date_is_start_plus_package_duration() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let user = create_user(&ctx, "member@example.com", Role::Member).await?;

    for days in [1i64, 30, 365] {
        let package = create_package(&ctx, days, None, 100_000).await?;
        let membership = ctx
            .membership_service
            .register(user.id, package.id, false)
            .await?;

        assert_eq!(
            membership.end_date - membership.start_date,
            Duration::days(days)
        );
        assert_eq!(membership.payment_status, PaymentStatus::Unpaid);
    }

    Ok(())
}

#[tokio::test]
async fn register_copies_session_limit_from_package() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let user = create_user(&ctx, "member@example.com", Role::Member).await?;
    let package = create_package(&ctx, 30, Some(20), 500_000).await?;

    let membership = ctx
        .membership_service
        .register(user.id, package.id, false)
        .await?;

    assert_eq!(membership.sessions_remaining, Some(20));
    assert_eq!(membership.payment_status, PaymentStatus::Unpaid);

    Ok(())
}

#[tokio::test]
async fn register_with_unknown_package_fails() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let user = create_user(&ctx, "member@example.com", Role::Member).await?;

    let err = ctx
        .membership_service
        .register(user.id, Uuid::new_v4(), false)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));

    Ok(())
}

#[tokio::test]
async fn renewal_appends_a_new_row() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let user = create_user(&ctx, "member@example.com", Role::Member).await?;
    let package = create_package(&ctx, 30, None, 500_000).await?;

    let first = ctx
        .membership_service
        .register(user.id, package.id, true)
        .await?;
    let second = ctx
        .membership_service
        .register(user.id, package.id, false)
        .await?;

    assert_ne!(first.id, second.id);

    let history = ctx.membership_service.history_for_user(user.id).await?;
    assert_eq!(history.len(), 2);

    // Most recent first; the active set keeps both since neither has expired.
    let active = ctx.membership_service.active_for_user(user.id).await?;
    assert_eq!(active.len(), 2);
    assert_eq!(active[0].id, second.id);

    Ok(())
}

#[tokio::test]
async fn payment_status_is_monotonic() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let user = create_user(&ctx, "member@example.com", Role::Member).await?;
    let package = create_package(&ctx, 30, None, 500_000).await?;

    let membership = ctx
        .membership_service
        .register(user.id, package.id, false)
        .await?;

    let paid = ctx
        .membership_service
        .set_payment_status(membership.id, PaymentStatus::Paid)
        .await?;
    assert_eq!(paid.payment_status, PaymentStatus::Paid);

    // Paid can never move back to unpaid.
    let err = ctx
        .membership_service
        .set_payment_status(membership.id, PaymentStatus::Unpaid)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));

    // A second flip to paid is also rejected: the row was not unpaid.
    let err = ctx
        .membership_service
        .set_payment_status(membership.id, PaymentStatus::Paid)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));

    Ok(())
}

#[tokio::test]
async fn paid_package_freezes_duration_and_price() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let user = create_user(&ctx, "member@example.com", Role::Member).await?;
    let package = create_package(&ctx, 30, None, 500_000).await?;

    let membership = ctx
        .membership_service
        .register(user.id, package.id, false)
        .await?;

    // Unpaid memberships do not freeze anything yet.
    let updated = ctx
        .membership_service
        .update_package(
            package.id,
            UpdatePackageRequest {
                duration_days: Some(60),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(updated.duration_days, 60);

    ctx.membership_service
        .set_payment_status(membership.id, PaymentStatus::Paid)
        .await?;

    let err = ctx
        .membership_service
        .update_package(
            package.id,
            UpdatePackageRequest {
                duration_days: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = ctx
        .membership_service
        .update_package(
            package.id,
            UpdatePackageRequest {
                price: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // Descriptive fields stay editable after payment.
    let renamed = ctx
        .membership_service
        .update_package(
            package.id,
            UpdatePackageRequest {
                name: Some("Quarterly special".to_string()),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(renamed.name, "Quarterly special");
    assert_eq!(renamed.duration_days, 60);
    assert_eq!(renamed.price, 500_000);

    Ok(())
}

#[tokio::test]
async fn package_delete_refused_while_memberships_reference_it() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let user = create_user(&ctx, "member@example.com", Role::Member).await?;
    let package = create_package(&ctx, 30, None, 500_000).await?;

    ctx.membership_service
        .register(user.id, package.id, true)
        .await?;

    let err = ctx
        .membership_service
        .delete_package(package.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // An unreferenced package deletes cleanly.
    let unused = create_package(&ctx, 7, None, 50_000).await?;
    ctx.membership_service.delete_package(unused.id).await?;
    assert!(ctx.package_repo.find_by_id(unused.id).await?.is_none());

    Ok(())
}
