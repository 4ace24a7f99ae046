mod common;

use chrono::Utc;
use common::{create_package, create_user, setup};
use liftdesk::{
    domain::{CreateSessionRequest, Membership, Role, SessionStatus, User, WorkoutSession},
    error::AppError,
    service::ServiceContext,
};

async fn create_session(
    ctx: &ServiceContext,
    staff: &User,
    member: &User,
    membership: Option<&Membership>,
) -> anyhow::Result<WorkoutSession> {
    let session = ctx
        .session_service
        .create(
            staff,
            CreateSessionRequest {
                user_id: member.id,
                membership_id: membership.map(|m| m.id),
                coach_id: None,
                workout_date: Utc::now().date_naive(),
                start_time: Some("18:00".to_string()),
                end_time: Some("19:00".to_string()),
                exercise_name: "Deadlift".to_string(),
                notes: None,
            },
        )
        .await?;
    Ok(session)
}

/// Drives a fresh session into the requested state.
async fn session_in_state(
    ctx: &ServiceContext,
    staff: &User,
    member: &User,
    status: SessionStatus,
) -> anyhow::Result<WorkoutSession> {
    let session = create_session(ctx, staff, member, None).await?;
    match status {
        SessionStatus::Scheduled => {}
        SessionStatus::CheckedIn => {
            ctx.session_service.check_in(member.id, session.id).await?;
        }
        SessionStatus::Completed => {
            ctx.session_service.check_in(member.id, session.id).await?;
            ctx.session_service
                .check_out(staff, session.id, None)
                .await?;
        }
        SessionStatus::Cancelled => {
            ctx.session_service.cancel(staff, session.id).await?;
        }
    }
    let session = ctx
        .session_repo
        .find_by_id(session.id)
        .await?
        .expect("session exists");
    assert_eq!(session.status, status);
    Ok(session)
}

#[tokio::test]
async fn full_lifecycle_decrements_session_allowance() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let staff = create_user(&ctx, "staff@example.com", Role::Staff).await?;
    let member = create_user(&ctx, "member@example.com", Role::Member).await?;
    let package = create_package(&ctx, 30, Some(1), 500_000).await?;
    let membership = ctx
        .membership_service
        .register(member.id, package.id, true)
        .await?;

    let session = create_session(&ctx, &staff, &member, Some(&membership)).await?;
    assert_eq!(session.status, SessionStatus::Scheduled);
    assert!(!session.confirmed);

    let session = ctx.session_service.confirm(&staff, session.id).await?;
    assert!(session.confirmed);

    let session = ctx.session_service.check_in(member.id, session.id).await?;
    assert_eq!(session.status, SessionStatus::CheckedIn);
    assert!(session.checked_in_at.is_some());

    let session = ctx
        .session_service
        .check_out(&staff, session.id, Some("Good effort"))
        .await?;
    assert_eq!(session.status, SessionStatus::Completed);
    assert!(session.checked_out_at.is_some());
    assert_eq!(session.notes.as_deref(), Some("Good effort"));

    let membership = ctx
        .membership_repo
        .find_by_id(membership.id)
        .await?
        .expect("membership exists");
    assert_eq!(membership.sessions_remaining, Some(0));

    // Allowance exhausted: no further sessions on this membership.
    let err = create_session(&ctx, &staff, &member, Some(&membership))
        .await
        .unwrap_err();
    let err = err.downcast::<AppError>()?;
    assert!(matches!(err, AppError::Validation(_)));

    Ok(())
}

#[tokio::test]
async fn check_out_appends_notes_to_existing_ones() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let staff = create_user(&ctx, "staff@example.com", Role::Staff).await?;
    let member = create_user(&ctx, "member@example.com", Role::Member).await?;

    let session = ctx
        .session_service
        .create(
            &staff,
            CreateSessionRequest {
                user_id: member.id,
                membership_id: None,
                coach_id: None,
                workout_date: Utc::now().date_naive(),
                start_time: Some("18:00".to_string()),
                end_time: Some("19:00".to_string()),
                exercise_name: "Squat".to_string(),
                notes: Some("Warmup felt stiff".to_string()),
            },
        )
        .await?;

    ctx.session_service.check_in(member.id, session.id).await?;
    let session = ctx
        .session_service
        .check_out(&staff, session.id, Some("Strong finish"))
        .await?;

    assert_eq!(
        session.notes.as_deref(),
        Some("Warmup felt stiff\nStrong finish")
    );

    // Checking out with no notes leaves the existing ones untouched.
    let session = create_session(&ctx, &staff, &member, None).await?;
    ctx.session_service.check_in(member.id, session.id).await?;
    let session = ctx.session_service.check_out(&staff, session.id, None).await?;
    assert_eq!(session.notes, None);

    Ok(())
}

#[tokio::test]
async fn transition_matrix_is_enforced() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let staff = create_user(&ctx, "staff@example.com", Role::Staff).await?;
    let member = create_user(&ctx, "member@example.com", Role::Member).await?;

    let all = [
        SessionStatus::Scheduled,
        SessionStatus::CheckedIn,
        SessionStatus::Completed,
        SessionStatus::Cancelled,
    ];

    for from in all {
        // check_in is legal only from Scheduled
        let s = session_in_state(&ctx, &staff, &member, from).await?;
        let result = ctx.session_service.check_in(member.id, s.id).await;
        if from == SessionStatus::Scheduled {
            assert_eq!(result?.status, SessionStatus::CheckedIn);
        } else {
            assert!(matches!(result.unwrap_err(), AppError::InvalidState(_)));
        }

        // check_out is legal only from CheckedIn
        let s = session_in_state(&ctx, &staff, &member, from).await?;
        let result = ctx.session_service.check_out(&staff, s.id, None).await;
        if from == SessionStatus::CheckedIn {
            assert_eq!(result?.status, SessionStatus::Completed);
        } else {
            assert!(matches!(result.unwrap_err(), AppError::InvalidState(_)));
        }

        // cancel is legal only from Scheduled
        let s = session_in_state(&ctx, &staff, &member, from).await?;
        let result = ctx.session_service.cancel(&staff, s.id).await;
        if from == SessionStatus::Scheduled {
            assert_eq!(result?.status, SessionStatus::Cancelled);
        } else {
            assert!(matches!(result.unwrap_err(), AppError::InvalidState(_)));
        }
    }

    Ok(())
}

#[tokio::test]
async fn check_in_requires_session_ownership() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let staff = create_user(&ctx, "staff@example.com", Role::Staff).await?;
    let member = create_user(&ctx, "member@example.com", Role::Member).await?;
    let other = create_user(&ctx, "other@example.com", Role::Member).await?;

    let session = create_session(&ctx, &staff, &member, None).await?;

    let err = ctx
        .session_service
        .check_in(other.id, session.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    // Still checked in fine by the owner afterwards.
    let session = ctx.session_service.check_in(member.id, session.id).await?;
    assert_eq!(session.status, SessionStatus::CheckedIn);

    Ok(())
}

#[tokio::test]
async fn member_cannot_create_or_drive_staff_transitions() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let staff = create_user(&ctx, "staff@example.com", Role::Staff).await?;
    let member = create_user(&ctx, "member@example.com", Role::Member).await?;

    let err = create_session(&ctx, &member, &member, None).await.unwrap_err();
    let err = err.downcast::<AppError>()?;
    assert!(matches!(err, AppError::Forbidden));

    let session = create_session(&ctx, &staff, &member, None).await?;
    for result in [
        ctx.session_service.confirm(&member, session.id).await,
        ctx.session_service.check_out(&member, session.id, None).await,
        ctx.session_service.cancel(&member, session.id).await,
    ] {
        assert!(matches!(result.unwrap_err(), AppError::Forbidden));
    }

    Ok(())
}

#[tokio::test]
async fn expired_membership_rejects_new_sessions() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let staff = create_user(&ctx, "staff@example.com", Role::Staff).await?;
    let member = create_user(&ctx, "member@example.com", Role::Member).await?;
    let package = create_package(&ctx, 1, None, 100_000).await?;
    let membership = ctx
        .membership_service
        .register(member.id, package.id, true)
        .await?;

    // Force the end date into the past.
    sqlx::query("UPDATE memberships SET end_date = ? WHERE id = ?")
        .bind((Utc::now() - chrono::Duration::days(2)).naive_utc())
        .bind(membership.id.to_string())
        .execute(&ctx.db_pool)
        .await?;

    let err = create_session(&ctx, &staff, &member, Some(&membership))
        .await
        .unwrap_err();
    let err = err.downcast::<AppError>()?;
    assert!(matches!(err, AppError::Validation(_)));

    Ok(())
}

#[tokio::test]
async fn pending_lists_unconfirmed_scheduled_sessions() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let staff = create_user(&ctx, "staff@example.com", Role::Staff).await?;
    let member = create_user(&ctx, "member@example.com", Role::Member).await?;

    let first = create_session(&ctx, &staff, &member, None).await?;
    let second = create_session(&ctx, &staff, &member, None).await?;

    let (pending, total) = ctx.session_service.list_pending(&staff, 10, 0).await?;
    assert_eq!(total, 2);
    assert_eq!(pending.len(), 2);

    ctx.session_service.confirm(&staff, first.id).await?;
    ctx.session_service.cancel(&staff, second.id).await?;

    let (pending, total) = ctx.session_service.list_pending(&staff, 10, 0).await?;
    assert_eq!(total, 0);
    assert!(pending.is_empty());

    // Members cannot browse the pending queue.
    let err = ctx
        .session_service
        .list_pending(&member, 10, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    Ok(())
}
