mod common;

use common::{create_user, setup};
use liftdesk::{
    domain::{CreateFeedbackRequest, FeedbackStatus, FeedbackTarget, Role, User},
    error::AppError,
    service::ServiceContext,
};

async fn submit(
    ctx: &ServiceContext,
    author: &User,
    rating: i32,
    target: FeedbackTarget,
    related: Option<&User>,
) -> Result<liftdesk::domain::Feedback, AppError> {
    ctx.feedback_service
        .submit(CreateFeedbackRequest {
            user_id: author.id,
            rating,
            message: format!("Rated {} for {}", rating, target.as_str()),
            target,
            related_user_id: related.map(|u| u.id),
        })
        .await
}

#[tokio::test]
async fn rating_must_be_one_to_five() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let member = create_user(&ctx, "member@example.com", Role::Member).await?;

    for rating in [0, -1, 6] {
        let err = submit(&ctx, &member, rating, FeedbackTarget::Gym, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "rating {rating}");
    }

    let feedback = submit(&ctx, &member, 5, FeedbackTarget::Gym, None).await?;
    assert_eq!(feedback.rating, 5);
    assert_eq!(feedback.status, FeedbackStatus::Pending);
    assert!(feedback.admin_response.is_none());

    Ok(())
}

#[tokio::test]
async fn listing_is_scoped_to_target_with_stats() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let member = create_user(&ctx, "member@example.com", Role::Member).await?;
    let coach = create_user(&ctx, "coach@example.com", Role::Coach).await?;

    submit(&ctx, &member, 2, FeedbackTarget::Gym, None).await?;
    submit(&ctx, &member, 4, FeedbackTarget::Gym, None).await?;
    submit(&ctx, &member, 5, FeedbackTarget::Trainer, Some(&coach)).await?;

    let page = ctx
        .feedback_service
        .list_by_target(FeedbackTarget::Gym, None, 10, 0)
        .await?;
    assert_eq!(page.total, 2);
    assert_eq!(page.feedbacks.len(), 2);
    assert!(page
        .feedbacks
        .iter()
        .all(|f| f.target == FeedbackTarget::Gym));
    assert_eq!(page.stats.total_feedbacks, 2);
    assert!((page.stats.average_rating - 3.0).abs() < 1e-9);
    assert_eq!(page.stats.status_distribution.get("PENDING"), Some(&2));

    let trainer_page = ctx
        .feedback_service
        .list_by_target(FeedbackTarget::Trainer, None, 10, 0)
        .await?;
    assert_eq!(trainer_page.total, 1);
    assert_eq!(trainer_page.feedbacks[0].related_user_id, Some(coach.id));

    Ok(())
}

#[tokio::test]
async fn status_filter_narrows_the_page_but_not_the_stats() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let member = create_user(&ctx, "member@example.com", Role::Member).await?;
    let admin = create_user(&ctx, "admin@example.com", Role::Admin).await?;

    let first = submit(&ctx, &member, 3, FeedbackTarget::Gym, None).await?;
    submit(&ctx, &member, 1, FeedbackTarget::Gym, None).await?;

    ctx.feedback_service
        .update_status(&admin, first.id, FeedbackStatus::Resolved, None)
        .await?;

    let resolved = ctx
        .feedback_service
        .list_by_target(FeedbackTarget::Gym, Some(FeedbackStatus::Resolved), 10, 0)
        .await?;
    assert_eq!(resolved.total, 1);
    assert_eq!(resolved.feedbacks[0].id, first.id);
    // Stats still cover the whole target.
    assert_eq!(resolved.stats.total_feedbacks, 2);
    assert_eq!(resolved.stats.status_distribution.get("PENDING"), Some(&1));
    assert_eq!(resolved.stats.status_distribution.get("RESOLVED"), Some(&1));

    Ok(())
}

#[tokio::test]
async fn status_updates_are_staff_only_and_unordered() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let member = create_user(&ctx, "member@example.com", Role::Member).await?;
    let admin = create_user(&ctx, "admin@example.com", Role::Admin).await?;

    let feedback = submit(&ctx, &member, 4, FeedbackTarget::Staff, None).await?;

    let err = ctx
        .feedback_service
        .update_status(&member, feedback.id, FeedbackStatus::Resolved, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let resolved = ctx
        .feedback_service
        .update_status(
            &admin,
            feedback.id,
            FeedbackStatus::Resolved,
            Some("Handled at the front desk".to_string()),
        )
        .await?;
    assert_eq!(resolved.status, FeedbackStatus::Resolved);
    let response = resolved.admin_response.expect("response stored");
    assert_eq!(response.message, "Handled at the front desk");
    assert_eq!(response.updated_by, admin.id);

    // No ordering between statuses: resolved may go back to pending.
    let reopened = ctx
        .feedback_service
        .update_status(&admin, feedback.id, FeedbackStatus::Pending, None)
        .await?;
    assert_eq!(reopened.status, FeedbackStatus::Pending);

    Ok(())
}

#[tokio::test]
async fn update_status_on_missing_feedback_is_not_found() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let admin = create_user(&ctx, "admin@example.com", Role::Admin).await?;

    let err = ctx
        .feedback_service
        .update_status(&admin, uuid::Uuid::new_v4(), FeedbackStatus::Resolved, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    Ok(())
}

#[tokio::test]
async fn members_see_their_own_feedback_history() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let member = create_user(&ctx, "member@example.com", Role::Member).await?;
    let other = create_user(&ctx, "other@example.com", Role::Member).await?;

    submit(&ctx, &member, 3, FeedbackTarget::Gym, None).await?;
    submit(&ctx, &member, 5, FeedbackTarget::Staff, None).await?;
    submit(&ctx, &other, 1, FeedbackTarget::Gym, None).await?;

    let mine = ctx.feedback_service.list_for_user(member.id).await?;
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|f| f.user_id == member.id));

    Ok(())
}
