mod common;

use common::{create_user, setup};
use liftdesk::{
    domain::{CreateScheduleRequest, Role, ScheduleEntry, UpdateScheduleRequest, User},
    error::AppError,
    service::ServiceContext,
};

fn entries() -> Vec<ScheduleEntry> {
    vec![
        ScheduleEntry {
            day_of_week: "Monday".to_string(),
            exercises: vec!["Squat".to_string(), "Lunges".to_string()],
            date: None,
            start_time: Some("07:00".to_string()),
            end_time: Some("08:00".to_string()),
        },
        ScheduleEntry {
            day_of_week: "Thursday".to_string(),
            exercises: vec!["Bench press".to_string()],
            date: None,
            start_time: None,
            end_time: None,
        },
    ]
}

async fn create_schedule(
    ctx: &ServiceContext,
    creator: &User,
    member: &User,
) -> Result<liftdesk::domain::WorkoutSchedule, AppError> {
    ctx.schedule_service
        .create(
            creator,
            CreateScheduleRequest {
                user_id: member.id,
                coach_id: Some(creator.id),
                created_by: creator.id,
                entries: entries(),
                note: Some("Week one".to_string()),
            },
        )
        .await
}

#[tokio::test]
async fn only_staff_or_coach_manage_schedules() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let coach = create_user(&ctx, "coach@example.com", Role::Coach).await?;
    let member = create_user(&ctx, "member@example.com", Role::Member).await?;

    // Members cannot author schedules.
    let err = create_schedule(&ctx, &member, &member).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let schedule = create_schedule(&ctx, &coach, &member).await?;
    assert_eq!(schedule.entries, entries());
    assert!(schedule.attendance.is_empty());

    // Members cannot edit or delete either.
    let update = UpdateScheduleRequest {
        entries: entries(),
        note: Some("Week two".to_string()),
    };
    let err = ctx
        .schedule_service
        .update(&member, schedule.id, update.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let updated = ctx
        .schedule_service
        .update(&coach, schedule.id, update)
        .await?;
    assert_eq!(updated.note.as_deref(), Some("Week two"));

    let err = ctx
        .schedule_service
        .delete(&member, schedule.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    ctx.schedule_service.delete(&coach, schedule.id).await?;
    assert!(ctx.schedule_repo.find_by_id(schedule.id).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn members_only_read_their_own_schedules() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let coach = create_user(&ctx, "coach@example.com", Role::Coach).await?;
    let member = create_user(&ctx, "member@example.com", Role::Member).await?;
    let other = create_user(&ctx, "other@example.com", Role::Member).await?;

    create_schedule(&ctx, &coach, &member).await?;

    let own = ctx.schedule_service.for_user(&member, member.id).await?;
    assert_eq!(own.len(), 1);

    let err = ctx
        .schedule_service
        .for_user(&other, member.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    // Staff/coach can read anyone's.
    let seen = ctx.schedule_service.for_user(&coach, member.id).await?;
    assert_eq!(seen.len(), 1);

    Ok(())
}

#[tokio::test]
async fn attendance_is_owner_only_and_idempotent() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let coach = create_user(&ctx, "coach@example.com", Role::Coach).await?;
    let member = create_user(&ctx, "member@example.com", Role::Member).await?;
    let other = create_user(&ctx, "other@example.com", Role::Member).await?;

    let schedule = create_schedule(&ctx, &coach, &member).await?;

    let err = ctx
        .schedule_service
        .mark_attendance(other.id, schedule.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let marked = ctx
        .schedule_service
        .mark_attendance(member.id, schedule.id)
        .await?;
    assert_eq!(marked.attendance, vec![member.id]);

    // Second mark leaves the set unchanged.
    let marked = ctx
        .schedule_service
        .mark_attendance(member.id, schedule.id)
        .await?;
    assert_eq!(marked.attendance, vec![member.id]);

    Ok(())
}

#[tokio::test]
async fn attendance_on_missing_schedule_is_not_found() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let member = create_user(&ctx, "member@example.com", Role::Member).await?;

    let err = ctx
        .schedule_service
        .mark_attendance(member.id, uuid::Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    Ok(())
}
