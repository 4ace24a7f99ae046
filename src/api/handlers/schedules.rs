use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    api::{
        handlers::{resolve_user_ref, UserRef},
        middleware::auth::CurrentUser,
        state::AppState,
    },
    domain::{CreateScheduleRequest, ScheduleEntry, UpdateScheduleRequest, WorkoutSchedule},
    error::Result,
};

/// Schedule with coach and author resolved for display.
#[derive(Debug, Serialize)]
pub struct ScheduleDto {
    #[serde(flatten)]
    pub schedule: WorkoutSchedule,
    pub coach: Option<UserRef>,
    pub created_by_user: Option<UserRef>,
}

#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub success: bool,
    pub workout_schedule: ScheduleDto,
}

#[derive(Debug, Serialize)]
pub struct SchedulesResponse {
    pub success: bool,
    pub schedules: Vec<ScheduleDto>,
}

async fn resolve(state: &AppState, schedules: Vec<WorkoutSchedule>) -> Result<Vec<ScheduleDto>> {
    let repo = state.service_context.user_repo.as_ref();
    let mut out = Vec::with_capacity(schedules.len());
    for schedule in schedules {
        let coach = resolve_user_ref(repo, schedule.coach_id).await?;
        let created_by_user = resolve_user_ref(repo, Some(schedule.created_by)).await?;
        out.push(ScheduleDto {
            schedule,
            coach,
            created_by_user,
        });
    }
    Ok(out)
}

#[derive(Debug, Deserialize)]
pub struct CreateScheduleBody {
    pub entries: Vec<ScheduleEntry>,
    pub note: Option<String>,
    pub coach_id: Option<Uuid>,
}

pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<CreateScheduleBody>,
) -> Result<(StatusCode, Json<ScheduleResponse>)> {
    let schedule = state
        .service_context
        .schedule_service
        .create(
            &current.user,
            CreateScheduleRequest {
                user_id,
                coach_id: body.coach_id,
                created_by: current.user.id,
                entries: body.entries,
                note: body.note,
            },
        )
        .await?;

    let mut resolved = resolve(&state, vec![schedule]).await?;

    Ok((
        StatusCode::CREATED,
        Json(ScheduleResponse {
            success: true,
            workout_schedule: resolved.remove(0),
        }),
    ))
}

pub async fn list_for_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<SchedulesResponse>> {
    let schedules = state
        .service_context
        .schedule_service
        .for_user(&current.user, user_id)
        .await?;

    Ok(Json(SchedulesResponse {
        success: true,
        schedules: resolve(&state, schedules).await?,
    }))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(schedule_id): Path<Uuid>,
    Json(body): Json<UpdateScheduleRequest>,
) -> Result<Json<ScheduleResponse>> {
    let schedule = state
        .service_context
        .schedule_service
        .update(&current.user, schedule_id, body)
        .await?;

    let mut resolved = resolve(&state, vec![schedule]).await?;

    Ok(Json(ScheduleResponse {
        success: true,
        workout_schedule: resolved.remove(0),
    }))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(schedule_id): Path<Uuid>,
) -> Result<StatusCode> {
    state
        .service_context
        .schedule_service
        .delete(&current.user, schedule_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn mark_attendance(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(schedule_id): Path<Uuid>,
) -> Result<Json<ScheduleResponse>> {
    let schedule = state
        .service_context
        .schedule_service
        .mark_attendance(current.user.id, schedule_id)
        .await?;

    let mut resolved = resolve(&state, vec![schedule]).await?;

    Ok(Json(ScheduleResponse {
        success: true,
        workout_schedule: resolved.remove(0),
    }))
}
