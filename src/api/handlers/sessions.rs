use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    api::{
        handlers::{PageParams, Pagination},
        middleware::auth::CurrentUser,
        state::AppState,
    },
    domain::{CreateSessionRequest, WorkoutSession},
    error::Result,
};

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub success: bool,
    pub session: WorkoutSession,
}

#[derive(Debug, Serialize)]
pub struct SessionsResponse {
    pub success: bool,
    pub sessions: Vec<WorkoutSession>,
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionBody {
    pub user_id: Uuid,
    pub membership_id: Option<Uuid>,
    pub coach_id: Option<Uuid>,
    pub workout_date: NaiveDate,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub exercise_name: String,
    pub notes: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(body): Json<CreateSessionBody>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    let session = state
        .service_context
        .session_service
        .create(
            &current.user,
            CreateSessionRequest {
                user_id: body.user_id,
                membership_id: body.membership_id,
                coach_id: body.coach_id,
                workout_date: body.workout_date,
                start_time: body.start_time,
                end_time: body.end_time,
                exercise_name: body.exercise_name,
                notes: body.notes,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            success: true,
            session,
        }),
    ))
}

pub async fn list_for_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(user_id): Path<Uuid>,
    Query(params): Query<PageParams>,
) -> Result<Json<SessionsResponse>> {
    let (sessions, total) = state
        .service_context
        .session_service
        .list_for_user(&current.user, user_id, params.limit(), params.offset())
        .await?;

    Ok(Json(SessionsResponse {
        success: true,
        sessions,
        pagination: Pagination::new(&params, total),
    }))
}

pub async fn list_pending(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<PageParams>,
) -> Result<Json<SessionsResponse>> {
    let (sessions, total) = state
        .service_context
        .session_service
        .list_pending(&current.user, params.limit(), params.offset())
        .await?;

    Ok(Json(SessionsResponse {
        success: true,
        sessions,
        pagination: Pagination::new(&params, total),
    }))
}

pub async fn confirm(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>> {
    let session = state
        .service_context
        .session_service
        .confirm(&current.user, id)
        .await?;

    Ok(Json(SessionResponse {
        success: true,
        session,
    }))
}

pub async fn check_in(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>> {
    let session = state
        .service_context
        .session_service
        .check_in(current.user.id, id)
        .await?;

    Ok(Json(SessionResponse {
        success: true,
        session,
    }))
}

#[derive(Debug, Deserialize, Default)]
pub struct CheckOutBody {
    pub notes: Option<String>,
}

pub async fn check_out(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    body: Option<Json<CheckOutBody>>,
) -> Result<Json<SessionResponse>> {
    let notes = body.and_then(|Json(b)| b.notes);

    let session = state
        .service_context
        .session_service
        .check_out(&current.user, id, notes.as_deref())
        .await?;

    Ok(Json(SessionResponse {
        success: true,
        session,
    }))
}

pub async fn cancel(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>> {
    let session = state
        .service_context
        .session_service
        .cancel(&current.user, id)
        .await?;

    Ok(Json(SessionResponse {
        success: true,
        session,
    }))
}
