use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{CreateRoomRequest, GymRoom, UpdateRoomRequest},
    error::{AppError, Result},
};

#[derive(Debug, Serialize)]
pub struct RoomsResponse {
    pub success: bool,
    pub rooms: Vec<GymRoom>,
}

#[derive(Debug, Serialize)]
pub struct RoomResponse {
    pub success: bool,
    pub room: GymRoom,
}

fn validate(name: Option<&str>, capacity: Option<i64>) -> Result<()> {
    if matches!(name, Some(n) if n.trim().is_empty()) {
        return Err(AppError::Validation("Room name cannot be empty".to_string()));
    }
    if matches!(capacity, Some(c) if c <= 0) {
        return Err(AppError::Validation(
            "Capacity must be at least one".to_string(),
        ));
    }
    Ok(())
}

pub async fn list(
    State(state): State<AppState>,
    Extension(_user): Extension<CurrentUser>,
) -> Result<Json<RoomsResponse>> {
    let rooms = state.service_context.room_repo.list().await?;

    Ok(Json(RoomsResponse {
        success: true,
        rooms,
    }))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<RoomResponse>> {
    let room = state
        .service_context
        .room_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Room not found".to_string()))?;

    Ok(Json(RoomResponse {
        success: true,
        room,
    }))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(_admin): Extension<CurrentUser>,
    Json(req): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<RoomResponse>)> {
    validate(Some(req.name.as_str()), req.capacity)?;

    let room = state.service_context.room_repo.create(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(RoomResponse {
            success: true,
            room,
        }),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(_admin): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRoomRequest>,
) -> Result<Json<RoomResponse>> {
    validate(req.name.as_deref(), req.capacity)?;

    let room = state.service_context.room_repo.update(id, req).await?;

    Ok(Json(RoomResponse {
        success: true,
        room,
    }))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(_admin): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state
        .service_context
        .room_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Room not found".to_string()))?;

    state.service_context.room_repo.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
