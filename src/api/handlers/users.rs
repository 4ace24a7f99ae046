use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{Gender, Role, UpdateUserRequest, User},
    error::{AppError, Result},
};

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub birth_year: Option<i32>,
    pub gender: Option<Gender>,
    pub role: Role,
    pub active: bool,
    pub created_at: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            birth_year: user.birth_year,
            gender: user.gender,
            role: user.role,
            active: user.active,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default)]
    offset: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub success: bool,
    pub users: Vec<UserDto>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub success: bool,
    pub user: UserDto,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(_user): Extension<CurrentUser>,
    Query(params): Query<ListParams>,
) -> Result<Json<UsersResponse>> {
    let users = state
        .service_context
        .user_repo
        .list(params.limit, params.offset)
        .await?;

    Ok(Json(UsersResponse {
        success: true,
        users: users.into_iter().map(Into::into).collect(),
    }))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>> {
    let user = state
        .service_context
        .user_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse {
        success: true,
        user: user.into(),
    }))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(update): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>> {
    let user = state
        .service_context
        .user_service
        .update_profile(&current.user, id, update)
        .await?;

    Ok(Json(UserResponse {
        success: true,
        user: user.into(),
    }))
}

/// Admin-only soft deactivation; the row survives for referential integrity.
pub async fn deactivate(
    State(state): State<AppState>,
    Extension(_admin): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>> {
    let user = state.service_context.user_service.deactivate(id).await?;

    Ok(Json(UserResponse {
        success: true,
        user: user.into(),
    }))
}
