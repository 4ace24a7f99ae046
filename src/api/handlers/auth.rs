use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::{
    api::state::AppState,
    domain::{Gender, Role},
    error::{AppError, Result},
    service::user_service::RegisterUser,
};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub birth_year: Option<i32>,
    pub gender: Option<Gender>,
    pub role: Option<Role>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
}

pub async fn register(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>)> {
    // Self-service registration always yields a plain member. Creating a
    // staff/coach/admin account requires an admin bearer token on the same
    // request.
    let requested_role = req.role.unwrap_or(Role::Member);
    if requested_role != Role::Member {
        let token = headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(AppError::Forbidden)?;

        let claims = state.service_context.auth_service.verify_token(token)?;
        if claims.role != Role::Admin {
            return Err(AppError::Forbidden);
        }
    }

    let (_user, token) = state
        .service_context
        .user_service
        .register(RegisterUser {
            name: req.name,
            email: req.email,
            password: req.password,
            phone: req.phone,
            birth_year: req.birth_year,
            gender: req.gender,
            role: requested_role,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            success: true,
            token,
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    let (_user, token) = state
        .service_context
        .user_service
        .authenticate(&req.email, &req.password)
        .await?;

    Ok(Json(TokenResponse {
        success: true,
        token,
    }))
}
