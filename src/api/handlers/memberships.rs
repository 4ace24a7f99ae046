use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{Membership, Package, PaymentStatus},
    error::{AppError, Result},
};

/// Membership with its package resolved for display.
#[derive(Debug, Serialize)]
pub struct MembershipDto {
    #[serde(flatten)]
    pub membership: Membership,
    pub package: Option<Package>,
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct MembershipResponse {
    pub success: bool,
    pub membership: MembershipDto,
}

#[derive(Debug, Serialize)]
pub struct MembershipsResponse {
    pub success: bool,
    pub memberships: Vec<MembershipDto>,
}

async fn resolve(state: &AppState, memberships: Vec<Membership>) -> Result<Vec<MembershipDto>> {
    let now = Utc::now();
    let mut out = Vec::with_capacity(memberships.len());
    for membership in memberships {
        let package = state
            .service_context
            .package_repo
            .find_by_id(membership.package_id)
            .await?;
        let is_active = membership.is_active(now);
        out.push(MembershipDto {
            membership,
            package,
            is_active,
        });
    }
    Ok(out)
}

#[derive(Debug, Deserialize)]
pub struct RegisterMembershipRequest {
    pub user_id: Uuid,
    pub package_id: Uuid,
    #[serde(default)]
    pub paid: bool,
}

pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<RegisterMembershipRequest>,
) -> Result<(StatusCode, Json<MembershipResponse>)> {
    // Members register for themselves; staff register on behalf of anyone
    // and are the only callers trusted to record a cash payment as paid.
    if !current.user.role.is_staff() && req.user_id != current.user.id {
        return Err(AppError::Forbidden);
    }
    let paid = req.paid && current.user.role.is_staff();

    let membership = state
        .service_context
        .membership_service
        .register(req.user_id, req.package_id, paid)
        .await?;

    let mut resolved = resolve(&state, vec![membership]).await?;

    Ok((
        StatusCode::CREATED,
        Json(MembershipResponse {
            success: true,
            membership: resolved.remove(0),
        }),
    ))
}

pub async fn list_for_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<MembershipsResponse>> {
    if !current.user.role.is_trainer_side() && current.user.id != user_id {
        return Err(AppError::Forbidden);
    }

    let memberships = state
        .service_context
        .membership_service
        .history_for_user(user_id)
        .await?;

    Ok(Json(MembershipsResponse {
        success: true,
        memberships: resolve(&state, memberships).await?,
    }))
}

pub async fn list_active_for_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<MembershipsResponse>> {
    if !current.user.role.is_trainer_side() && current.user.id != user_id {
        return Err(AppError::Forbidden);
    }

    let memberships = state
        .service_context
        .membership_service
        .active_for_user(user_id)
        .await?;

    Ok(Json(MembershipsResponse {
        success: true,
        memberships: resolve(&state, memberships).await?,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ListAllParams {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

pub async fn list_all(
    State(state): State<AppState>,
    Extension(_staff): Extension<CurrentUser>,
    Query(params): Query<ListAllParams>,
) -> Result<Json<MembershipsResponse>> {
    let memberships = state
        .service_context
        .membership_service
        .list_all(params.from, params.to)
        .await?;

    Ok(Json(MembershipsResponse {
        success: true,
        memberships: resolve(&state, memberships).await?,
    }))
}

#[derive(Debug, Deserialize)]
pub struct PaymentStatusRequest {
    pub payment_status: PaymentStatus,
}

pub async fn set_payment_status(
    State(state): State<AppState>,
    Extension(_staff): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<PaymentStatusRequest>,
) -> Result<Json<MembershipResponse>> {
    let membership = state
        .service_context
        .membership_service
        .set_payment_status(id, req.payment_status)
        .await?;

    let mut resolved = resolve(&state, vec![membership]).await?;

    Ok(Json(MembershipResponse {
        success: true,
        membership: resolved.remove(0),
    }))
}
