use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{CreatePackageRequest, Package, UpdatePackageRequest},
    error::{AppError, Result},
};

#[derive(Debug, Serialize)]
pub struct PackagesResponse {
    pub success: bool,
    pub packages: Vec<Package>,
}

#[derive(Debug, Serialize)]
pub struct PackageResponse {
    pub success: bool,
    pub package: Package,
}

fn validate(duration_days: Option<i64>, price: Option<i64>) -> Result<()> {
    if matches!(duration_days, Some(d) if d <= 0) {
        return Err(AppError::Validation(
            "Duration must be at least one day".to_string(),
        ));
    }
    if matches!(price, Some(p) if p < 0) {
        return Err(AppError::Validation("Price cannot be negative".to_string()));
    }
    Ok(())
}

pub async fn list(
    State(state): State<AppState>,
    Extension(_user): Extension<CurrentUser>,
) -> Result<Json<PackagesResponse>> {
    let packages = state.service_context.package_repo.list().await?;

    Ok(Json(PackagesResponse {
        success: true,
        packages,
    }))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<PackageResponse>> {
    let package = state
        .service_context
        .package_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Package not found".to_string()))?;

    Ok(Json(PackageResponse {
        success: true,
        package,
    }))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(_admin): Extension<CurrentUser>,
    Json(req): Json<CreatePackageRequest>,
) -> Result<(StatusCode, Json<PackageResponse>)> {
    validate(Some(req.duration_days), Some(req.price))?;

    let package = state.service_context.package_repo.create(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(PackageResponse {
            success: true,
            package,
        }),
    ))
}

/// Duration and price are frozen once a paid membership references the package.
pub async fn update(
    State(state): State<AppState>,
    Extension(_admin): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePackageRequest>,
) -> Result<Json<PackageResponse>> {
    validate(req.duration_days, req.price)?;

    let package = state
        .service_context
        .membership_service
        .update_package(id, req)
        .await?;

    Ok(Json(PackageResponse {
        success: true,
        package,
    }))
}

/// Refuses deletion while unexpired memberships reference the package.
pub async fn delete(
    State(state): State<AppState>,
    Extension(_admin): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state
        .service_context
        .membership_service
        .delete_package(id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
