use axum::{
    extract::{Extension, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    api::{
        handlers::{resolve_user_ref, UserRef},
        middleware::auth::CurrentUser,
        state::AppState,
    },
    error::{AppError, Result},
};

#[derive(Debug, Serialize)]
pub struct RevenueResponse {
    pub success: bool,
    pub revenue: i64,
}

/// Revenue counts only paid memberships, valued at the referenced package
/// price.
pub async fn revenue(
    State(state): State<AppState>,
    Extension(_admin): Extension<CurrentUser>,
) -> Result<Json<RevenueResponse>> {
    let revenue = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COALESCE(SUM(p.price), 0)
        FROM memberships m
        JOIN packages p ON p.id = m.package_id
        WHERE m.payment_status = 'paid'
        "#,
    )
    .fetch_one(&state.service_context.db_pool)
    .await
    .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(RevenueResponse {
        success: true,
        revenue,
    }))
}

#[derive(Debug, Serialize)]
pub struct RecentMembership {
    pub membership_id: Uuid,
    pub user: Option<UserRef>,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct MemberGrowthResponse {
    pub success: bool,
    pub total: i64,
    pub recent: Vec<RecentMembership>,
}

/// Membership count plus the ten most recent registrations/renewals.
pub async fn member_growth(
    State(state): State<AppState>,
    Extension(_admin): Extension<CurrentUser>,
) -> Result<Json<MemberGrowthResponse>> {
    let pool = &state.service_context.db_pool;

    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM memberships")
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let rows: Vec<(String, String, chrono::NaiveDateTime)> = sqlx::query_as(
        "SELECT id, user_id, created_at FROM memberships ORDER BY created_at DESC LIMIT 10",
    )
    .fetch_all(pool)
    .await
    .map_err(|e| AppError::Database(e.to_string()))?;

    let user_repo = state.service_context.user_repo.as_ref();
    let mut recent = Vec::with_capacity(rows.len());
    for (id, user_id, created_at) in rows {
        let membership_id =
            Uuid::parse_str(&id).map_err(|e| AppError::Database(e.to_string()))?;
        let user_id =
            Uuid::parse_str(&user_id).map_err(|e| AppError::Database(e.to_string()))?;
        recent.push(RecentMembership {
            membership_id,
            user: resolve_user_ref(user_repo, Some(user_id)).await?,
            created_at: chrono::DateTime::<chrono::Utc>::from_naive_utc_and_offset(
                created_at,
                chrono::Utc,
            )
            .to_rfc3339(),
        });
    }

    Ok(Json(MemberGrowthResponse {
        success: true,
        total,
        recent,
    }))
}

#[derive(Debug, Serialize)]
pub struct StaffPerformanceEntry {
    pub user: Option<UserRef>,
    pub total_feedbacks: i64,
    pub average_rating: f64,
}

#[derive(Debug, Serialize)]
pub struct StaffPerformanceResponse {
    pub success: bool,
    pub stats: Vec<StaffPerformanceEntry>,
}

/// Feedback volume and average rating per rated staff member.
pub async fn staff_performance(
    State(state): State<AppState>,
    Extension(_admin): Extension<CurrentUser>,
) -> Result<Json<StaffPerformanceResponse>> {
    let rows: Vec<(String, i64, f64)> = sqlx::query_as(
        r#"
        SELECT related_user_id, COUNT(*), AVG(rating)
        FROM feedbacks
        WHERE target = 'STAFF' AND related_user_id IS NOT NULL
        GROUP BY related_user_id
        ORDER BY AVG(rating) DESC
        "#,
    )
    .fetch_all(&state.service_context.db_pool)
    .await
    .map_err(|e| AppError::Database(e.to_string()))?;

    let user_repo = state.service_context.user_repo.as_ref();
    let mut stats = Vec::with_capacity(rows.len());
    for (user_id, total_feedbacks, average_rating) in rows {
        let user_id =
            Uuid::parse_str(&user_id).map_err(|e| AppError::Database(e.to_string()))?;
        stats.push(StaffPerformanceEntry {
            user: resolve_user_ref(user_repo, Some(user_id)).await?,
            total_feedbacks,
            average_rating,
        });
    }

    Ok(Json(StaffPerformanceResponse {
        success: true,
        stats,
    }))
}
