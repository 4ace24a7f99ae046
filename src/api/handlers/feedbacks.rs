use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    api::{
        handlers::{resolve_user_ref, PageParams, Pagination, UserRef},
        middleware::auth::CurrentUser,
        state::AppState,
    },
    domain::{CreateFeedbackRequest, Feedback, FeedbackStats, FeedbackStatus, FeedbackTarget},
    error::{AppError, Result},
};

/// Feedback with author, rated user and responder resolved for display.
#[derive(Debug, Serialize)]
pub struct FeedbackDto {
    #[serde(flatten)]
    pub feedback: Feedback,
    pub user: Option<UserRef>,
    pub related_user: Option<UserRef>,
    pub responded_by: Option<UserRef>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub success: bool,
    pub feedback: FeedbackDto,
}

#[derive(Debug, Serialize)]
pub struct FeedbacksResponse {
    pub success: bool,
    pub feedbacks: Vec<FeedbackDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<FeedbackStats>,
}

async fn resolve(state: &AppState, feedbacks: Vec<Feedback>) -> Result<Vec<FeedbackDto>> {
    let repo = state.service_context.user_repo.as_ref();
    let mut out = Vec::with_capacity(feedbacks.len());
    for feedback in feedbacks {
        let user = resolve_user_ref(repo, Some(feedback.user_id)).await?;
        let related_user = resolve_user_ref(repo, feedback.related_user_id).await?;
        let responded_by = resolve_user_ref(
            repo,
            feedback.admin_response.as_ref().map(|r| r.updated_by),
        )
        .await?;
        out.push(FeedbackDto {
            feedback,
            user,
            related_user,
            responded_by,
        });
    }
    Ok(out)
}

#[derive(Debug, Deserialize)]
pub struct SubmitFeedbackBody {
    pub rating: i32,
    #[serde(default)]
    pub message: String,
    pub target: FeedbackTarget,
    pub related_user_id: Option<Uuid>,
}

pub async fn submit(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(body): Json<SubmitFeedbackBody>,
) -> Result<(StatusCode, Json<FeedbackResponse>)> {
    let feedback = state
        .service_context
        .feedback_service
        .submit(CreateFeedbackRequest {
            user_id: current.user.id,
            rating: body.rating,
            message: body.message,
            target: body.target,
            related_user_id: body.related_user_id,
        })
        .await?;

    let mut resolved = resolve(&state, vec![feedback]).await?;

    Ok((
        StatusCode::CREATED,
        Json(FeedbackResponse {
            success: true,
            feedback: resolved.remove(0),
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct TargetListParams {
    #[serde(default = "PageParams::default_page")]
    pub page: i64,
    #[serde(default = "PageParams::default_limit")]
    pub limit: i64,
    pub status: Option<FeedbackStatus>,
}

impl TargetListParams {
    fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

pub async fn list_by_target(
    State(state): State<AppState>,
    Extension(_staff): Extension<CurrentUser>,
    Path(target): Path<String>,
    Query(params): Query<TargetListParams>,
) -> Result<Json<FeedbacksResponse>> {
    let target = FeedbackTarget::parse(&target)
        .ok_or_else(|| AppError::Validation(format!("Invalid feedback target: {}", target)))?;

    let page_params = params.page_params();
    let page = state
        .service_context
        .feedback_service
        .list_by_target(
            target,
            params.status,
            page_params.limit(),
            page_params.offset(),
        )
        .await?;

    Ok(Json(FeedbacksResponse {
        success: true,
        feedbacks: resolve(&state, page.feedbacks).await?,
        pagination: Some(Pagination::new(&page_params, page.total)),
        stats: Some(page.stats),
    }))
}

pub async fn my_feedbacks(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<FeedbacksResponse>> {
    let feedbacks = state
        .service_context
        .feedback_service
        .list_for_user(current.user.id)
        .await?;

    Ok(Json(FeedbacksResponse {
        success: true,
        feedbacks: resolve(&state, feedbacks).await?,
        pagination: None,
        stats: None,
    }))
}

pub async fn get_detail(
    State(state): State<AppState>,
    Extension(_staff): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<FeedbackResponse>> {
    let feedback = state.service_context.feedback_service.get_detail(id).await?;

    let mut resolved = resolve(&state, vec![feedback]).await?;

    Ok(Json(FeedbackResponse {
        success: true,
        feedback: resolved.remove(0),
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusBody {
    pub status: String,
    pub admin_response: Option<String>,
}

pub async fn update_status(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateStatusBody>,
) -> Result<Json<FeedbackResponse>> {
    let status = FeedbackStatus::parse(&body.status)
        .ok_or_else(|| AppError::Validation(format!("Invalid status: {}", body.status)))?;

    let feedback = state
        .service_context
        .feedback_service
        .update_status(&current.user, id, status, body.admin_response)
        .await?;

    let mut resolved = resolve(&state, vec![feedback]).await?;

    Ok(Json(FeedbackResponse {
        success: true,
        feedback: resolved.remove(0),
    }))
}
