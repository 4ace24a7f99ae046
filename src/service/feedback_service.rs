use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    domain::{
        AdminResponse, CreateFeedbackRequest, Feedback, FeedbackStats, FeedbackStatus,
        FeedbackTarget, User,
    },
    error::{AppError, Result},
    repository::FeedbackRepository,
};

#[derive(Clone)]
pub struct FeedbackService {
    repo: Arc<dyn FeedbackRepository>,
}

pub struct FeedbackPage {
    pub feedbacks: Vec<Feedback>,
    pub total: i64,
    pub stats: FeedbackStats,
}

impl FeedbackService {
    pub fn new(repo: Arc<dyn FeedbackRepository>) -> Self {
        Self { repo }
    }

    pub async fn submit(&self, request: CreateFeedbackRequest) -> Result<Feedback> {
        if !(1..=5).contains(&request.rating) {
            return Err(AppError::Validation(
                "Rating must be between 1 and 5".to_string(),
            ));
        }

        self.repo.create(request).await
    }

    pub async fn list_by_target(
        &self,
        target: FeedbackTarget,
        status: Option<FeedbackStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<FeedbackPage> {
        let feedbacks = self.repo.list_by_target(target, status, limit, offset).await?;
        let total = self.repo.count_by_target(target, status).await?;
        // Stats run over the target's full set, not the filtered page.
        let stats = self.repo.stats_for_target(target).await?;

        Ok(FeedbackPage {
            feedbacks,
            total,
            stats,
        })
    }

    pub async fn get_detail(&self, id: Uuid) -> Result<Feedback> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Feedback not found".to_string()))
    }

    /// Admin/staff only. Any status may follow any other; the workflow is
    /// deliberately unordered.
    pub async fn update_status(
        &self,
        admin: &User,
        id: Uuid,
        status: FeedbackStatus,
        response_message: Option<String>,
    ) -> Result<Feedback> {
        if !admin.role.is_staff() {
            return Err(AppError::Forbidden);
        }

        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Feedback not found".to_string()))?;

        let admin_response = response_message.map(|message| AdminResponse {
            message,
            updated_at: Utc::now(),
            updated_by: admin.id,
        });

        self.repo
            .update_status(id, status, admin_response.as_ref())
            .await
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Feedback>> {
        self.repo.list_for_user(user_id).await
    }
}
