use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{
        AdminResponse, CreateFeedbackRequest, Feedback, FeedbackStats, FeedbackStatus,
        FeedbackTarget,
    },
    error::{AppError, Result},
    repository::FeedbackRepository,
};

#[derive(FromRow)]
struct FeedbackRow {
    id: String,
    user_id: String,
    rating: i32,
    message: String,
    target: String,
    related_user_id: Option<String>,
    status: String,
    admin_response_message: Option<String>,
    admin_response_at: Option<NaiveDateTime>,
    admin_response_by: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteFeedbackRepository {
    pool: SqlitePool,
}

impl SqliteFeedbackRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_feedback(row: FeedbackRow) -> Result<Feedback> {
        // The three admin_response_* columns are written together; a partial
        // row means the data is corrupt, not that there is no response.
        let admin_response = match (
            row.admin_response_message,
            row.admin_response_at,
            row.admin_response_by,
        ) {
            (Some(message), Some(at), Some(by)) => Some(AdminResponse {
                message,
                updated_at: DateTime::from_naive_utc_and_offset(at, Utc),
                updated_by: Uuid::parse_str(&by)
                    .map_err(|e| AppError::Database(e.to_string()))?,
            }),
            (None, None, None) => None,
            _ => {
                return Err(AppError::Database(
                    "Partial admin response on feedback row".to_string(),
                ))
            }
        };

        Ok(Feedback {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            user_id: Uuid::parse_str(&row.user_id)
                .map_err(|e| AppError::Database(e.to_string()))?,
            rating: row.rating,
            message: row.message,
            target: FeedbackTarget::parse(&row.target).ok_or_else(|| {
                AppError::Database(format!("Invalid feedback target: {}", row.target))
            })?,
            related_user_id: row
                .related_user_id
                .as_deref()
                .map(Uuid::parse_str)
                .transpose()
                .map_err(|e| AppError::Database(e.to_string()))?,
            status: FeedbackStatus::parse(&row.status).ok_or_else(|| {
                AppError::Database(format!("Invalid feedback status: {}", row.status))
            })?,
            admin_response,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

const FEEDBACK_COLUMNS: &str = "id, user_id, rating, message, target, related_user_id, status, admin_response_message, admin_response_at, admin_response_by, created_at, updated_at";

#[async_trait]
impl FeedbackRepository for SqliteFeedbackRepository {
    async fn create(&self, feedback: CreateFeedbackRequest) -> Result<Feedback> {
        let id = Uuid::new_v4();
        let now_naive = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO feedbacks (
                id, user_id, rating, message, target, related_user_id,
                status, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, 'PENDING', ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(feedback.user_id.to_string())
        .bind(feedback.rating)
        .bind(&feedback.message)
        .bind(feedback.target.as_str())
        .bind(feedback.related_user_id.map(|u| u.to_string()))
        .bind(now_naive)
        .bind(now_naive)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve created feedback".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Feedback>> {
        let row = sqlx::query_as::<_, FeedbackRow>(&format!(
            "SELECT {} FROM feedbacks WHERE id = ?",
            FEEDBACK_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_feedback(r)?)),
            None => Ok(None),
        }
    }

    async fn list_by_target(
        &self,
        target: FeedbackTarget,
        status: Option<FeedbackStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Feedback>> {
        let status_str = status.map(|s| s.as_str());
        let rows = sqlx::query_as::<_, FeedbackRow>(&format!(
            r#"
            SELECT {} FROM feedbacks
            WHERE target = ? AND (? IS NULL OR status = ?)
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#,
            FEEDBACK_COLUMNS
        ))
        .bind(target.as_str())
        .bind(status_str)
        .bind(status_str)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_feedback).collect()
    }

    async fn count_by_target(
        &self,
        target: FeedbackTarget,
        status: Option<FeedbackStatus>,
    ) -> Result<i64> {
        let status_str = status.map(|s| s.as_str());
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM feedbacks WHERE target = ? AND (? IS NULL OR status = ?)",
        )
        .bind(target.as_str())
        .bind(status_str)
        .bind(status_str)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count)
    }

    async fn stats_for_target(&self, target: FeedbackTarget) -> Result<FeedbackStats> {
        let row: (Option<f64>, i64) = sqlx::query_as(
            "SELECT AVG(rating), COUNT(*) FROM feedbacks WHERE target = ?",
        )
        .bind(target.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        let distribution: Vec<(String, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM feedbacks WHERE target = ? GROUP BY status",
        )
        .bind(target.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(FeedbackStats {
            average_rating: row.0.unwrap_or(0.0),
            total_feedbacks: row.1,
            status_distribution: distribution.into_iter().collect(),
        })
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Feedback>> {
        let rows = sqlx::query_as::<_, FeedbackRow>(&format!(
            "SELECT {} FROM feedbacks WHERE user_id = ? ORDER BY created_at DESC",
            FEEDBACK_COLUMNS
        ))
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_feedback).collect()
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: FeedbackStatus,
        admin_response: Option<&AdminResponse>,
    ) -> Result<Feedback> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Feedback not found".to_string()))?;

        sqlx::query(
            r#"
            UPDATE feedbacks
            SET status = ?,
                admin_response_message = COALESCE(?, admin_response_message),
                admin_response_at = COALESCE(?, admin_response_at),
                admin_response_by = COALESCE(?, admin_response_by),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(status.as_str())
        .bind(admin_response.map(|r| r.message.clone()))
        .bind(admin_response.map(|r| r.updated_at.naive_utc()))
        .bind(admin_response.map(|r| r.updated_by.to_string()))
        .bind(Utc::now().naive_utc())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve updated feedback".to_string()))
    }
}
