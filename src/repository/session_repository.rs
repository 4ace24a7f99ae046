use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{CreateSessionRequest, SessionStatus, WorkoutSession},
    error::{AppError, Result},
    repository::SessionRepository,
};

#[derive(FromRow)]
struct SessionRow {
    id: String,
    user_id: String,
    membership_id: Option<String>,
    coach_id: Option<String>,
    workout_date: NaiveDate,
    start_time: Option<String>,
    end_time: Option<String>,
    exercise_name: String,
    notes: Option<String>,
    status: String,
    confirmed: i32,
    checked_in_at: Option<NaiveDateTime>,
    checked_out_at: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteSessionRepository {
    pool: SqlitePool,
}

impl SqliteSessionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_session(row: SessionRow) -> Result<WorkoutSession> {
        Ok(WorkoutSession {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            user_id: Uuid::parse_str(&row.user_id)
                .map_err(|e| AppError::Database(e.to_string()))?,
            membership_id: row
                .membership_id
                .as_deref()
                .map(Uuid::parse_str)
                .transpose()
                .map_err(|e| AppError::Database(e.to_string()))?,
            coach_id: row
                .coach_id
                .as_deref()
                .map(Uuid::parse_str)
                .transpose()
                .map_err(|e| AppError::Database(e.to_string()))?,
            workout_date: row.workout_date,
            start_time: row.start_time,
            end_time: row.end_time,
            exercise_name: row.exercise_name,
            notes: row.notes,
            status: SessionStatus::parse(&row.status).ok_or_else(|| {
                AppError::Database(format!("Invalid session status: {}", row.status))
            })?,
            confirmed: row.confirmed != 0,
            checked_in_at: row
                .checked_in_at
                .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            checked_out_at: row
                .checked_out_at
                .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

const SESSION_COLUMNS: &str = "id, user_id, membership_id, coach_id, workout_date, start_time, end_time, exercise_name, notes, status, confirmed, checked_in_at, checked_out_at, created_at, updated_at";

#[async_trait]
impl SessionRepository for SqliteSessionRepository {
    async fn create(&self, session: CreateSessionRequest) -> Result<WorkoutSession> {
        let id = Uuid::new_v4();
        let now_naive = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO workout_sessions (
                id, user_id, membership_id, coach_id, workout_date,
                start_time, end_time, exercise_name, notes, status, confirmed,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 'scheduled', 0, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(session.user_id.to_string())
        .bind(session.membership_id.map(|m| m.to_string()))
        .bind(session.coach_id.map(|c| c.to_string()))
        .bind(session.workout_date)
        .bind(&session.start_time)
        .bind(&session.end_time)
        .bind(&session.exercise_name)
        .bind(&session.notes)
        .bind(now_naive)
        .bind(now_naive)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve created session".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<WorkoutSession>> {
        let row = sqlx::query_as::<_, SessionRow>(&format!(
            "SELECT {} FROM workout_sessions WHERE id = ?",
            SESSION_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_session(r)?)),
            None => Ok(None),
        }
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WorkoutSession>> {
        let rows = sqlx::query_as::<_, SessionRow>(&format!(
            "SELECT {} FROM workout_sessions WHERE user_id = ? ORDER BY workout_date DESC, created_at DESC LIMIT ? OFFSET ?",
            SESSION_COLUMNS
        ))
        .bind(user_id.to_string())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_session).collect()
    }

    async fn count_for_user(&self, user_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM workout_sessions WHERE user_id = ?",
        )
        .bind(user_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count)
    }

    async fn list_pending(&self, limit: i64, offset: i64) -> Result<Vec<WorkoutSession>> {
        let rows = sqlx::query_as::<_, SessionRow>(&format!(
            "SELECT {} FROM workout_sessions WHERE status = 'scheduled' AND confirmed = 0 ORDER BY workout_date ASC LIMIT ? OFFSET ?",
            SESSION_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_session).collect()
    }

    async fn count_pending(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM workout_sessions WHERE status = 'scheduled' AND confirmed = 0",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count)
    }

    async fn confirm(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE workout_sessions SET confirmed = 1, updated_at = ? WHERE id = ? AND status = 'scheduled'",
        )
        .bind(Utc::now().naive_utc())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn check_in(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE workout_sessions
            SET status = 'checked_in', checked_in_at = ?, updated_at = ?
            WHERE id = ? AND status = 'scheduled' AND checked_in_at IS NULL
            "#,
        )
        .bind(at.naive_utc())
        .bind(at.naive_utc())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn check_out(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
        notes: Option<&str>,
    ) -> Result<bool> {
        // Check-out notes append to whatever the session already carries.
        let result = sqlx::query(
            r#"
            UPDATE workout_sessions
            SET status = 'completed', checked_out_at = ?,
                notes = CASE
                    WHEN ? IS NULL THEN notes
                    WHEN notes IS NULL OR notes = '' THEN ?
                    ELSE notes || char(10) || ?
                END,
                updated_at = ?
            WHERE id = ? AND status = 'checked_in' AND checked_out_at IS NULL
            "#,
        )
        .bind(at.naive_utc())
        .bind(notes)
        .bind(notes)
        .bind(notes)
        .bind(at.naive_utc())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn cancel(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE workout_sessions SET status = 'cancelled', updated_at = ? WHERE id = ? AND status = 'scheduled'",
        )
        .bind(Utc::now().naive_utc())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
