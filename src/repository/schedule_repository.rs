use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{CreateScheduleRequest, ScheduleEntry, UpdateScheduleRequest, WorkoutSchedule},
    error::{AppError, Result},
    repository::ScheduleRepository,
};

// entries and attendance live in JSON TEXT columns; they are only ever read
// and written whole, never queried piecemeal.
#[derive(FromRow)]
struct ScheduleRow {
    id: String,
    user_id: String,
    coach_id: Option<String>,
    created_by: String,
    entries: String,
    note: Option<String>,
    attendance: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteScheduleRepository {
    pool: SqlitePool,
}

impl SqliteScheduleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_schedule(row: ScheduleRow) -> Result<WorkoutSchedule> {
        let entries: Vec<ScheduleEntry> = serde_json::from_str(&row.entries)
            .map_err(|e| AppError::Database(format!("Invalid schedule entries: {}", e)))?;
        let attendance: Vec<Uuid> = serde_json::from_str(&row.attendance)
            .map_err(|e| AppError::Database(format!("Invalid attendance list: {}", e)))?;

        Ok(WorkoutSchedule {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            user_id: Uuid::parse_str(&row.user_id)
                .map_err(|e| AppError::Database(e.to_string()))?,
            coach_id: row
                .coach_id
                .as_deref()
                .map(Uuid::parse_str)
                .transpose()
                .map_err(|e| AppError::Database(e.to_string()))?,
            created_by: Uuid::parse_str(&row.created_by)
                .map_err(|e| AppError::Database(e.to_string()))?,
            entries,
            note: row.note,
            attendance,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

const SCHEDULE_COLUMNS: &str =
    "id, user_id, coach_id, created_by, entries, note, attendance, created_at, updated_at";

#[async_trait]
impl ScheduleRepository for SqliteScheduleRepository {
    async fn create(&self, schedule: CreateScheduleRequest) -> Result<WorkoutSchedule> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let now_naive = Utc::now().naive_utc();
        let entries_json = serde_json::to_string(&schedule.entries)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO workout_schedules (
                id, user_id, coach_id, created_by, entries, note, attendance,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, '[]', ?, ?)
            "#,
        )
        .bind(&id_str)
        .bind(schedule.user_id.to_string())
        .bind(schedule.coach_id.map(|c| c.to_string()))
        .bind(schedule.created_by.to_string())
        .bind(&entries_json)
        .bind(&schedule.note)
        .bind(now_naive)
        .bind(now_naive)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve created schedule".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<WorkoutSchedule>> {
        let row = sqlx::query_as::<_, ScheduleRow>(&format!(
            "SELECT {} FROM workout_schedules WHERE id = ?",
            SCHEDULE_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_schedule(r)?)),
            None => Ok(None),
        }
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<WorkoutSchedule>> {
        let rows = sqlx::query_as::<_, ScheduleRow>(&format!(
            "SELECT {} FROM workout_schedules WHERE user_id = ? ORDER BY created_at DESC",
            SCHEDULE_COLUMNS
        ))
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_schedule).collect()
    }

    async fn update(&self, id: Uuid, update: UpdateScheduleRequest) -> Result<WorkoutSchedule> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Schedule not found".to_string()))?;

        let entries_json = serde_json::to_string(&update.entries)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        sqlx::query(
            "UPDATE workout_schedules SET entries = ?, note = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&entries_json)
        .bind(&update.note)
        .bind(Utc::now().naive_utc())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve updated schedule".to_string()))
    }

    async fn set_attendance(&self, id: Uuid, attendance: &[Uuid]) -> Result<()> {
        let attendance_json = serde_json::to_string(attendance)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        sqlx::query("UPDATE workout_schedules SET attendance = ?, updated_at = ? WHERE id = ?")
            .bind(&attendance_json)
            .bind(Utc::now().naive_utc())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM workout_schedules WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
