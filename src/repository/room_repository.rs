use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{CreateRoomRequest, GymRoom, UpdateRoomRequest},
    error::{AppError, Result},
    repository::RoomRepository,
};

#[derive(FromRow)]
struct RoomRow {
    id: String,
    name: String,
    capacity: Option<i64>,
    location: Option<String>,
    description: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteRoomRepository {
    pool: SqlitePool,
}

impl SqliteRoomRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_room(row: RoomRow) -> Result<GymRoom> {
        Ok(GymRoom {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            name: row.name,
            capacity: row.capacity,
            location: row.location,
            description: row.description,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

const ROOM_COLUMNS: &str = "id, name, capacity, location, description, created_at, updated_at";

#[async_trait]
impl RoomRepository for SqliteRoomRepository {
    async fn create(&self, request: CreateRoomRequest) -> Result<GymRoom> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let now_naive = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO gym_rooms (id, name, capacity, location, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id_str)
        .bind(&request.name)
        .bind(request.capacity)
        .bind(&request.location)
        .bind(&request.description)
        .bind(now_naive)
        .bind(now_naive)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve created room".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<GymRoom>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, RoomRow>(&format!(
            "SELECT {} FROM gym_rooms WHERE id = ?",
            ROOM_COLUMNS
        ))
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_room(r)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<GymRoom>> {
        let rows = sqlx::query_as::<_, RoomRow>(&format!(
            "SELECT {} FROM gym_rooms ORDER BY name ASC",
            ROOM_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_room).collect()
    }

    async fn update(&self, id: Uuid, update: UpdateRoomRequest) -> Result<GymRoom> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Room not found".to_string()))?;

        let id_str = id.to_string();
        let now_naive = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE gym_rooms
            SET name = COALESCE(?, name),
                capacity = COALESCE(?, capacity),
                location = COALESCE(?, location),
                description = COALESCE(?, description),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&update.name)
        .bind(update.capacity)
        .bind(&update.location)
        .bind(&update.description)
        .bind(now_naive)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve updated room".to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        sqlx::query("DELETE FROM gym_rooms WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
