use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{CreatePackageRequest, Package, UpdatePackageRequest},
    error::{AppError, Result},
    repository::PackageRepository,
};

#[derive(FromRow)]
struct PackageRow {
    id: String,
    name: String,
    duration_days: i64,
    session_limit: Option<i64>,
    price: i64,
    with_trainer: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqlitePackageRepository {
    pool: SqlitePool,
}

impl SqlitePackageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_package(row: PackageRow) -> Result<Package> {
        Ok(Package {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            name: row.name,
            duration_days: row.duration_days,
            session_limit: row.session_limit,
            price: row.price,
            with_trainer: row.with_trainer != 0,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

const PACKAGE_COLUMNS: &str =
    "id, name, duration_days, session_limit, price, with_trainer, created_at, updated_at";

#[async_trait]
impl PackageRepository for SqlitePackageRepository {
    async fn create(&self, request: CreatePackageRequest) -> Result<Package> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let now_naive = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO packages (
                id, name, duration_days, session_limit, price, with_trainer,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id_str)
        .bind(&request.name)
        .bind(request.duration_days)
        .bind(request.session_limit)
        .bind(request.price)
        .bind(if request.with_trainer { 1i32 } else { 0i32 })
        .bind(now_naive)
        .bind(now_naive)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve created package".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Package>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, PackageRow>(&format!(
            "SELECT {} FROM packages WHERE id = ?",
            PACKAGE_COLUMNS
        ))
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_package(r)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Package>> {
        let rows = sqlx::query_as::<_, PackageRow>(&format!(
            "SELECT {} FROM packages ORDER BY price ASC",
            PACKAGE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_package).collect()
    }

    async fn update(&self, id: Uuid, update: UpdatePackageRequest) -> Result<Package> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Package not found".to_string()))?;

        let id_str = id.to_string();
        let now_naive = Utc::now().naive_utc();
        let with_trainer_int = update.with_trainer.map(|b| if b { 1i32 } else { 0i32 });

        sqlx::query(
            r#"
            UPDATE packages
            SET name = COALESCE(?, name),
                duration_days = COALESCE(?, duration_days),
                session_limit = COALESCE(?, session_limit),
                price = COALESCE(?, price),
                with_trainer = COALESCE(?, with_trainer),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&update.name)
        .bind(update.duration_days)
        .bind(update.session_limit)
        .bind(update.price)
        .bind(with_trainer_int)
        .bind(now_naive)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve updated package".to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        sqlx::query("DELETE FROM packages WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
