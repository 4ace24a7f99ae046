use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Membership, NewMembership, PaymentStatus},
    error::{AppError, Result},
    repository::MembershipRepository,
};

#[derive(FromRow)]
struct MembershipRow {
    id: String,
    user_id: String,
    package_id: String,
    start_date: NaiveDateTime,
    end_date: NaiveDateTime,
    sessions_remaining: Option<i64>,
    payment_status: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteMembershipRepository {
    pool: SqlitePool,
}

impl SqliteMembershipRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_membership(row: MembershipRow) -> Result<Membership> {
        Ok(Membership {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            user_id: Uuid::parse_str(&row.user_id)
                .map_err(|e| AppError::Database(e.to_string()))?,
            package_id: Uuid::parse_str(&row.package_id)
                .map_err(|e| AppError::Database(e.to_string()))?,
            start_date: DateTime::from_naive_utc_and_offset(row.start_date, Utc),
            end_date: DateTime::from_naive_utc_and_offset(row.end_date, Utc),
            sessions_remaining: row.sessions_remaining,
            payment_status: PaymentStatus::parse(&row.payment_status).ok_or_else(|| {
                AppError::Database(format!("Invalid payment status: {}", row.payment_status))
            })?,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

const MEMBERSHIP_COLUMNS: &str = "id, user_id, package_id, start_date, end_date, sessions_remaining, payment_status, created_at, updated_at";

#[async_trait]
impl MembershipRepository for SqliteMembershipRepository {
    async fn create(&self, membership: NewMembership) -> Result<Membership> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let now_naive = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO memberships (
                id, user_id, package_id, start_date, end_date,
                sessions_remaining, payment_status, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id_str)
        .bind(membership.user_id.to_string())
        .bind(membership.package_id.to_string())
        .bind(membership.start_date.naive_utc())
        .bind(membership.end_date.naive_utc())
        .bind(membership.sessions_remaining)
        .bind(membership.payment_status.as_str())
        .bind(now_naive)
        .bind(now_naive)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve created membership".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Membership>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, MembershipRow>(&format!(
            "SELECT {} FROM memberships WHERE id = ?",
            MEMBERSHIP_COLUMNS
        ))
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_membership(r)?)),
            None => Ok(None),
        }
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Membership>> {
        let rows = sqlx::query_as::<_, MembershipRow>(&format!(
            "SELECT {} FROM memberships WHERE user_id = ? ORDER BY start_date DESC",
            MEMBERSHIP_COLUMNS
        ))
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_membership).collect()
    }

    async fn list_active_for_user(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<Membership>> {
        let rows = sqlx::query_as::<_, MembershipRow>(&format!(
            "SELECT {} FROM memberships WHERE user_id = ? AND end_date >= ? ORDER BY start_date DESC",
            MEMBERSHIP_COLUMNS
        ))
        .bind(user_id.to_string())
        .bind(now.naive_utc())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_membership).collect()
    }

    async fn list_all(
        &self,
        created_from: Option<DateTime<Utc>>,
        created_to: Option<DateTime<Utc>>,
    ) -> Result<Vec<Membership>> {
        let rows = sqlx::query_as::<_, MembershipRow>(&format!(
            r#"
            SELECT {} FROM memberships
            WHERE (? IS NULL OR created_at >= ?)
              AND (? IS NULL OR created_at <= ?)
            ORDER BY created_at DESC
            "#,
            MEMBERSHIP_COLUMNS
        ))
        .bind(created_from.map(|d| d.naive_utc()))
        .bind(created_from.map(|d| d.naive_utc()))
        .bind(created_to.map(|d| d.naive_utc()))
        .bind(created_to.map(|d| d.naive_utc()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_membership).collect()
    }

    async fn mark_paid(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE memberships SET payment_status = 'paid', updated_at = ? WHERE id = ? AND payment_status = 'unpaid'",
        )
        .bind(Utc::now().naive_utc())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn decrement_sessions(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE memberships
            SET sessions_remaining = sessions_remaining - 1, updated_at = ?
            WHERE id = ? AND sessions_remaining IS NOT NULL AND sessions_remaining > 0
            "#,
        )
        .bind(Utc::now().naive_utc())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_active_for_package(
        &self,
        package_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM memberships WHERE package_id = ? AND end_date >= ?",
        )
        .bind(package_id.to_string())
        .bind(now.naive_utc())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count)
    }

    async fn count_paid_for_package(&self, package_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM memberships WHERE package_id = ? AND payment_status = 'paid'",
        )
        .bind(package_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count)
    }
}
