use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A purchasable plan template. Memberships reference a package by id and
/// copy its duration/session allowance at registration time, so later edits
/// never rewrite an issued membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub id: Uuid,
    pub name: String,
    pub duration_days: i64,
    /// None = unlimited sessions.
    pub session_limit: Option<i64>,
    pub price: i64,
    pub with_trainer: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePackageRequest {
    pub name: String,
    pub duration_days: i64,
    pub session_limit: Option<i64>,
    pub price: i64,
    #[serde(default)]
    pub with_trainer: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdatePackageRequest {
    pub name: Option<String>,
    pub duration_days: Option<i64>,
    pub session_limit: Option<i64>,
    pub price: Option<i64>,
    pub with_trainer: Option<bool>,
}
