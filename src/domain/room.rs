use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A physical training area of the gym. Rooms are plain catalog data used
/// by the front desk when describing where a class or session takes place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GymRoom {
    pub id: Uuid,
    pub name: String,
    pub capacity: Option<i64>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoomRequest {
    pub name: String,
    pub capacity: Option<i64>,
    pub location: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateRoomRequest {
    pub name: Option<String>,
    pub capacity: Option<i64>,
    pub location: Option<String>,
    pub description: Option<String>,
}
