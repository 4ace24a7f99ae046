use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A staff/coach-authored training plan for one member. Independent of the
/// membership ledger; content is mutated only by staff/coach, attendance only
/// by the owning member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSchedule {
    pub id: Uuid,
    pub user_id: Uuid,
    pub coach_id: Option<Uuid>,
    pub created_by: Uuid,
    pub entries: Vec<ScheduleEntry>,
    pub note: Option<String>,
    /// Member ids that confirmed attendance. Logically holds at most the
    /// owning member; kept as a set so the add stays idempotent.
    pub attendance: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleEntry {
    pub day_of_week: String,
    pub exercises: Vec<String>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateScheduleRequest {
    pub user_id: Uuid,
    pub coach_id: Option<Uuid>,
    pub created_by: Uuid,
    pub entries: Vec<ScheduleEntry>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateScheduleRequest {
    pub entries: Vec<ScheduleEntry>,
    pub note: Option<String>,
}
