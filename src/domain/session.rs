use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A concrete, time-boxed training event tied to a membership.
///
/// Status moves along `Scheduled -> CheckedIn -> Completed`, with `Cancelled`
/// reachable only from `Scheduled`. `Completed` and `Cancelled` are terminal.
/// The confirmed flag (coach/staff approval) is orthogonal to status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub membership_id: Option<Uuid>,
    pub coach_id: Option<Uuid>,
    pub workout_date: NaiveDate,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub exercise_name: String,
    pub notes: Option<String>,
    pub status: SessionStatus,
    pub confirmed: bool,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub checked_out_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Scheduled,
    CheckedIn,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Scheduled => "scheduled",
            SessionStatus::CheckedIn => "checked_in",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<SessionStatus> {
        match s {
            "scheduled" => Some(SessionStatus::Scheduled),
            "checked_in" => Some(SessionStatus::CheckedIn),
            "completed" => Some(SessionStatus::Completed),
            "cancelled" => Some(SessionStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateSessionRequest {
    pub user_id: Uuid,
    pub membership_id: Option<Uuid>,
    pub coach_id: Option<Uuid>,
    pub workout_date: NaiveDate,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub exercise_name: String,
    pub notes: Option<String>,
}
