use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub message: String,
    pub target: FeedbackTarget,
    pub related_user_id: Option<Uuid>,
    pub status: FeedbackStatus,
    pub admin_response: Option<AdminResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminResponse {
    pub message: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Uuid,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedbackTarget {
    Gym,
    Staff,
    Trainer,
}

impl FeedbackTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackTarget::Gym => "GYM",
            FeedbackTarget::Staff => "STAFF",
            FeedbackTarget::Trainer => "TRAINER",
        }
    }

    pub fn parse(s: &str) -> Option<FeedbackTarget> {
        match s {
            "GYM" => Some(FeedbackTarget::Gym),
            "STAFF" => Some(FeedbackTarget::Staff),
            "TRAINER" => Some(FeedbackTarget::Trainer),
            _ => None,
        }
    }
}

/// Deliberately not a state machine: admins may move a feedback item between
/// any two statuses in any order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedbackStatus {
    Pending,
    InProgress,
    Resolved,
    Rejected,
}

impl FeedbackStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackStatus::Pending => "PENDING",
            FeedbackStatus::InProgress => "IN_PROGRESS",
            FeedbackStatus::Resolved => "RESOLVED",
            FeedbackStatus::Rejected => "REJECTED",
        }
    }

    pub fn parse(s: &str) -> Option<FeedbackStatus> {
        match s {
            "PENDING" => Some(FeedbackStatus::Pending),
            "IN_PROGRESS" => Some(FeedbackStatus::InProgress),
            "RESOLVED" => Some(FeedbackStatus::Resolved),
            "REJECTED" => Some(FeedbackStatus::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateFeedbackRequest {
    pub user_id: Uuid,
    pub rating: i32,
    pub message: String,
    pub target: FeedbackTarget,
    pub related_user_id: Option<Uuid>,
}

/// Aggregates over every feedback item for one target, computed on read.
#[derive(Debug, Clone, Serialize, Default)]
pub struct FeedbackStats {
    pub average_rating: f64,
    pub total_feedbacks: i64,
    pub status_distribution: std::collections::HashMap<String, i64>,
}
