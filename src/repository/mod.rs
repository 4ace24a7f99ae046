use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::*;
use crate::error::Result;

pub mod feedback_repository;
pub mod membership_repository;
pub mod package_repository;
pub mod room_repository;
pub mod schedule_repository;
pub mod session_repository;
pub mod user_repository;

pub use feedback_repository::SqliteFeedbackRepository;
pub use membership_repository::SqliteMembershipRepository;
pub use package_repository::SqlitePackageRepository;
pub use room_repository::SqliteRoomRepository;
pub use schedule_repository::SqliteScheduleRepository;
pub use session_repository::SqliteSessionRepository;
pub use user_repository::SqliteUserRepository;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: CreateUserRequest) -> Result<User>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>>;
    async fn update(&self, id: Uuid, update: UpdateUserRequest) -> Result<User>;
}

#[async_trait]
pub trait PackageRepository: Send + Sync {
    async fn create(&self, package: CreatePackageRequest) -> Result<Package>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Package>>;
    async fn list(&self) -> Result<Vec<Package>>;
    async fn update(&self, id: Uuid, update: UpdatePackageRequest) -> Result<Package>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn create(&self, room: CreateRoomRequest) -> Result<GymRoom>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<GymRoom>>;
    async fn list(&self) -> Result<Vec<GymRoom>>;
    async fn update(&self, id: Uuid, update: UpdateRoomRequest) -> Result<GymRoom>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait MembershipRepository: Send + Sync {
    async fn create(&self, membership: NewMembership) -> Result<Membership>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Membership>>;
    /// All memberships for a user, newest start date first.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Membership>>;
    /// Memberships whose end date has not passed, newest start date first.
    async fn list_active_for_user(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<Vec<Membership>>;
    async fn list_all(
        &self,
        created_from: Option<DateTime<Utc>>,
        created_to: Option<DateTime<Utc>>,
    ) -> Result<Vec<Membership>>;
    /// Conditional flip to paid; returns false when the row was not unpaid.
    async fn mark_paid(&self, id: Uuid) -> Result<bool>;
    /// Counts down a finite session allowance; no-op on unlimited rows.
    async fn decrement_sessions(&self, id: Uuid) -> Result<bool>;
    /// Unexpired memberships still referencing a package.
    async fn count_active_for_package(&self, package_id: Uuid, now: DateTime<Utc>) -> Result<i64>;
    /// Paid memberships referencing a package, expired or not.
    async fn count_paid_for_package(&self, package_id: Uuid) -> Result<i64>;
}

#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    async fn create(&self, schedule: CreateScheduleRequest) -> Result<WorkoutSchedule>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<WorkoutSchedule>>;
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<WorkoutSchedule>>;
    async fn update(&self, id: Uuid, update: UpdateScheduleRequest) -> Result<WorkoutSchedule>;
    async fn set_attendance(&self, id: Uuid, attendance: &[Uuid]) -> Result<()>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: CreateSessionRequest) -> Result<WorkoutSession>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<WorkoutSession>>;
    async fn list_for_user(&self, user_id: Uuid, limit: i64, offset: i64) -> Result<Vec<WorkoutSession>>;
    async fn count_for_user(&self, user_id: Uuid) -> Result<i64>;
    /// Scheduled sessions awaiting coach/staff confirmation.
    async fn list_pending(&self, limit: i64, offset: i64) -> Result<Vec<WorkoutSession>>;
    async fn count_pending(&self) -> Result<i64>;
    // Transitions are compare-and-swap on the status column: each returns
    // false when the row was no longer in the expected state, so a lost race
    // can never apply a second transition.
    async fn confirm(&self, id: Uuid) -> Result<bool>;
    async fn check_in(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool>;
    async fn check_out(&self, id: Uuid, at: DateTime<Utc>, notes: Option<&str>) -> Result<bool>;
    async fn cancel(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    async fn create(&self, feedback: CreateFeedbackRequest) -> Result<Feedback>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Feedback>>;
    async fn list_by_target(
        &self,
        target: FeedbackTarget,
        status: Option<FeedbackStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Feedback>>;
    async fn count_by_target(
        &self,
        target: FeedbackTarget,
        status: Option<FeedbackStatus>,
    ) -> Result<i64>;
    async fn stats_for_target(&self, target: FeedbackTarget) -> Result<FeedbackStats>;
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Feedback>>;
    async fn update_status(
        &self,
        id: Uuid,
        status: FeedbackStatus,
        admin_response: Option<&AdminResponse>,
    ) -> Result<Feedback>;
}
