pub mod feedback_service;
pub mod membership_service;
pub mod schedule_service;
pub mod session_service;
pub mod user_service;

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::AuthService;
use crate::repository::*;

pub use feedback_service::FeedbackService;
pub use membership_service::MembershipService;
pub use schedule_service::ScheduleService;
pub use session_service::SessionService;
pub use user_service::UserService;

pub struct ServiceContext {
    pub user_repo: Arc<dyn UserRepository>,
    pub package_repo: Arc<dyn PackageRepository>,
    pub room_repo: Arc<dyn RoomRepository>,
    pub membership_repo: Arc<dyn MembershipRepository>,
    pub schedule_repo: Arc<dyn ScheduleRepository>,
    pub session_repo: Arc<dyn SessionRepository>,
    pub feedback_repo: Arc<dyn FeedbackRepository>,
    pub auth_service: Arc<AuthService>,
    pub user_service: UserService,
    pub membership_service: MembershipService,
    pub schedule_service: ScheduleService,
    pub session_service: SessionService,
    pub feedback_service: FeedbackService,
    pub db_pool: SqlitePool,
}

impl ServiceContext {
    pub fn new(db_pool: SqlitePool, auth_service: Arc<AuthService>) -> Self {
        let user_repo: Arc<dyn UserRepository> =
            Arc::new(SqliteUserRepository::new(db_pool.clone()));
        let package_repo: Arc<dyn PackageRepository> =
            Arc::new(SqlitePackageRepository::new(db_pool.clone()));
        let room_repo: Arc<dyn RoomRepository> =
            Arc::new(SqliteRoomRepository::new(db_pool.clone()));
        let membership_repo: Arc<dyn MembershipRepository> =
            Arc::new(SqliteMembershipRepository::new(db_pool.clone()));
        let schedule_repo: Arc<dyn ScheduleRepository> =
            Arc::new(SqliteScheduleRepository::new(db_pool.clone()));
        let session_repo: Arc<dyn SessionRepository> =
            Arc::new(SqliteSessionRepository::new(db_pool.clone()));
        let feedback_repo: Arc<dyn FeedbackRepository> =
            Arc::new(SqliteFeedbackRepository::new(db_pool.clone()));

        let user_service = UserService::new(user_repo.clone(), auth_service.clone());
        let membership_service =
            MembershipService::new(membership_repo.clone(), package_repo.clone());
        let schedule_service = ScheduleService::new(schedule_repo.clone());
        let session_service =
            SessionService::new(session_repo.clone(), membership_repo.clone());
        let feedback_service = FeedbackService::new(feedback_repo.clone());

        Self {
            user_repo,
            package_repo,
            room_repo,
            membership_repo,
            schedule_repo,
            session_repo,
            feedback_repo,
            auth_service,
            user_service,
            membership_service,
            schedule_service,
            session_service,
            feedback_service,
            db_pool,
        }
    }
}
