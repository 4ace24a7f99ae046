use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    domain::{CreateSessionRequest, SessionStatus, User, WorkoutSession},
    error::{AppError, Result},
    repository::{MembershipRepository, SessionRepository},
};

/// Drives the scheduled -> checked_in -> completed state machine, with
/// cancellation from scheduled only. Transition writes are compare-and-swap
/// in the repository, so two racing requests cannot both move the same row.
#[derive(Clone)]
pub struct SessionService {
    sessions: Arc<dyn SessionRepository>,
    memberships: Arc<dyn MembershipRepository>,
}

impl SessionService {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        memberships: Arc<dyn MembershipRepository>,
    ) -> Self {
        Self {
            sessions,
            memberships,
        }
    }

    pub async fn create(
        &self,
        creator: &User,
        request: CreateSessionRequest,
    ) -> Result<WorkoutSession> {
        if !creator.role.is_trainer_side() {
            return Err(AppError::Forbidden);
        }

        if let Some(membership_id) = request.membership_id {
            let membership = self
                .memberships
                .find_by_id(membership_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Membership not found".to_string()))?;

            if !membership.is_active(Utc::now()) {
                return Err(AppError::Validation("Membership expired".to_string()));
            }

            // Exhausted session allowance rejects new bookings outright.
            if membership.sessions_remaining == Some(0) {
                return Err(AppError::Validation(
                    "No sessions remaining on membership".to_string(),
                ));
            }
        }

        self.sessions.create(request).await
    }

    pub async fn confirm(&self, actor: &User, session_id: Uuid) -> Result<WorkoutSession> {
        if !actor.role.is_trainer_side() {
            return Err(AppError::Forbidden);
        }

        let session = self.get(session_id).await?;

        if !self.sessions.confirm(session_id).await? {
            return Err(invalid_transition(session.status, "confirm"));
        }

        self.get(session_id).await
    }

    /// Member-only: the session owner checks themselves in.
    pub async fn check_in(&self, requester_id: Uuid, session_id: Uuid) -> Result<WorkoutSession> {
        let session = self.get(session_id).await?;

        if session.user_id != requester_id {
            return Err(AppError::Forbidden);
        }

        if !self.sessions.check_in(session_id, Utc::now()).await? {
            return Err(invalid_transition(session.status, "check in"));
        }

        self.get(session_id).await
    }

    /// Coach/staff check-out completes the session and burns one session off
    /// the membership's finite allowance.
    pub async fn check_out(
        &self,
        actor: &User,
        session_id: Uuid,
        notes: Option<&str>,
    ) -> Result<WorkoutSession> {
        if !actor.role.is_trainer_side() {
            return Err(AppError::Forbidden);
        }

        let session = self.get(session_id).await?;

        if !self.sessions.check_out(session_id, Utc::now(), notes).await? {
            return Err(invalid_transition(session.status, "check out"));
        }

        if let Some(membership_id) = session.membership_id {
            self.memberships.decrement_sessions(membership_id).await?;
        }

        self.get(session_id).await
    }

    pub async fn cancel(&self, actor: &User, session_id: Uuid) -> Result<WorkoutSession> {
        if !actor.role.is_trainer_side() {
            return Err(AppError::Forbidden);
        }

        let session = self.get(session_id).await?;

        if !self.sessions.cancel(session_id).await? {
            return Err(invalid_transition(session.status, "cancel"));
        }

        self.get(session_id).await
    }

    pub async fn list_for_user(
        &self,
        requester: &User,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<WorkoutSession>, i64)> {
        if !requester.role.is_trainer_side() && requester.id != user_id {
            return Err(AppError::Forbidden);
        }

        let sessions = self.sessions.list_for_user(user_id, limit, offset).await?;
        let total = self.sessions.count_for_user(user_id).await?;

        Ok((sessions, total))
    }

    pub async fn list_pending(
        &self,
        requester: &User,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<WorkoutSession>, i64)> {
        if !requester.role.is_trainer_side() {
            return Err(AppError::Forbidden);
        }

        let sessions = self.sessions.list_pending(limit, offset).await?;
        let total = self.sessions.count_pending().await?;

        Ok((sessions, total))
    }

    async fn get(&self, session_id: Uuid) -> Result<WorkoutSession> {
        self.sessions
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Session not found".to_string()))
    }
}

fn invalid_transition(current: SessionStatus, action: &str) -> AppError {
    AppError::InvalidState(format!(
        "Cannot {} a session in status '{}'",
        action,
        current.as_str()
    ))
}
