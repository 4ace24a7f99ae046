use std::sync::Arc;

use uuid::Uuid;

use crate::{
    domain::{CreateScheduleRequest, UpdateScheduleRequest, User, WorkoutSchedule},
    error::{AppError, Result},
    repository::ScheduleRepository,
};

#[derive(Clone)]
pub struct ScheduleService {
    repo: Arc<dyn ScheduleRepository>,
}

impl ScheduleService {
    pub fn new(repo: Arc<dyn ScheduleRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(
        &self,
        creator: &User,
        request: CreateScheduleRequest,
    ) -> Result<WorkoutSchedule> {
        if !creator.role.is_trainer_side() {
            return Err(AppError::Forbidden);
        }

        self.repo.create(request).await
    }

    pub async fn update(
        &self,
        updater: &User,
        schedule_id: Uuid,
        update: UpdateScheduleRequest,
    ) -> Result<WorkoutSchedule> {
        if !updater.role.is_trainer_side() {
            return Err(AppError::Forbidden);
        }

        self.repo.update(schedule_id, update).await
    }

    pub async fn delete(&self, deleter: &User, schedule_id: Uuid) -> Result<()> {
        if !deleter.role.is_trainer_side() {
            return Err(AppError::Forbidden);
        }

        self.repo
            .find_by_id(schedule_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Schedule not found".to_string()))?;

        self.repo.delete(schedule_id).await
    }

    /// A plain member may only read their own schedules.
    pub async fn for_user(&self, requester: &User, user_id: Uuid) -> Result<Vec<WorkoutSchedule>> {
        if !requester.role.is_trainer_side() && requester.id != user_id {
            return Err(AppError::Forbidden);
        }

        self.repo.list_for_user(user_id).await
    }

    /// Idempotent: marking attendance twice leaves the set unchanged.
    pub async fn mark_attendance(
        &self,
        requester_id: Uuid,
        schedule_id: Uuid,
    ) -> Result<WorkoutSchedule> {
        let schedule = self
            .repo
            .find_by_id(schedule_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Schedule not found".to_string()))?;

        if schedule.user_id != requester_id {
            return Err(AppError::Forbidden);
        }

        if schedule.attendance.contains(&requester_id) {
            return Ok(schedule);
        }

        let mut attendance = schedule.attendance.clone();
        attendance.push(requester_id);
        self.repo.set_attendance(schedule_id, &attendance).await?;

        self.repo
            .find_by_id(schedule_id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve schedule".to_string()))
    }
}
