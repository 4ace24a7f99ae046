use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::{
    domain::{Membership, NewMembership, Package, PaymentStatus, UpdatePackageRequest},
    error::{AppError, Result},
    repository::{MembershipRepository, PackageRepository},
};

#[derive(Clone)]
pub struct MembershipService {
    memberships: Arc<dyn MembershipRepository>,
    packages: Arc<dyn PackageRepository>,
}

impl MembershipService {
    pub fn new(
        memberships: Arc<dyn MembershipRepository>,
        packages: Arc<dyn PackageRepository>,
    ) -> Self {
        Self {
            memberships,
            packages,
        }
    }

    /// Issues a new membership row: start = now, end = start + package
    /// duration, session counter copied from the package. Renewal goes
    /// through the same path; the ledger is append-only.
    pub async fn register(
        &self,
        user_id: Uuid,
        package_id: Uuid,
        paid: bool,
    ) -> Result<Membership> {
        let package = self
            .packages
            .find_by_id(package_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Package not found".to_string()))?;

        let start_date = Utc::now();
        let end_date = start_date + Duration::days(package.duration_days);

        self.memberships
            .create(NewMembership {
                user_id,
                package_id,
                start_date,
                end_date,
                sessions_remaining: package.session_limit,
                payment_status: if paid {
                    PaymentStatus::Paid
                } else {
                    PaymentStatus::Unpaid
                },
            })
            .await
    }

    /// Payment status only ever moves unpaid -> paid.
    pub async fn set_payment_status(
        &self,
        membership_id: Uuid,
        status: PaymentStatus,
    ) -> Result<Membership> {
        let membership = self
            .memberships
            .find_by_id(membership_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Membership not found".to_string()))?;

        if status == PaymentStatus::Unpaid {
            return Err(AppError::InvalidState(
                "Payment status cannot move back to unpaid".to_string(),
            ));
        }

        if !self.memberships.mark_paid(membership_id).await? {
            // Row exists but was not unpaid: it is already paid.
            return Err(AppError::InvalidState(
                "Membership is already paid".to_string(),
            ));
        }

        self.memberships
            .find_by_id(membership.id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve membership".to_string()))
    }

    /// The active membership is the newest row whose end date has not passed.
    pub async fn active_for_user(&self, user_id: Uuid) -> Result<Vec<Membership>> {
        self.memberships
            .list_active_for_user(user_id, Utc::now())
            .await
    }

    pub async fn history_for_user(&self, user_id: Uuid) -> Result<Vec<Membership>> {
        self.memberships.list_for_user(user_id).await
    }

    pub async fn list_all(
        &self,
        created_from: Option<DateTime<Utc>>,
        created_to: Option<DateTime<Utc>>,
    ) -> Result<Vec<Membership>> {
        self.memberships.list_all(created_from, created_to).await
    }

    /// Duration and price freeze once anyone has paid for the package; the
    /// descriptive fields stay editable. Issued memberships copy these values
    /// at registration, so the freeze keeps the ledger and the catalog
    /// telling the same story about what was sold.
    pub async fn update_package(
        &self,
        package_id: Uuid,
        update: UpdatePackageRequest,
    ) -> Result<Package> {
        self.packages
            .find_by_id(package_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Package not found".to_string()))?;

        if update.duration_days.is_some() || update.price.is_some() {
            let paid = self.memberships.count_paid_for_package(package_id).await?;
            if paid > 0 {
                return Err(AppError::Conflict(format!(
                    "Cannot change duration or price: {} paid membership(s) reference this package",
                    paid
                )));
            }
        }

        self.packages.update(package_id, update).await
    }

    /// Package deletion guard: refuse while unexpired memberships reference it.
    pub async fn delete_package(&self, package_id: Uuid) -> Result<()> {
        self.packages
            .find_by_id(package_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Package not found".to_string()))?;

        let in_use = self
            .memberships
            .count_active_for_package(package_id, Utc::now())
            .await?;

        if in_use > 0 {
            return Err(AppError::Conflict(format!(
                "Package is referenced by {} active membership(s)",
                in_use
            )));
        }

        self.packages.delete(package_id).await
    }
}
