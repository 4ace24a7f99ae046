pub mod auth;
pub mod feedbacks;
pub mod memberships;
pub mod packages;
pub mod root;
pub mod rooms;
pub mod schedules;
pub mod sessions;
pub mod stats;
pub mod users;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{domain::User, error::Result, repository::UserRepository};

/// Resolved reference to another user, the shape the original UI expects
/// ("populate user, select name email").
#[derive(Debug, Clone, Serialize)]
pub struct UserRef {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserRef {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

pub async fn resolve_user_ref(
    repo: &dyn UserRepository,
    id: Option<Uuid>,
) -> Result<Option<UserRef>> {
    match id {
        Some(id) => Ok(repo.find_by_id(id).await?.as_ref().map(UserRef::from)),
        None => Ok(None),
    }
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(default = "PageParams::default_page")]
    pub page: i64,
    #[serde(default = "PageParams::default_limit")]
    pub limit: i64,
}

impl PageParams {
    pub(crate) fn default_page() -> i64 {
        1
    }

    pub(crate) fn default_limit() -> i64 {
        10
    }

    pub fn limit(&self) -> i64 {
        self.limit.clamp(1, 100)
    }

    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.limit()
    }
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub pages: i64,
}

impl Pagination {
    pub fn new(params: &PageParams, total: i64) -> Self {
        let limit = params.limit();
        Self {
            total,
            page: params.page.max(1),
            limit,
            pages: (total + limit - 1) / limit,
        }
    }
}
