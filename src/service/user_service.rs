use std::sync::Arc;

use uuid::Uuid;
use validator::ValidateEmail;

use crate::{
    auth::AuthService,
    domain::{CreateUserRequest, Gender, Role, UpdateUserRequest, User},
    error::{AppError, Result},
    repository::UserRepository,
};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    auth: Arc<AuthService>,
}

pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub birth_year: Option<i32>,
    pub gender: Option<Gender>,
    pub role: Role,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>, auth: Arc<AuthService>) -> Self {
        Self { repo, auth }
    }

    /// Creates a user and returns it with a fresh bearer token.
    pub async fn register(&self, request: RegisterUser) -> Result<(User, String)> {
        if self.repo.find_by_email(&request.email).await?.is_some() {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        if !request.email.validate_email() {
            return Err(AppError::Validation("Invalid email".to_string()));
        }

        if request.password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation("Password too short".to_string()));
        }

        let password_hash = AuthService::hash_password(&request.password)?;

        let user = self
            .repo
            .create(CreateUserRequest {
                name: request.name,
                email: request.email,
                password_hash,
                phone: request.phone,
                birth_year: request.birth_year,
                gender: request.gender,
                role: request.role,
            })
            .await?;

        let token = self.auth.create_token(user.id, user.role)?;

        Ok((user, token))
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> Result<(User, String)> {
        let user = self
            .repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound("User doesn't exist".to_string()))?;

        if !AuthService::verify_password(password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        if !user.active {
            return Err(AppError::Forbidden);
        }

        let token = self.auth.create_token(user.id, user.role)?;

        Ok((user, token))
    }

    /// Applies a role-scoped field mask: only admins may touch role or the
    /// active flag, and non-admins may only update their own profile.
    pub async fn update_profile(
        &self,
        caller: &User,
        target_id: Uuid,
        update: UpdateUserRequest,
    ) -> Result<User> {
        if caller.role != Role::Admin {
            if caller.id != target_id {
                return Err(AppError::Forbidden);
            }
            if update.role.is_some() || update.active.is_some() {
                return Err(AppError::Forbidden);
            }
        }

        self.repo.update(target_id, update).await
    }

    /// Soft deactivation; the account row is kept for referencing entities.
    pub async fn deactivate(&self, id: Uuid) -> Result<User> {
        self.repo
            .update(
                id,
                UpdateUserRequest {
                    active: Some(false),
                    ..Default::default()
                },
            )
            .await
    }
}
