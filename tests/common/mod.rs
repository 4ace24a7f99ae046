use std::sync::Arc;

use liftdesk::{
    auth::AuthService,
    domain::{CreatePackageRequest, Gender, Package, Role, User},
    service::{user_service::RegisterUser, ServiceContext},
};
use sqlx::SqlitePool;

pub async fn setup() -> anyhow::Result<ServiceContext> {
    let pool = SqlitePool::connect(":memory:").await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let auth = Arc::new(AuthService::new("test-secret", 7));
    Ok(ServiceContext::new(pool, auth))
}

pub async fn create_user(ctx: &ServiceContext, email: &str, role: Role) -> anyhow::Result<User> {
    let (user, _token) = ctx
        .user_service
        .register(RegisterUser {
            name: format!("Test {}", role.as_str()),
            email: email.to_string(),
            password: "secure_password123".to_string(),
            phone: Some("0900000000".to_string()),
            birth_year: Some(1990),
            gender: Some(Gender::Other),
            role,
        })
        .await?;
    Ok(user)
}

pub async fn create_package(
    ctx: &ServiceContext,
    duration_days: i64,
    session_limit: Option<i64>,
    price: i64,
) -> anyhow::Result<Package> {
    let package = ctx
        .package_repo
        .create(CreatePackageRequest {
            name: format!("{}-day package", duration_days),
            duration_days,
            session_limit,
            price,
            with_trainer: session_limit.is_some(),
        })
        .await?;
    Ok(package)
}
