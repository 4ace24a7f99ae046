pub mod handlers;
pub mod middleware;
pub mod state;

use std::sync::Arc;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{config::Settings, service::ServiceContext};
use state::AppState;

pub fn create_app(service_context: Arc<ServiceContext>, settings: Arc<Settings>) -> Router {
    let app_state = AppState::new(service_context, settings);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))
        // Auth routes (public)
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        // API routes
        .nest("/api", api_routes(app_state.clone()))
        .with_state(app_state)
        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive()) // Configure properly for production
        .layer(TraceLayer::new_for_http())
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/users", user_routes(state.clone()))
        .nest("/packages", package_routes(state.clone()))
        .nest("/rooms", room_routes(state.clone()))
        .nest("/memberships", membership_routes(state.clone()))
        .nest("/schedules", schedule_routes(state.clone()))
        .nest("/sessions", session_routes(state.clone()))
        .nest("/feedbacks", feedback_routes(state.clone()))
        .nest("/stats", stats_routes(state))
}

fn user_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::users::list))
        .route("/:id", get(handlers::users::get))
        .route("/:id", put(handlers::users::update))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ))
        // Deactivation is an admin action
        .nest(
            "/",
            Router::new()
                .route("/:id", delete(handlers::users::deactivate))
                .route_layer(axum::middleware::from_fn_with_state(
                    state,
                    middleware::auth::require_admin,
                )),
        )
}

fn package_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Any authenticated user may browse the catalog
        .route("/", get(handlers::packages::list))
        .route("/:id", get(handlers::packages::get))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ))
        // Catalog management is admin-only
        .nest(
            "/",
            Router::new()
                .route("/", post(handlers::packages::create))
                .route("/:id", put(handlers::packages::update))
                .route("/:id", delete(handlers::packages::delete))
                .route_layer(axum::middleware::from_fn_with_state(
                    state,
                    middleware::auth::require_admin,
                )),
        )
}

fn room_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Any authenticated user may browse the rooms
        .route("/", get(handlers::rooms::list))
        .route("/:id", get(handlers::rooms::get))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ))
        // Room management is admin-only
        .nest(
            "/",
            Router::new()
                .route("/", post(handlers::rooms::create))
                .route("/:id", put(handlers::rooms::update))
                .route("/:id", delete(handlers::rooms::delete))
                .route_layer(axum::middleware::from_fn_with_state(
                    state,
                    middleware::auth::require_admin,
                )),
        )
}

fn membership_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::memberships::create))
        .route("/user/:user_id", get(handlers::memberships::list_for_user))
        .route(
            "/active/:user_id",
            get(handlers::memberships::list_active_for_user),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ))
        .nest(
            "/",
            Router::new()
                .route("/", get(handlers::memberships::list_all))
                .route(
                    "/:id/payment-status",
                    patch(handlers::memberships::set_payment_status),
                )
                .route_layer(axum::middleware::from_fn_with_state(
                    state,
                    middleware::auth::require_staff,
                )),
        )
}

fn schedule_routes(state: AppState) -> Router<AppState> {
    // Role and ownership checks live in ScheduleService
    Router::new()
        .route("/user/:user_id", post(handlers::schedules::create))
        .route("/user/:user_id", get(handlers::schedules::list_for_user))
        .route("/:id", put(handlers::schedules::update))
        .route("/:id", delete(handlers::schedules::delete))
        .route("/:id/attendance", post(handlers::schedules::mark_attendance))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_auth,
        ))
}

fn session_routes(state: AppState) -> Router<AppState> {
    // Role and ownership checks live in SessionService
    Router::new()
        .route("/", post(handlers::sessions::create))
        .route("/user/:user_id", get(handlers::sessions::list_for_user))
        .route("/pending", get(handlers::sessions::list_pending))
        .route("/:id/confirm", post(handlers::sessions::confirm))
        .route("/:id/check-in", post(handlers::sessions::check_in))
        .route("/:id/check-out", post(handlers::sessions::check_out))
        .route("/:id/cancel", post(handlers::sessions::cancel))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_auth,
        ))
}

fn feedback_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::feedbacks::submit))
        .route("/my-feedbacks", get(handlers::feedbacks::my_feedbacks))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ))
        // Moderation surface is staff/admin
        .nest(
            "/",
            Router::new()
                .route("/target/:target", get(handlers::feedbacks::list_by_target))
                .route("/:id", get(handlers::feedbacks::get_detail))
                .route("/:id/status", patch(handlers::feedbacks::update_status))
                .route_layer(axum::middleware::from_fn_with_state(
                    state,
                    middleware::auth::require_staff,
                )),
        )
}

fn stats_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/revenue", get(handlers::stats::revenue))
        .route("/members", get(handlers::stats::member_growth))
        .route("/staff-performance", get(handlers::stats::staff_performance))
        .layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_admin,
        ))
}
