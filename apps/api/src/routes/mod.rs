pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::{career, growth, onboarding, progress, trends};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Users & onboarding
        .route(
            "/api/v1/users/register",
            post(onboarding::handlers::handle_register),
        )
        .route(
            "/api/v1/users/lookup",
            get(onboarding::handlers::handle_lookup),
        )
        .route(
            "/api/v1/users/onboard",
            post(onboarding::handlers::handle_onboard),
        )
        .route(
            "/api/v1/users/:user_id/profile",
            get(onboarding::handlers::handle_get_profile),
        )
        // Growth path
        .route(
            "/api/v1/growth-path/generate",
            post(growth::handlers::handle_generate),
        )
        .route(
            "/api/v1/growth-path/:user_id",
            get(growth::handlers::handle_get_roadmap),
        )
        // Progress tracking
        .route(
            "/api/v1/progress/update",
            post(progress::handlers::handle_update),
        )
        .route(
            "/api/v1/progress/:user_id/summary",
            get(progress::handlers::handle_summary),
        )
        .route(
            "/api/v1/progress/:user_id/tasks",
            get(progress::handlers::handle_tasks),
        )
        // Professional profile
        .route(
            "/api/v1/profile/:user_id/resume",
            get(career::handlers::handle_get_resume),
        )
        .route(
            "/api/v1/profile/:user_id/linkedin",
            get(career::handlers::handle_get_linkedin),
        )
        .route(
            "/api/v1/profile/refresh",
            post(career::handlers::handle_refresh),
        )
        .route(
            "/api/v1/profile/contact",
            post(career::handlers::handle_contact),
        )
        // Utilities
        .route("/api/v1/trends/simulate", post(trends::handle_simulate))
        .with_state(state)
}
