use crate::features::users::handlers::profile_handler;
use crate::features::users::services::UserProfileService;
use axum::{routing::get, Router};
use std::sync::Arc;

pub fn routes(service: Arc<UserProfileService>) -> Router {
    Router::new()
        .route(
            "/api/me/profile",
            get(profile_handler::get_profile).patch(profile_handler::update_profile),
        )
        .with_state(service)
}
