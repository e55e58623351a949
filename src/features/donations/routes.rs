use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::donations::handlers;
use crate::features::donations::services::DonationService;

/// Create routes for the donations feature (all require authentication)
pub fn routes(service: Arc<DonationService>) -> Router {
    Router::new()
        .route(
            "/api/donations",
            post(handlers::create_donation).get(handlers::list_donations),
        )
        .route(
            "/api/donations/{id}",
            get(handlers::get_donation)
                .patch(handlers::update_donation)
                .delete(handlers::delete_donation),
        )
        .route(
            "/api/donations/{id}/reserve",
            post(handlers::reserve_donation),
        )
        .route("/api/donations/{id}/close", post(handlers::close_donation))
        .with_state(service)
}
