//! REST surface
//!
//! JSON endpoints served next to the gateway socket.

mod extractors;
mod handlers;
mod response;

pub use extractors::{ValidatedJson, ValidatedQuery};
pub use response::{ApiError, ApiResult, ErrorBody};

use crate::server::GatewayState;
use axum::{
    http::StatusCode,
    routing::{get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;

/// Upper bound on one REST request, external place searches included
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Meeting and health routes
pub fn routes() -> Router<GatewayState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/meetings", meeting_routes())
        .layer(
            ServiceBuilder::new()
                // returns 503 Service Unavailable on timeout
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::SERVICE_UNAVAILABLE,
                    REQUEST_TIMEOUT,
                )),
        )
}

fn meeting_routes() -> Router<GatewayState> {
    Router::new()
        .route("/:meeting_id", put(handlers::register_meeting))
        .route("/:meeting_id/candidates", get(handlers::get_candidates))
        .route("/:meeting_id/tally", get(handlers::get_tally))
        .route("/:meeting_id/messages", get(handlers::get_messages))
        .route("/:meeting_id/selections", get(handlers::get_selections))
        .route("/:meeting_id/game", get(handlers::get_game))
        .route("/:meeting_id/recommendations", post(handlers::recommend))
}
