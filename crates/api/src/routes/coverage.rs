use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/lessons/:id/coverage",
            post(handlers::coverage::create_coverage_request),
        )
        .route(
            "/api/coverage",
            get(handlers::coverage::list_open_coverage_requests),
        )
        .route(
            "/api/coverage/:id/accept",
            post(handlers::coverage::accept_coverage_request),
        )
        .route(
            "/api/coverage/:id",
            delete(handlers::coverage::cancel_coverage_request),
        )
}
