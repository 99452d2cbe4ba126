use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/instructors",
            post(handlers::instructor::create_instructor),
        )
        .route(
            "/api/instructors/:id/lessons",
            get(handlers::instructor::get_instructor_lessons),
        )
        .route(
            "/api/instructors/:id/conflicts",
            get(handlers::instructor::get_instructor_conflicts),
        )
}
