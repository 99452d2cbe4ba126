use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/lessons", post(handlers::lesson::create_lesson))
        .route(
            "/api/lessons/conflicts",
            post(handlers::lesson::check_conflict),
        )
        .route("/api/lessons/:id", get(handlers::lesson::get_lesson))
}
