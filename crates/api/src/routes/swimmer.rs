use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/swimmers", post(handlers::swimmer::create_swimmer))
        .route("/api/swimmers/:id", get(handlers::swimmer::get_swimmer))
}
