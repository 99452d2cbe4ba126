use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/lessons/:id/waitlist",
            get(handlers::waitlist::get_waitlist).post(handlers::waitlist::join_waitlist),
        )
        .route(
            "/api/lessons/:id/waitlist/next",
            get(handlers::waitlist::get_next_candidate),
        )
        .route(
            "/api/lessons/:id/waitlist/reorder",
            post(handlers::waitlist::reorder_waitlist),
        )
        .route(
            "/api/lessons/:id/waitlist/:entry_id/promote",
            post(handlers::waitlist::promote_entry),
        )
        .route(
            "/api/lessons/:id/waitlist/:entry_id",
            delete(handlers::waitlist::cancel_entry),
        )
}
