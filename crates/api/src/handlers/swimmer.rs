use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;
use swimbook_core::{
    errors::SwimError,
    models::swimmer::{CreateSwimmerRequest, Swimmer},
};
use uuid::Uuid;

use crate::{ApiState, handlers::require_text, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn create_swimmer(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateSwimmerRequest>,
) -> Result<Json<Swimmer>, AppError> {
    require_text(&payload.name, "name")?;
    require_text(&payload.email, "email")?;

    if payload.level < 0 {
        return Err(AppError(SwimError::InvalidInput(
            "level must not be negative".to_string(),
        )));
    }

    let db_swimmer = swimbook_db::repositories::swimmer::create_swimmer(
        &state.db_pool,
        payload.name.trim(),
        payload.email.trim(),
        payload.level,
    )
    .await
    .map_err(SwimError::Database)?;

    tracing::info!("Registered swimmer {}", db_swimmer.id);
    Ok(Json(db_swimmer.into()))
}

#[axum::debug_handler]
pub async fn get_swimmer(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Swimmer>, AppError> {
    let db_swimmer = swimbook_db::repositories::swimmer::get_swimmer_by_id(&state.db_pool, id)
        .await
        .map_err(SwimError::Database)?
        .ok_or_else(|| SwimError::NotFound(format!("Swimmer with ID {} not found", id)))?;

    Ok(Json(db_swimmer.into()))
}
