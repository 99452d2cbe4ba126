pub mod coverage;
pub mod instructor;
pub mod lesson;
pub mod swimmer;
pub mod waitlist;

use sqlx::{Postgres, Transaction};
use swimbook_core::errors::SwimError;

use crate::{ApiState, middleware::error_handling::AppError};

pub(crate) async fn begin(state: &ApiState) -> Result<Transaction<'static, Postgres>, AppError> {
    swimbook_db::begin(&state.db_pool)
        .await
        .map_err(|e| AppError(SwimError::Database(e)))
}

pub(crate) async fn commit(tx: Transaction<'static, Postgres>) -> Result<(), AppError> {
    tx.commit()
        .await
        .map_err(|e| AppError(SwimError::Database(e.into())))
}

pub(crate) fn require_text(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError(SwimError::InvalidInput(format!(
            "{} must not be empty",
            field
        ))));
    }
    Ok(())
}
