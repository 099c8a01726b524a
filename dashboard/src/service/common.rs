use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::models::settings::AccessLevel;

pub(crate) enum AppError {
    DatabaseError(sqlx::Error),
    WriteDenied(&'static str),
    NotFound(&'static str),
    InvalidRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message) = match self {
            AppError::DatabaseError(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {e}"),
            ),
            AppError::WriteDenied(collection) => (
                StatusCode::FORBIDDEN,
                format!("Write access to {collection} is not granted"),
            ),
            AppError::NotFound(collection) => (
                StatusCode::NOT_FOUND,
                format!("No such document in {collection}"),
            ),
            AppError::InvalidRequest(reason) => (StatusCode::BAD_REQUEST, reason),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Gate for the mutating command set. Collections configured read-only
/// refuse every write with the same error, so there is one handler set
/// instead of parallel editable/read-only surfaces.
pub(crate) fn require_write(level: AccessLevel, collection: &'static str) -> Result<(), AppError> {
    if level.allows_writes() {
        Ok(())
    } else {
        Err(AppError::WriteDenied(collection))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_level_refuses_writes() {
        assert!(require_write(AccessLevel::Read, "expenses").is_err());
    }

    #[test]
    fn full_level_admits_writes() {
        assert!(require_write(AccessLevel::Full, "expenses").is_ok());
    }
}
