use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    AppState,
    models::account::{Account, AccountResponse},
};

use super::common::{AppError, require_write};

pub(crate) const COLLECTION: &str = "accounts";

pub(crate) async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<AccountResponse, AppError> {
    let response = state
        .store
        .fetch_all::<Account>(COLLECTION)
        .await
        .map_err(AppError::DatabaseError)?;

    Ok(AccountResponse { response })
}

pub(crate) async fn create(
    State(state): State<Arc<AppState>>,
    Json(account): Json<Account>,
) -> Result<impl IntoResponse, AppError> {
    require_write(state.access.accounts, COLLECTION)?;

    let id = state
        .store
        .insert(COLLECTION, &account)
        .await
        .map_err(AppError::DatabaseError)?;

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

pub(crate) async fn update(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    Json(account): Json<Account>,
) -> Result<StatusCode, AppError> {
    require_write(state.access.accounts, COLLECTION)?;

    let updated = state
        .store
        .update(COLLECTION, id, &account)
        .await
        .map_err(AppError::DatabaseError)?;
    if !updated {
        return Err(AppError::NotFound(COLLECTION));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn remove(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, AppError> {
    require_write(state.access.accounts, COLLECTION)?;

    let deleted = state
        .store
        .delete(COLLECTION, id)
        .await
        .map_err(AppError::DatabaseError)?;
    if !deleted {
        return Err(AppError::NotFound(COLLECTION));
    }

    Ok(StatusCode::NO_CONTENT)
}
