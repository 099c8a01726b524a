use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    AppState,
    models::client::{Client, ClientResponse},
};

use super::common::{AppError, require_write};

pub(crate) const COLLECTION: &str = "clients";

pub(crate) async fn list(State(state): State<Arc<AppState>>) -> Result<ClientResponse, AppError> {
    let response = state
        .store
        .fetch_all::<Client>(COLLECTION)
        .await
        .map_err(AppError::DatabaseError)?;

    Ok(ClientResponse { response })
}

pub(crate) async fn create(
    State(state): State<Arc<AppState>>,
    Json(client): Json<Client>,
) -> Result<impl IntoResponse, AppError> {
    require_write(state.access.clients, COLLECTION)?;

    let id = state
        .store
        .insert(COLLECTION, &client)
        .await
        .map_err(AppError::DatabaseError)?;

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

pub(crate) async fn update(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    Json(client): Json<Client>,
) -> Result<StatusCode, AppError> {
    require_write(state.access.clients, COLLECTION)?;

    let updated = state
        .store
        .update(COLLECTION, id, &client)
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
    require_write(state.access.clients, COLLECTION)?;

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
