use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    AppState,
    analytics::RecordFilter,
    models::{
        earning::{Earning, EarningResponse},
        record::FinancialRecord,
    },
};

use super::common::{AppError, require_write};

pub(crate) const COLLECTION: &str = "earnings";

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct EarningListRequest {
    pub category: Option<String>,
    pub account_id: Option<String>,
}

pub(crate) async fn list(
    Query(request): Query<EarningListRequest>,
    State(state): State<Arc<AppState>>,
) -> Result<EarningResponse, AppError> {
    // Account narrowing happens in the store; the search term is applied
    // to the fetched set.
    let docs = match &request.account_id {
        Some(account_id) => {
            state
                .store
                .fetch_filtered::<Earning>(COLLECTION, &[("accountId", account_id)])
                .await
        }
        None => state.store.fetch_all::<Earning>(COLLECTION).await,
    }
    .map_err(AppError::DatabaseError)?;

    let filter = RecordFilter {
        category_term: request.category.as_deref(),
        ..RecordFilter::default()
    };

    let response = docs
        .into_iter()
        .filter(|doc| filter.matches(&FinancialRecord::from(&doc.body)))
        .collect();

    Ok(EarningResponse { response })
}

pub(crate) async fn create(
    State(state): State<Arc<AppState>>,
    Json(earning): Json<Earning>,
) -> Result<impl IntoResponse, AppError> {
    require_write(state.access.earnings, COLLECTION)?;

    let id = state
        .store
        .insert(COLLECTION, &earning)
        .await
        .map_err(AppError::DatabaseError)?;

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

pub(crate) async fn update(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    Json(earning): Json<Earning>,
) -> Result<StatusCode, AppError> {
    require_write(state.access.earnings, COLLECTION)?;

    let updated = state
        .store
        .update(COLLECTION, id, &earning)
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
    require_write(state.access.earnings, COLLECTION)?;

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
