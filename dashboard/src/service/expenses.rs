use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    AppState,
    analytics::{DateWindow, RecordFilter},
    models::{
        expense::{Expense, ExpenseResponse},
        record::FinancialRecord,
    },
};

use super::common::{AppError, require_write};

pub(crate) const COLLECTION: &str = "expenses";

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct ExpenseListRequest {
    // Case-insensitive category search term.
    pub category: Option<String>,
    pub window: DateWindow,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub account_id: Option<String>,
}

pub(crate) async fn list(
    Query(request): Query<ExpenseListRequest>,
    State(state): State<Arc<AppState>>,
) -> Result<ExpenseResponse, AppError> {
    let docs = state
        .store
        .fetch_all::<Expense>(COLLECTION)
        .await
        .map_err(AppError::DatabaseError)?;

    let today = Utc::now().date_naive();
    let (start, end) = match request.window {
        DateWindow::Custom => (request.from, request.to),
        window => window.bounds(today),
    };
    let filter = RecordFilter {
        start,
        end,
        account_id: request.account_id.as_deref(),
        category_term: request.category.as_deref(),
        months: None,
    };

    let response = docs
        .into_iter()
        .filter(|doc| filter.matches(&FinancialRecord::from(&doc.body)))
        .collect();

    Ok(ExpenseResponse { response })
}

pub(crate) async fn create(
    State(state): State<Arc<AppState>>,
    Json(expense): Json<Expense>,
) -> Result<impl IntoResponse, AppError> {
    require_write(state.access.expenses, COLLECTION)?;

    let id = state
        .store
        .insert(COLLECTION, &expense)
        .await
        .map_err(AppError::DatabaseError)?;

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

pub(crate) async fn update(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    Json(expense): Json<Expense>,
) -> Result<StatusCode, AppError> {
    require_write(state.access.expenses, COLLECTION)?;

    let updated = state
        .store
        .update(COLLECTION, id, &expense)
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
    require_write(state.access.expenses, COLLECTION)?;

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
