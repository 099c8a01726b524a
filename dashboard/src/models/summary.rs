use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::analytics::{CategoryTotals, RunwayBreakdown};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SummaryRequest {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub account_id: Option<String>,
    // Case-insensitive category search term.
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RunwayRequest {
    // Comma-separated `YYYY-M` tokens with a zero-based month.
    pub months: Option<String>,
    pub account_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SummaryResponseBody {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    pub expenses_by_category: CategoryTotals,
    pub earnings_by_category: CategoryTotals,
    pub total_expenses: Decimal,
    pub total_earnings: Decimal,
    pub profit_loss: Decimal,
}

pub(crate) struct SummaryResponse(pub SummaryResponseBody);

impl IntoResponse for SummaryResponse {
    fn into_response(self) -> axum::response::Response {
        let body = Json(json!({
            "summary": self.0
        }));

        (StatusCode::OK, body).into_response()
    }
}

pub(crate) struct RunwayResponse(pub RunwayBreakdown);

impl IntoResponse for RunwayResponse {
    fn into_response(self) -> axum::response::Response {
        let body = Json(json!({
            "runway": self.0
        }));

        (StatusCode::OK, body).into_response()
    }
}

/// Per-account rollup the way the accounts screen derived it: linked
/// project budgets, recorded expenses, and the margin on the remainder.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AccountRollup {
    pub account_id: String,
    pub name: String,
    pub total_budget: Decimal,
    pub total_expenses: Decimal,
    pub revenue: Decimal,
    pub profit_margin: Decimal,
}

#[derive(Serialize)]
pub(crate) struct AccountRollupResponse {
    pub response: Vec<AccountRollup>,
}

impl IntoResponse for AccountRollupResponse {
    fn into_response(self) -> axum::response::Response {
        let body = Json(json!({
            "accounts": self.response
        }));

        (StatusCode::OK, body).into_response()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProjectRollup {
    pub project_id: String,
    pub name: String,
    pub budget: Decimal,
    pub total_expenses: Decimal,
    pub revenue: Decimal,
}

#[derive(Serialize)]
pub(crate) struct ProjectRollupResponse {
    pub response: Vec<ProjectRollup>,
}

impl IntoResponse for ProjectRollupResponse {
    fn into_response(self) -> axum::response::Response {
        let body = Json(json!({
            "projects": self.response
        }));

        (StatusCode::OK, body).into_response()
    }
}
