use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::NaiveDate;
use common::doc_store::Document;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{default_category, lenient_amount};

/// One earning document. `reference_id` carries the project the revenue
/// is attributed to when the category is "Project Revenue".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Earning {
    #[serde(default)]
    pub earning_id: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub reference_id: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
}

#[derive(Serialize)]
pub(crate) struct EarningResponse {
    pub response: Vec<Document<Earning>>,
}

impl IntoResponse for EarningResponse {
    fn into_response(self) -> axum::response::Response {
        let body = Json(json!({
            "earnings": self.response
        }));

        (StatusCode::OK, body).into_response()
    }
}
