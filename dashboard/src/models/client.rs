use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::NaiveDate;
use common::doc_store::Document;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::lenient_amount_opt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub(crate) enum ClientStatus {
    #[default]
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Client {
    pub client_id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub contract_id: Option<String>,
    #[serde(default)]
    pub contract_start_date: Option<NaiveDate>,
    // Absent while the engagement is ongoing.
    #[serde(default)]
    pub contract_end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_amount_opt")]
    pub contract_amount: Option<Decimal>,
    #[serde(default)]
    pub status: ClientStatus,
}

#[derive(Serialize)]
pub(crate) struct ClientResponse {
    pub response: Vec<Document<Client>>,
}

impl IntoResponse for ClientResponse {
    fn into_response(self) -> axum::response::Response {
        let body = Json(json!({
            "clients": self.response
        }));

        (StatusCode::OK, body).into_response()
    }
}
