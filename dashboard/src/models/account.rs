use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::doc_store::Document;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub(crate) enum AccountStatus {
    #[default]
    Active,
    Closed,
}

/// One account document. `projects` and `clients` hold the ids of the
/// linked documents; the revenue/margin figures the old screens stored
/// on the account are derived on demand instead (see the summary
/// service).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Account {
    pub account_id: String,
    pub name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub status: AccountStatus,
    #[serde(default)]
    pub projects: Vec<String>,
    #[serde(default)]
    pub clients: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Serialize)]
pub(crate) struct AccountResponse {
    pub response: Vec<Document<Account>>,
}

impl IntoResponse for AccountResponse {
    fn into_response(self) -> axum::response::Response {
        let body = Json(json!({
            "accounts": self.response
        }));

        (StatusCode::OK, body).into_response()
    }
}
