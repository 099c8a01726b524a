use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::NaiveDate;
use common::doc_store::Document;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{default_category, lenient_amount};

/// One expense document as stored in the `expenses` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Expense {
    #[serde(default)]
    pub expense_id: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub recurring: bool,
    // Only meaningful for the "Software Licenses" category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub software_name: Option<String>,
}

#[derive(Serialize)]
pub(crate) struct ExpenseResponse {
    pub response: Vec<Document<Expense>>,
}

impl IntoResponse for ExpenseResponse {
    fn into_response(self) -> axum::response::Response {
        let body = Json(json!({
            "expenses": self.response
        }));

        (StatusCode::OK, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_category_lands_in_uncategorized() {
        let doc = json!({
            "expenseId": "4711",
            "amount": 120,
            "date": "2024-03-02"
        });
        let expense: Expense = serde_json::from_value(doc).unwrap();
        assert_eq!(expense.category, super::super::UNCATEGORIZED);
        assert_eq!(expense.amount, Decimal::from(120));
        assert!(!expense.recurring);
    }

    #[test]
    fn malformed_amount_coerces_to_zero() {
        let doc = json!({
            "expenseId": "4712",
            "category": "Rent",
            "amount": "not a number",
            "date": "2024-03-02"
        });
        let expense: Expense = serde_json::from_value(doc).unwrap();
        assert_eq!(expense.amount, Decimal::ZERO);
    }

    #[test]
    fn string_amount_parses() {
        let doc = json!({
            "expenseId": "4713",
            "category": "Utilities",
            "amount": "88.40",
            "date": "2024-03-02",
            "accountId": "ACC-1042"
        });
        let expense: Expense = serde_json::from_value(doc).unwrap();
        assert_eq!(expense.amount, Decimal::new(8840, 2));
        assert_eq!(expense.account_id.as_deref(), Some("ACC-1042"));
    }
}
