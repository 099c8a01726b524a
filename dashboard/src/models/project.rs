use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::doc_store::Document;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::lenient_amount;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub(crate) enum ProjectStatus {
    #[default]
    Active,
    #[serde(rename = "On Hold")]
    OnHold,
    Completed,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct FinancialMetrics {
    #[serde(deserialize_with = "lenient_amount")]
    pub budget: Decimal,
    pub roi: Decimal,
    pub burn_rate: Decimal,
    pub profit_margin: Decimal,
    pub revenue_generated: Decimal,
    pub expected_revenue: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Project {
    pub project_id: String,
    pub name: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub completion: f32,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub financial_metrics: FinancialMetrics,
}

#[derive(Serialize)]
pub(crate) struct ProjectResponse {
    pub response: Vec<Document<Project>>,
}

impl IntoResponse for ProjectResponse {
    fn into_response(self) -> axum::response::Response {
        let body = Json(json!({
            "projects": self.response
        }));

        (StatusCode::OK, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_maps_to_other() {
        let doc = json!({
            "projectId": "PRJ-77",
            "name": "Migration",
            "status": "Archived"
        });
        let project: Project = serde_json::from_value(doc).unwrap();
        assert_eq!(project.status, ProjectStatus::Other);
        assert_eq!(project.financial_metrics.budget, Decimal::ZERO);
    }

    #[test]
    fn budget_accepts_numeric_strings() {
        let doc = json!({
            "projectId": "PRJ-78",
            "name": "Rollout",
            "status": "On Hold",
            "financialMetrics": { "budget": "25000" }
        });
        let project: Project = serde_json::from_value(doc).unwrap();
        assert_eq!(project.status, ProjectStatus::OnHold);
        assert_eq!(project.financial_metrics.budget, Decimal::from(25000));
    }
}
