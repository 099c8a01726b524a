use axum::extract::{Query, State};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

use crate::{
    AppState,
    analytics::{self, MonthSelector},
    models::{
        account::Account,
        earning::Earning,
        expense::Expense,
        project::Project,
        record::FinancialRecord,
        summary::{
            AccountRollup, AccountRollupResponse, ProjectRollup, ProjectRollupResponse,
            RunwayRequest, RunwayResponse, SummaryRequest, SummaryResponse, SummaryResponseBody,
        },
    },
    service::{accounts, earnings, expenses, projects},
};

use super::common::AppError;

async fn fetch_records(state: &AppState) -> Result<(Vec<FinancialRecord>, Vec<FinancialRecord>), AppError> {
    let expense_docs = state
        .store
        .fetch_all::<Expense>(expenses::COLLECTION)
        .await
        .map_err(AppError::DatabaseError)?;
    let earning_docs = state
        .store
        .fetch_all::<Earning>(earnings::COLLECTION)
        .await
        .map_err(AppError::DatabaseError)?;

    let expense_records = expense_docs
        .iter()
        .map(|doc| FinancialRecord::from(&doc.body))
        .collect();
    let earning_records = earning_docs
        .iter()
        .map(|doc| FinancialRecord::from(&doc.body))
        .collect();
    Ok((expense_records, earning_records))
}

/// Category breakdowns and profit/loss over an optional date range, at
/// organization level or narrowed to one account.
pub(crate) async fn overview(
    Query(request): Query<SummaryRequest>,
    State(state): State<Arc<AppState>>,
) -> Result<SummaryResponse, AppError> {
    let (expense_records, earning_records) = fetch_records(&state).await?;

    let mut expense_view = analytics::filter_by_account(
        analytics::filter_by_date_range(&expense_records, request.from, request.to),
        request.account_id.as_deref(),
    );
    let mut earning_view = analytics::filter_by_account(
        analytics::filter_by_date_range(&earning_records, request.from, request.to),
        request.account_id.as_deref(),
    );
    if let Some(term) = &request.category {
        expense_view = analytics::filter_by_category_term(expense_view, term);
        earning_view = analytics::filter_by_category_term(earning_view, term);
    }

    let body = SummaryResponseBody {
        from: request.from,
        to: request.to,
        account_id: request.account_id,
        expenses_by_category: analytics::aggregate_by_category(expense_view.iter().copied()),
        earnings_by_category: analytics::aggregate_by_category(earning_view.iter().copied()),
        total_expenses: analytics::total_amount(expense_view.iter().copied()),
        total_earnings: analytics::total_amount(earning_view.iter().copied()),
        profit_loss: analytics::compute_profit_loss(
            expense_view.iter().copied(),
            earning_view.iter().copied(),
        ),
    };

    Ok(SummaryResponse(body))
}

/// Months of runway over the selected calendar months; every month when
/// none are selected.
pub(crate) async fn runway(
    Query(request): Query<RunwayRequest>,
    State(state): State<Arc<AppState>>,
) -> Result<RunwayResponse, AppError> {
    let selector = match &request.months {
        Some(raw) => MonthSelector::parse(raw).map_err(AppError::InvalidRequest)?,
        None => MonthSelector::default(),
    };

    let (expense_records, earning_records) = fetch_records(&state).await?;

    let expense_view = analytics::filter_by_account(
        analytics::filter_by_months(&expense_records, &selector),
        request.account_id.as_deref(),
    );
    let earning_view = analytics::filter_by_account(
        analytics::filter_by_months(&earning_records, &selector),
        request.account_id.as_deref(),
    );

    let breakdown = analytics::compute_runway(
        expense_view.iter().copied(),
        earning_view.iter().copied(),
        &selector,
    );
    info!(
        "Runway over {} month(s): {:?}",
        breakdown.month_count, breakdown.months_of_runway
    );

    Ok(RunwayResponse(breakdown))
}

/// Per-account budget/expense rollups: revenue is the linked project
/// budgets less the account's recorded expenses.
pub(crate) async fn account_rollups(
    State(state): State<Arc<AppState>>,
) -> Result<AccountRollupResponse, AppError> {
    let account_docs = state
        .store
        .fetch_all::<Account>(accounts::COLLECTION)
        .await
        .map_err(AppError::DatabaseError)?;
    let project_docs = state
        .store
        .fetch_all::<Project>(projects::COLLECTION)
        .await
        .map_err(AppError::DatabaseError)?;
    let expense_docs = state
        .store
        .fetch_all::<Expense>(expenses::COLLECTION)
        .await
        .map_err(AppError::DatabaseError)?;

    let expense_records: Vec<FinancialRecord> = expense_docs
        .iter()
        .map(|doc| FinancialRecord::from(&doc.body))
        .collect();
    let by_account = analytics::totals_by_account(&expense_records);

    let response = account_docs
        .iter()
        .map(|doc| {
            let account = &doc.body;
            let total_budget: Decimal = project_docs
                .iter()
                .filter(|p| account.projects.contains(&p.body.project_id))
                .map(|p| p.body.financial_metrics.budget)
                .sum();
            let total_expenses = by_account
                .get(&account.account_id)
                .copied()
                .unwrap_or(Decimal::ZERO);
            let revenue = total_budget - total_expenses;

            AccountRollup {
                account_id: account.account_id.clone(),
                name: account.name.clone(),
                total_budget,
                total_expenses,
                revenue,
                profit_margin: analytics::account_margin(total_budget, revenue),
            }
        })
        .collect();

    Ok(AccountRollupResponse { response })
}

/// Per-project expense totals and attributed revenue.
pub(crate) async fn project_rollups(
    State(state): State<Arc<AppState>>,
) -> Result<ProjectRollupResponse, AppError> {
    let project_docs = state
        .store
        .fetch_all::<Project>(projects::COLLECTION)
        .await
        .map_err(AppError::DatabaseError)?;

    let (expense_records, earning_records) = fetch_records(&state).await?;
    let by_project = analytics::totals_by_project(&expense_records);

    let response = project_docs
        .iter()
        .map(|doc| {
            let project = &doc.body;
            ProjectRollup {
                project_id: project.project_id.clone(),
                name: project.name.clone(),
                budget: project.financial_metrics.budget,
                total_expenses: by_project
                    .get(&project.project_id)
                    .copied()
                    .unwrap_or(Decimal::ZERO),
                revenue: analytics::project_revenue(&earning_records, &project.project_id),
            }
        })
        .collect();

    Ok(ProjectRollupResponse { response })
}
