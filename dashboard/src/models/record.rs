use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::earning::Earning;
use super::expense::Expense;

/// Flattened view of an expense or earning fed to the analytics
/// pipeline. Built once per aggregation pass and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FinancialRecord {
    pub category: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub account_id: Option<String>,
    pub project_id: Option<String>,
    pub description: Option<String>,
}

impl From<&Expense> for FinancialRecord {
    fn from(expense: &Expense) -> Self {
        FinancialRecord {
            category: expense.category.clone(),
            amount: expense.amount,
            date: expense.date,
            account_id: expense.account_id.clone(),
            project_id: expense.project_id.clone(),
            description: expense.description.clone(),
        }
    }
}

impl From<&Earning> for FinancialRecord {
    fn from(earning: &Earning) -> Self {
        FinancialRecord {
            category: earning.category.clone(),
            amount: earning.amount,
            date: earning.date,
            account_id: earning.account_id.clone(),
            project_id: earning.reference_id.clone(),
            description: earning.description.clone(),
        }
    }
}
