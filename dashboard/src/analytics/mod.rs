use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::models::UNCATEGORIZED;
use crate::models::record::FinancialRecord;

/// Month window used for the runway average when no explicit month
/// selection is active.
pub(crate) const DEFAULT_RUNWAY_MONTHS: u32 = 12;

/// Earnings in this category count as revenue of the project named by
/// their reference id.
pub(crate) const PROJECT_REVENUE_CATEGORY: &str = "Project Revenue";

pub(crate) type CategoryTotals = BTreeMap<String, Decimal>;

/// Selected `(year, zero-based month)` pairs. An empty selector means
/// every month is in scope.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct MonthSelector {
    months: BTreeSet<(i32, u32)>,
}

impl MonthSelector {
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn insert(&mut self, year: i32, month0: u32) {
        self.months.insert((year, month0));
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.months.contains(&(date.year(), date.month0()))
    }

    /// Parse the wire format: comma-separated `YYYY-M` tokens with a
    /// zero-based month, e.g. `2024-0,2024-11`.
    pub fn parse(input: &str) -> Result<Self, String> {
        let mut selector = MonthSelector::default();
        for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let (year, month) = token
                .split_once('-')
                .ok_or_else(|| format!("invalid month token {token:?}"))?;
            let year: i32 = year
                .parse()
                .map_err(|_| format!("invalid year in {token:?}"))?;
            let month0: u32 = month
                .parse()
                .map_err(|_| format!("invalid month in {token:?}"))?;
            if month0 > 11 {
                return Err(format!("month out of range in {token:?}"));
            }
            selector.insert(year, month0);
        }
        Ok(selector)
    }
}

/// Relative date windows offered by the expense screens. Resolved
/// against a caller-supplied reference day so the pipeline never reads
/// the clock itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum DateWindow {
    #[default]
    All,
    Today,
    ThisWeek,
    ThisMonth,
    LastThreeMonths,
    ThisYear,
    // Bounds come from explicit from/to parameters instead.
    Custom,
}

impl DateWindow {
    pub fn bounds(self, today: NaiveDate) -> (Option<NaiveDate>, Option<NaiveDate>) {
        match self {
            DateWindow::All | DateWindow::Custom => (None, None),
            DateWindow::Today => (Some(today), Some(today)),
            DateWindow::ThisWeek => {
                // Weeks start on Sunday.
                let back = u64::from(today.weekday().num_days_from_sunday());
                (Some(today - Days::new(back)), Some(today))
            }
            DateWindow::ThisMonth => {
                let start = NaiveDate::from_ymd_opt(today.year(), today.month(), 1);
                (start, Some(today))
            }
            DateWindow::LastThreeMonths => {
                (Some(today - chrono::Months::new(3)), Some(today))
            }
            DateWindow::ThisYear => {
                let start = NaiveDate::from_ymd_opt(today.year(), 1, 1);
                (start, Some(today))
            }
        }
    }
}

/// One set of filter dimensions, applied record by record. The
/// standalone filter functions below are thin wrappers over this so a
/// caller holding documents can run the same predicates without losing
/// track of which document a record came from.
#[derive(Debug, Default, Clone)]
pub(crate) struct RecordFilter<'a> {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub account_id: Option<&'a str>,
    pub category_term: Option<&'a str>,
    pub months: Option<&'a MonthSelector>,
}

impl RecordFilter<'_> {
    pub fn matches(&self, record: &FinancialRecord) -> bool {
        self.matches_dates(record)
            && self.matches_account(record)
            && self.matches_category(record)
            && self.matches_months(record)
    }

    fn matches_dates(&self, record: &FinancialRecord) -> bool {
        // Both bounds are required for the range to apply at all.
        match (self.start, self.end) {
            (Some(start), Some(end)) => record.date >= start && record.date <= end,
            _ => true,
        }
    }

    fn matches_account(&self, record: &FinancialRecord) -> bool {
        match self.account_id {
            Some(id) => record.account_id.as_deref() == Some(id),
            None => true,
        }
    }

    fn matches_category(&self, record: &FinancialRecord) -> bool {
        match self.category_term {
            Some(term) if !term.is_empty() => record
                .category
                .to_lowercase()
                .contains(&term.to_lowercase()),
            _ => true,
        }
    }

    fn matches_months(&self, record: &FinancialRecord) -> bool {
        match self.months {
            Some(selector) if !selector.is_empty() => selector.contains(record.date),
            _ => true,
        }
    }
}

/// Keep records with `start <= date <= end`. Pass-through when either
/// bound is absent.
pub(crate) fn filter_by_date_range<'a, I>(
    records: I,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<&'a FinancialRecord>
where
    I: IntoIterator<Item = &'a FinancialRecord>,
{
    let filter = RecordFilter {
        start,
        end,
        ..RecordFilter::default()
    };
    records.into_iter().filter(|r| filter.matches(r)).collect()
}

/// Keep records of one account; `None` keeps everything (organization
/// level).
pub(crate) fn filter_by_account<'a, I>(
    records: I,
    account_id: Option<&str>,
) -> Vec<&'a FinancialRecord>
where
    I: IntoIterator<Item = &'a FinancialRecord>,
{
    let filter = RecordFilter {
        account_id,
        ..RecordFilter::default()
    };
    records.into_iter().filter(|r| filter.matches(r)).collect()
}

/// Keep records falling in the selected months; an empty selector keeps
/// everything.
pub(crate) fn filter_by_months<'a, I>(
    records: I,
    selector: &MonthSelector,
) -> Vec<&'a FinancialRecord>
where
    I: IntoIterator<Item = &'a FinancialRecord>,
{
    let filter = RecordFilter {
        months: Some(selector),
        ..RecordFilter::default()
    };
    records.into_iter().filter(|r| filter.matches(r)).collect()
}

/// Case-insensitive substring match on the category label.
pub(crate) fn filter_by_category_term<'a, I>(records: I, term: &str) -> Vec<&'a FinancialRecord>
where
    I: IntoIterator<Item = &'a FinancialRecord>,
{
    let filter = RecordFilter {
        category_term: Some(term),
        ..RecordFilter::default()
    };
    records.into_iter().filter(|r| filter.matches(r)).collect()
}

/// Sum amounts per category. Categories merge on exact, case-sensitive
/// equality; records with an empty label land in the uncategorized
/// bucket rather than being dropped.
pub(crate) fn aggregate_by_category<'a, I>(records: I) -> CategoryTotals
where
    I: IntoIterator<Item = &'a FinancialRecord>,
{
    let mut totals = CategoryTotals::new();
    for record in records {
        let category = if record.category.is_empty() {
            UNCATEGORIZED
        } else {
            record.category.as_str()
        };
        *totals.entry(category.to_string()).or_insert(Decimal::ZERO) += record.amount;
    }
    totals
}

pub(crate) fn total_amount<'a, I>(records: I) -> Decimal
where
    I: IntoIterator<Item = &'a FinancialRecord>,
{
    records.into_iter().map(|r| r.amount).sum()
}

pub(crate) fn compute_profit_loss<'a, 'b>(
    expenses: impl IntoIterator<Item = &'a FinancialRecord>,
    earnings: impl IntoIterator<Item = &'b FinancialRecord>,
) -> Decimal {
    total_amount(earnings) - total_amount(expenses)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RunwayBreakdown {
    pub month_count: u32,
    pub total_expenses: Decimal,
    pub total_earnings: Decimal,
    pub profit_loss: Decimal,
    pub avg_monthly_expense: Decimal,
    /// Absent when the selected months carry no expense; the ratio is
    /// undefined there, not infinite.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub months_of_runway: Option<f64>,
}

/// Months of sustainable operation at current spend. The records are
/// expected to be pre-filtered (months, account); the selector only
/// sizes the averaging window here.
pub(crate) fn compute_runway<'a, 'b>(
    expenses: impl IntoIterator<Item = &'a FinancialRecord>,
    earnings: impl IntoIterator<Item = &'b FinancialRecord>,
    selector: &MonthSelector,
) -> RunwayBreakdown {
    let month_count = if selector.is_empty() {
        DEFAULT_RUNWAY_MONTHS
    } else {
        selector.len() as u32
    };

    let total_expenses = total_amount(expenses);
    let total_earnings = total_amount(earnings);
    let profit_loss = total_earnings - total_expenses;
    let avg_monthly_expense = total_expenses / Decimal::from(month_count);

    let months_of_runway = if avg_monthly_expense > Decimal::ZERO {
        Some(
            profit_loss.to_f64().unwrap_or(0.0) / avg_monthly_expense.to_f64().unwrap_or(1.0),
        )
    } else {
        None
    };

    RunwayBreakdown {
        month_count,
        total_expenses,
        total_earnings,
        profit_loss,
        avg_monthly_expense,
        months_of_runway,
    }
}

/// Expense totals keyed by account id; records without an account are
/// skipped (they belong to no account-level view).
pub(crate) fn totals_by_account<'a, I>(records: I) -> BTreeMap<String, Decimal>
where
    I: IntoIterator<Item = &'a FinancialRecord>,
{
    let mut totals = BTreeMap::new();
    for record in records {
        if let Some(account_id) = &record.account_id {
            *totals.entry(account_id.clone()).or_insert(Decimal::ZERO) += record.amount;
        }
    }
    totals
}

/// Expense totals keyed by project id.
pub(crate) fn totals_by_project<'a, I>(records: I) -> BTreeMap<String, Decimal>
where
    I: IntoIterator<Item = &'a FinancialRecord>,
{
    let mut totals = BTreeMap::new();
    for record in records {
        if let Some(project_id) = &record.project_id {
            *totals.entry(project_id.clone()).or_insert(Decimal::ZERO) += record.amount;
        }
    }
    totals
}

/// Revenue attributed to a project: earnings in the project-revenue
/// category referencing its id.
pub(crate) fn project_revenue<'a, I>(earnings: I, project_id: &str) -> Decimal
where
    I: IntoIterator<Item = &'a FinancialRecord>,
{
    earnings
        .into_iter()
        .filter(|r| {
            r.category == PROJECT_REVENUE_CATEGORY && r.project_id.as_deref() == Some(project_id)
        })
        .map(|r| r.amount)
        .sum()
}

/// Margin on budgeted work: revenue over budget, as a percentage. A
/// zero budget yields zero, matching the screens this replaces.
pub(crate) fn account_margin(total_budget: Decimal, revenue: Decimal) -> Decimal {
    if total_budget > Decimal::ZERO {
        revenue / total_budget * Decimal::from(100)
    } else {
        Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(category: &str, amount: i64, date: &str) -> FinancialRecord {
        FinancialRecord {
            category: category.to_string(),
            amount: Decimal::from(amount),
            date: date.parse().unwrap(),
            account_id: None,
            project_id: None,
            description: None,
        }
    }

    fn account_record(category: &str, amount: i64, date: &str, account_id: &str) -> FinancialRecord {
        FinancialRecord {
            account_id: Some(account_id.to_string()),
            ..record(category, amount, date)
        }
    }

    fn sample_expenses() -> Vec<FinancialRecord> {
        vec![
            record("Rent", 1000, "2024-01-15"),
            record("Rent", 500, "2024-02-10"),
        ]
    }

    fn sample_earnings() -> Vec<FinancialRecord> {
        vec![record("Sales", 3000, "2024-01-20")]
    }

    #[test]
    fn categories_merge_and_totals_are_conserved() {
        let expenses = sample_expenses();
        let totals = aggregate_by_category(&expenses);

        assert_eq!(totals.len(), 1);
        assert_eq!(totals["Rent"], Decimal::from(1500));

        let bucket_sum: Decimal = totals.values().copied().sum();
        assert_eq!(bucket_sum, total_amount(&expenses));
    }

    #[test]
    fn empty_input_aggregates_to_nothing() {
        let totals = aggregate_by_category(&[]);
        assert!(totals.is_empty());
        assert_eq!(total_amount(&[]), Decimal::ZERO);
    }

    #[test]
    fn category_matching_is_case_sensitive() {
        let records = vec![
            record("Rent", 100, "2024-01-01"),
            record("rent", 50, "2024-01-02"),
        ];
        let totals = aggregate_by_category(&records);
        assert_eq!(totals.len(), 2);
    }

    #[test]
    fn empty_category_lands_in_uncategorized() {
        let records = vec![record("", 75, "2024-01-01")];
        let totals = aggregate_by_category(&records);
        assert_eq!(totals[UNCATEGORIZED], Decimal::from(75));
    }

    #[test]
    fn unbounded_date_range_is_identity() {
        let expenses = sample_expenses();
        assert_eq!(filter_by_date_range(&expenses, None, None).len(), 2);
        // One missing bound disables the range entirely.
        assert_eq!(
            filter_by_date_range(&expenses, Some("2024-02-01".parse().unwrap()), None).len(),
            2
        );
    }

    #[test]
    fn date_range_bounds_are_inclusive() {
        let expenses = sample_expenses();
        let filtered = filter_by_date_range(
            &expenses,
            Some("2024-01-15".parse().unwrap()),
            Some("2024-02-10".parse().unwrap()),
        );
        assert_eq!(filtered.len(), 2);

        let filtered = filter_by_date_range(
            &expenses,
            Some("2024-01-16".parse().unwrap()),
            Some("2024-02-09".parse().unwrap()),
        );
        assert!(filtered.is_empty());
    }

    #[test]
    fn account_filter_passes_through_on_none() {
        let records = vec![
            account_record("Rent", 100, "2024-01-01", "ACC-1"),
            account_record("Rent", 200, "2024-01-02", "ACC-2"),
            record("Rent", 300, "2024-01-03"),
        ];
        assert_eq!(filter_by_account(&records, None).len(), 3);

        let filtered = filter_by_account(&records, Some("ACC-2"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].amount, Decimal::from(200));
    }

    #[test]
    fn empty_month_selector_is_identity() {
        let expenses = sample_expenses();
        let selector = MonthSelector::default();
        assert_eq!(filter_by_months(&expenses, &selector).len(), 2);
    }

    #[test]
    fn month_selector_restricts_to_members() {
        let expenses = sample_expenses();
        let mut selector = MonthSelector::default();
        selector.insert(2024, 0); // January

        let filtered = filter_by_months(&expenses, &selector);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].amount, Decimal::from(1000));
    }

    #[test]
    fn category_term_matches_case_insensitively() {
        let expenses = sample_expenses();
        assert_eq!(filter_by_category_term(&expenses, "ren").len(), 2);
        assert_eq!(filter_by_category_term(&expenses, "RENT").len(), 2);
        assert!(filter_by_category_term(&expenses, "salar").is_empty());
        // Empty term disables the filter.
        assert_eq!(filter_by_category_term(&expenses, "").len(), 2);
    }

    #[test]
    fn profit_loss_of_nothing_is_zero() {
        assert_eq!(compute_profit_loss(&[], &[]), Decimal::ZERO);
    }

    #[test]
    fn profit_loss_is_earnings_minus_expenses() {
        let pl = compute_profit_loss(&sample_expenses(), &sample_earnings());
        assert_eq!(pl, Decimal::from(1500));
    }

    #[test]
    fn runway_defaults_to_twelve_months() {
        let breakdown =
            compute_runway(&sample_expenses(), &sample_earnings(), &MonthSelector::default());
        assert_eq!(breakdown.month_count, 12);
        assert_eq!(breakdown.avg_monthly_expense, Decimal::from(125));
        assert_eq!(breakdown.months_of_runway, Some(12.0));
    }

    #[test]
    fn runway_uses_selected_month_count() {
        let expenses = sample_expenses();
        let earnings = sample_earnings();
        let mut selector = MonthSelector::default();
        selector.insert(2024, 0);

        let expense_view = filter_by_months(&expenses, &selector);
        let earning_view = filter_by_months(&earnings, &selector);
        let breakdown = compute_runway(
            expense_view.iter().copied(),
            earning_view.iter().copied(),
            &selector,
        );

        assert_eq!(breakdown.month_count, 1);
        assert_eq!(breakdown.total_expenses, Decimal::from(1000));
        assert_eq!(breakdown.profit_loss, Decimal::from(2000));
        assert_eq!(breakdown.months_of_runway, Some(2.0));
    }

    #[test]
    fn runway_without_expenses_is_undefined() {
        let breakdown = compute_runway(&[], &sample_earnings(), &MonthSelector::default());
        assert_eq!(breakdown.avg_monthly_expense, Decimal::ZERO);
        assert_eq!(breakdown.months_of_runway, None);
    }

    #[test]
    fn month_selector_parses_wire_format() {
        let selector = MonthSelector::parse("2024-0,2024-11").unwrap();
        assert_eq!(selector.len(), 2);
        assert!(selector.contains("2024-01-15".parse().unwrap()));
        assert!(selector.contains("2024-12-25".parse().unwrap()));
        assert!(!selector.contains("2024-06-01".parse().unwrap()));
    }

    #[test]
    fn month_selector_rejects_bad_tokens() {
        assert!(MonthSelector::parse("2024-12").is_err());
        assert!(MonthSelector::parse("banana").is_err());
        assert!(MonthSelector::parse("2024-x").is_err());
        assert!(MonthSelector::parse("").unwrap().is_empty());
    }

    #[test]
    fn date_window_bounds() {
        let today: NaiveDate = "2024-03-14".parse().unwrap(); // a Thursday

        assert_eq!(DateWindow::All.bounds(today), (None, None));
        assert_eq!(
            DateWindow::Today.bounds(today),
            (Some(today), Some(today))
        );
        assert_eq!(
            DateWindow::ThisWeek.bounds(today),
            (Some("2024-03-10".parse().unwrap()), Some(today))
        );
        assert_eq!(
            DateWindow::ThisMonth.bounds(today),
            (Some("2024-03-01".parse().unwrap()), Some(today))
        );
        assert_eq!(
            DateWindow::LastThreeMonths.bounds(today),
            (Some("2023-12-14".parse().unwrap()), Some(today))
        );
        assert_eq!(
            DateWindow::ThisYear.bounds(today),
            (Some("2024-01-01".parse().unwrap()), Some(today))
        );
    }

    #[test]
    fn account_and_project_totals() {
        let mut records = vec![
            account_record("Rent", 100, "2024-01-01", "ACC-1"),
            account_record("Rent", 200, "2024-01-02", "ACC-1"),
            account_record("Rent", 50, "2024-01-03", "ACC-2"),
        ];
        records[0].project_id = Some("PRJ-9".to_string());
        records[1].project_id = Some("PRJ-9".to_string());

        let by_account = totals_by_account(&records);
        assert_eq!(by_account["ACC-1"], Decimal::from(300));
        assert_eq!(by_account["ACC-2"], Decimal::from(50));

        let by_project = totals_by_project(&records);
        assert_eq!(by_project.len(), 1);
        assert_eq!(by_project["PRJ-9"], Decimal::from(300));
    }

    #[test]
    fn project_revenue_requires_category_and_reference() {
        let mut sale = record(PROJECT_REVENUE_CATEGORY, 4000, "2024-02-01");
        sale.project_id = Some("PRJ-9".to_string());
        let other = record("Sales", 999, "2024-02-02");

        let earnings = vec![sale, other];
        assert_eq!(project_revenue(&earnings, "PRJ-9"), Decimal::from(4000));
        assert_eq!(project_revenue(&earnings, "PRJ-1"), Decimal::ZERO);
    }

    #[test]
    fn margin_guards_zero_budget() {
        assert_eq!(
            account_margin(Decimal::from(200), Decimal::from(50)),
            Decimal::from(25)
        );
        assert_eq!(
            account_margin(Decimal::ZERO, Decimal::from(50)),
            Decimal::ZERO
        );
    }
}
