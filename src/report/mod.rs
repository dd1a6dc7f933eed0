//! Reports that summarise transactions.
//!
//! This module contains:
//! - Calendar windows that select the transactions a report covers
//! - A narrow read of the transaction table for aggregation
//! - Pure aggregation into totals, per-category breakdowns and dense monthly
//!   and daily series
//! - The JSON endpoints for the reports

mod aggregation;
mod endpoints;
mod ledger;
mod summary;
mod window;

pub use aggregation::{
    CategoryTotals, CategoryTypeTotal, DailyTotals, MonthlyTotals, Totals, daily_totals,
    monthly_totals, sum_totals, totals_by_category, totals_for_type,
};
pub use endpoints::{
    PeriodQuery, ReportState, get_daily_totals_endpoint, get_expenses_by_category_endpoint,
    get_incomes_by_category_endpoint, get_monthly_totals_endpoint,
    get_monthly_transactions_endpoint, get_totals_by_category_endpoint, get_totals_endpoint,
};
pub use ledger::{LedgerEntry, get_ledger_entries};
pub use summary::{
    get_daily_totals, get_expenses_by_category, get_incomes_by_category, get_monthly_totals,
    get_monthly_transactions, get_totals, get_totals_by_category,
};
pub use window::{
    TimeWindow, days_in_month, month_window, optional_month_window, parse_month, year_window,
};
