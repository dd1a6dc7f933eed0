//! JSON endpoints for the reports.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppQuery, AppState, Error, LocalTimezone,
    app_state::lock_connection,
    report::{
        CategoryTotals, CategoryTypeTotal, DailyTotals, MonthlyTotals, Totals, get_daily_totals,
        get_expenses_by_category, get_incomes_by_category, get_monthly_totals,
        get_monthly_transactions, get_totals, get_totals_by_category,
    },
    transaction::TransactionView,
};

/// The state needed for the report endpoints.
#[derive(Debug, Clone)]
pub struct ReportState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The time zone that months and days are taken from.
    pub local_timezone: LocalTimezone,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The optional `year` and `month` query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    /// The calendar year, e.g. 2024.
    pub year: Option<i32>,
    /// The month number, 1 = January.
    pub month: Option<u8>,
}

/// Get the income and expense totals.
pub async fn get_totals_endpoint(
    State(state): State<ReportState>,
    AppQuery(query): AppQuery<PeriodQuery>,
) -> Result<Json<Totals>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_totals(query.year, query.month, &state.local_timezone, &connection).map(Json)
}

/// Get the totals of every category.
pub async fn get_totals_by_category_endpoint(
    State(state): State<ReportState>,
    AppQuery(query): AppQuery<PeriodQuery>,
) -> Result<Json<Vec<CategoryTotals>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_totals_by_category(query.year, query.month, &state.local_timezone, &connection).map(Json)
}

/// Get the expense total of each category.
pub async fn get_expenses_by_category_endpoint(
    State(state): State<ReportState>,
) -> Result<Json<Vec<CategoryTypeTotal>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_expenses_by_category(&connection).map(Json)
}

/// Get the income total of each category.
pub async fn get_incomes_by_category_endpoint(
    State(state): State<ReportState>,
) -> Result<Json<Vec<CategoryTypeTotal>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_incomes_by_category(&connection).map(Json)
}

/// Get the transactions in a month.
pub async fn get_monthly_transactions_endpoint(
    State(state): State<ReportState>,
    AppQuery(query): AppQuery<PeriodQuery>,
) -> Result<Json<Vec<TransactionView>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_monthly_transactions(query.year, query.month, &state.local_timezone, &connection)
        .map(Json)
}

/// Get the totals of each month in a year.
pub async fn get_monthly_totals_endpoint(
    State(state): State<ReportState>,
    AppQuery(query): AppQuery<PeriodQuery>,
) -> Result<Json<Vec<MonthlyTotals>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_monthly_totals(query.year, &state.local_timezone, &connection).map(Json)
}

/// Get the totals of each day in a month.
pub async fn get_daily_totals_endpoint(
    State(state): State<ReportState>,
    AppQuery(query): AppQuery<PeriodQuery>,
) -> Result<Json<Vec<DailyTotals>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_daily_totals(query.year, query.month, &state.local_timezone, &connection).map(Json)
}
