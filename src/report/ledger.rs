//! Database queries for retrieving the transaction data that reports need.
//!
//! Reports only need the amount, date, category and type of a transaction, so
//! this module reads a narrower view than the transaction store.

use rusqlite::{Connection, params_from_iter};
use time::OffsetDateTime;

use crate::{
    CategoryId, Error,
    report::TimeWindow,
    transaction::{TransactionType, map_date_column, to_unix_millis},
};

/// The part of a transaction that reports aggregate over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerEntry {
    /// The amount of money in whole currency units.
    pub amount: i64,
    /// When the transaction happened.
    pub date: OffsetDateTime,
    /// The category the transaction refers to, which may no longer exist.
    pub category_id: CategoryId,
    /// Whether the transaction is an income or an expense.
    pub transaction_type: TransactionType,
}

/// Get the ledger entries inside `window`, or all entries if there is no window.
///
/// If `transaction_type` is given, only entries of that type are returned.
///
/// # Errors
/// Returns [Error::SqlError] if the SQL query fails.
pub fn get_ledger_entries(
    window: Option<TimeWindow>,
    transaction_type: Option<TransactionType>,
    connection: &Connection,
) -> Result<Vec<LedgerEntry>, Error> {
    let mut conditions = Vec::new();
    let mut params = Vec::new();

    if let Some(window) = window {
        conditions.push("date >= ? AND date < ?".to_owned());
        params.push(to_unix_millis(window.start));
        params.push(to_unix_millis(window.end));
    }

    if let Some(transaction_type) = transaction_type {
        conditions.push(format!("type = '{}'", transaction_type.as_str()));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let query = format!(
        "SELECT amount, date, category_id, type FROM \"transaction\" {where_clause} ORDER BY date"
    );

    let mut stmt = connection.prepare(&query)?;
    stmt.query_map(params_from_iter(params), |row| {
        Ok(LedgerEntry {
            amount: row.get(0)?,
            date: map_date_column(row, 1)?,
            category_id: row.get(2)?,
            transaction_type: row.get(3)?,
        })
    })?
    .collect::<Result<Vec<LedgerEntry>, rusqlite::Error>>()
    .map_err(|error| error.into())
}
