//! Database queries for transactions.

use rusqlite::{Connection, OptionalExtension, Row, params_from_iter};
use time::OffsetDateTime;

use crate::{
    Error, TransactionId,
    transaction::{
        NewTransaction, Transaction, TransactionUpdate,
        date::{from_unix_millis, now, to_unix_millis},
    },
};

const TRANSACTION_COLUMNS: &str = "id, amount, description, date, category_id, type";

/// Narrows down which transactions [query_transactions] returns.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransactionFilter {
    /// Only include transactions on or after this instant.
    pub start: Option<OffsetDateTime>,
    /// Only include transactions on or before this instant.
    pub end: Option<OffsetDateTime>,
    /// Return at most this many transactions.
    pub limit: Option<u32>,
}

/// Create a new transaction in the database from a builder.
///
/// If the builder has no date, the transaction is dated now. The caller is
/// responsible for checking that the category exists.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    builder: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let date = builder.date.unwrap_or_else(now);

    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" (amount, description, date, category_id, type)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                builder.amount,
                builder.description,
                to_unix_millis(date),
                builder.category_id,
                builder.transaction_type,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::TransactionNotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id"
        ))?
        .query_row(&[(":id", &id)], map_transaction_row)
        .optional()?
        .ok_or(Error::TransactionNotFound(id))
}

/// Get transactions matching `filter`, newest first.
///
/// Transactions on the same instant are ordered by descending ID so the
/// order is stable.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn query_transactions(
    filter: TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut conditions = Vec::new();
    let mut params = Vec::new();

    if let Some(start) = filter.start {
        conditions.push("date >= ?");
        params.push(to_unix_millis(start));
    }

    if let Some(end) = filter.end {
        conditions.push("date <= ?");
        params.push(to_unix_millis(end));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let limit_clause = match filter.limit {
        Some(limit) if limit > 0 => {
            params.push(i64::from(limit));
            "LIMIT ?"
        }
        _ => "",
    };

    let query = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" {where_clause} \
        ORDER BY date DESC, id DESC {limit_clause}"
    );

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params), map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(|error| error.into()))
        .collect()
}

/// Get the transactions in the half-open interval `[start, end)`, newest first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_transactions_between(
    start: OffsetDateTime,
    end: OffsetDateTime,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" \
            WHERE date >= ?1 AND date < ?2 \
            ORDER BY date DESC, id DESC"
        ))?
        .query_map(
            (to_unix_millis(start), to_unix_millis(end)),
            map_transaction_row,
        )?
        .map(|transaction_result| transaction_result.map_err(|error| error.into()))
        .collect()
}

/// Apply a partial update to a transaction and return the updated transaction.
///
/// The caller is responsible for checking that a new category exists.
///
/// # Errors
/// This function will return a:
/// - [Error::TransactionNotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    update: TransactionUpdate,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(&format!(
            "UPDATE \"transaction\" SET
                amount = COALESCE(?1, amount),
                description = COALESCE(?2, description),
                date = COALESCE(?3, date),
                category_id = COALESCE(?4, category_id),
                type = COALESCE(?5, type)
             WHERE id = ?6
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                update.amount,
                update.description,
                update.date.map(to_unix_millis),
                update.category_id,
                update.transaction_type,
                id,
            ),
            map_transaction_row,
        )
        .optional()?
        .ok_or(Error::TransactionNotFound(id))
}

/// Delete a transaction by ID.
///
/// # Errors
/// This function will return a:
/// - [Error::TransactionNotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::TransactionNotFound(id));
    }

    Ok(())
}

/// Create the transaction table in the database.
///
/// There is deliberately no foreign key on `category_id`: deleting a category
/// leaves its transactions in place.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            amount INTEGER NOT NULL CHECK (amount >= 0),
            description TEXT,
            date INTEGER NOT NULL,
            category_id INTEGER NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('income', 'expense'))
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);
        CREATE INDEX IF NOT EXISTS idx_transaction_category ON \"transaction\"(category_id);",
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
///
/// Expects the columns in the order of `TRANSACTION_COLUMNS`.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let amount = row.get(1)?;
    let description = row.get(2)?;
    let date = map_date_column(row, 3)?;
    let category_id = row.get(4)?;
    let transaction_type = row.get(5)?;

    Ok(Transaction {
        id,
        amount,
        description,
        date,
        category_id,
        transaction_type,
    })
}

/// Read a column of Unix milliseconds as an instant.
pub(crate) fn map_date_column(row: &Row, index: usize) -> Result<OffsetDateTime, rusqlite::Error> {
    let millis: i64 = row.get(index)?;

    from_unix_millis(millis).ok_or_else(|| {
        rusqlite::Error::IntegralValueOutOfRange(index, millis)
    })
}

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        Error,
        db::initialize,
        transaction::{
            Transaction, TransactionFilter, TransactionType, TransactionUpdate,
            create_transaction, delete_transaction, get_transaction, get_transactions_between,
            query_transactions, update_transaction,
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();
        let date = datetime!(2024-03-15 00:00 UTC);

        let result = create_transaction(
            Transaction::build(100, 1, TransactionType::Expense)
                .date(Some(date))
                .description(Some("Groceries".to_owned())),
            &conn,
        );

        match result {
            Ok(transaction) => {
                assert_eq!(transaction.amount, 100);
                assert_eq!(transaction.date, date);
                assert_eq!(transaction.category_id, 1);
                assert_eq!(transaction.transaction_type, TransactionType::Expense);
                assert_eq!(transaction.description.as_deref(), Some("Groceries"));
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_without_date_uses_current_time() {
        let conn = get_test_connection();
        let before = time::OffsetDateTime::now_utc() - time::Duration::seconds(1);

        let transaction =
            create_transaction(Transaction::build(5, 1, TransactionType::Income), &conn)
                .expect("Could not create transaction");

        let after = time::OffsetDateTime::now_utc() + time::Duration::seconds(1);
        assert!(
            before <= transaction.date && transaction.date <= after,
            "{} is not close to now",
            transaction.date
        );
    }

    #[test]
    fn get_returns_created_transaction() {
        let conn = get_test_connection();
        let created = create_transaction(
            Transaction::build(42, 3, TransactionType::Income)
                .date(Some(datetime!(2024-01-10 08:15:30.250 UTC))),
            &conn,
        )
        .unwrap();

        let got = get_transaction(created.id, &conn);

        assert_eq!(got, Ok(created));
    }

    #[test]
    fn get_missing_transaction_returns_not_found() {
        let conn = get_test_connection();

        assert_eq!(get_transaction(404, &conn), Err(Error::TransactionNotFound(404)));
    }

    #[test]
    fn query_orders_newest_first() {
        let conn = get_test_connection();
        for (amount, date) in [
            (1, datetime!(2024-01-02 00:00 UTC)),
            (2, datetime!(2024-01-03 00:00 UTC)),
            (3, datetime!(2024-01-01 00:00 UTC)),
        ] {
            create_transaction(
                Transaction::build(amount, 1, TransactionType::Expense).date(Some(date)),
                &conn,
            )
            .unwrap();
        }

        let amounts: Vec<i64> = query_transactions(TransactionFilter::default(), &conn)
            .unwrap()
            .into_iter()
            .map(|transaction| transaction.amount)
            .collect();

        assert_eq!(amounts, vec![2, 1, 3]);
    }

    #[test]
    fn query_filters_inclusive_range_and_limit() {
        let conn = get_test_connection();
        for day in 1..=10 {
            let date = time::Date::from_calendar_date(2024, time::Month::May, day)
                .unwrap()
                .midnight()
                .assume_utc();
            create_transaction(
                Transaction::build(i64::from(day), 1, TransactionType::Expense).date(Some(date)),
                &conn,
            )
            .unwrap();
        }

        let filter = TransactionFilter {
            start: Some(datetime!(2024-05-03 00:00 UTC)),
            end: Some(datetime!(2024-05-07 00:00 UTC)),
            limit: None,
        };
        let amounts: Vec<i64> = query_transactions(filter, &conn)
            .unwrap()
            .into_iter()
            .map(|transaction| transaction.amount)
            .collect();
        assert_eq!(amounts, vec![7, 6, 5, 4, 3]);

        let limited = query_transactions(
            TransactionFilter {
                limit: Some(2),
                ..filter
            },
            &conn,
        )
        .unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].amount, 7);
    }

    #[test]
    fn zero_limit_returns_everything() {
        let conn = get_test_connection();
        for _ in 0..3 {
            create_transaction(Transaction::build(1, 1, TransactionType::Expense), &conn)
                .unwrap();
        }

        let got = query_transactions(
            TransactionFilter {
                limit: Some(0),
                ..Default::default()
            },
            &conn,
        )
        .unwrap();

        assert_eq!(got.len(), 3);
    }

    #[test]
    fn between_excludes_end_instant() {
        let conn = get_test_connection();
        let start = datetime!(2024-03-01 00:00 UTC);
        let end = datetime!(2024-04-01 00:00 UTC);
        create_transaction(
            Transaction::build(1, 1, TransactionType::Expense).date(Some(start)),
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(2, 1, TransactionType::Expense).date(Some(end)),
            &conn,
        )
        .unwrap();

        let got = get_transactions_between(start, end, &conn).unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].amount, 1);
    }

    #[test]
    fn update_changes_only_given_fields() {
        let conn = get_test_connection();
        let created = create_transaction(
            Transaction::build(100, 1, TransactionType::Expense)
                .date(Some(datetime!(2024-03-15 00:00 UTC)))
                .description(Some("Lunch".to_owned())),
            &conn,
        )
        .unwrap();

        let updated = update_transaction(
            created.id,
            TransactionUpdate {
                amount: Some(250),
                transaction_type: Some(TransactionType::Income),
                ..Default::default()
            },
            &conn,
        )
        .expect("Could not update transaction");

        assert_eq!(updated.amount, 250);
        assert_eq!(updated.transaction_type, TransactionType::Income);
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.date, created.date);
        assert_eq!(updated.category_id, created.category_id);
        assert_eq!(get_transaction(created.id, &conn), Ok(updated));
    }

    #[test]
    fn update_missing_transaction_returns_not_found() {
        let conn = get_test_connection();

        let result = update_transaction(7, TransactionUpdate::default(), &conn);

        assert_eq!(result, Err(Error::TransactionNotFound(7)));
    }

    #[test]
    fn delete_removes_transaction() {
        let conn = get_test_connection();
        let created =
            create_transaction(Transaction::build(1, 1, TransactionType::Expense), &conn).unwrap();

        assert_eq!(delete_transaction(created.id, &conn), Ok(()));
        assert_eq!(
            get_transaction(created.id, &conn),
            Err(Error::TransactionNotFound(created.id))
        );
    }

    #[test]
    fn delete_missing_transaction_returns_not_found() {
        let conn = get_test_connection();

        assert_eq!(delete_transaction(9, &conn), Err(Error::TransactionNotFound(9)));
    }
}
