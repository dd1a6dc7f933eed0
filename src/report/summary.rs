//! The reports offered to callers.
//!
//! Each report reads the ledger entries for its window, then hands them to
//! the pure functions in the aggregation module.

use rusqlite::Connection;

use crate::{
    Error, LocalTimezone,
    category::{get_all_categories, get_categories_by_id},
    report::{
        CategoryTotals, CategoryTypeTotal, DailyTotals, MonthlyTotals, Totals, daily_totals,
        get_ledger_entries, month_window, monthly_totals, optional_month_window, parse_month,
        sum_totals, totals_by_category, totals_for_type, year_window,
    },
    transaction::{TransactionType, TransactionView, attach_categories, get_transactions_between},
};

/// Sum the incomes and expenses in a month, or over all time if the year
/// and month are not both given.
///
/// # Errors
/// Returns a validation error for an out of range year or month, or
/// [Error::SqlError] if the SQL query fails.
pub fn get_totals(
    year: Option<i32>,
    month: Option<u8>,
    timezone: &LocalTimezone,
    connection: &Connection,
) -> Result<Totals, Error> {
    let window = optional_month_window(year, month, timezone)?;
    let entries = get_ledger_entries(window, None, connection)?;

    Ok(sum_totals(&entries))
}

/// Compute the totals of every category in a month, or over all time if the
/// year and month are not both given.
///
/// # Errors
/// Returns a validation error for an out of range year or month, or
/// [Error::SqlError] if the SQL query fails.
pub fn get_totals_by_category(
    year: Option<i32>,
    month: Option<u8>,
    timezone: &LocalTimezone,
    connection: &Connection,
) -> Result<Vec<CategoryTotals>, Error> {
    let window = optional_month_window(year, month, timezone)?;
    let categories = get_all_categories(connection)?;
    let entries = get_ledger_entries(window, None, connection)?;

    Ok(totals_by_category(&categories, &entries))
}

/// The expense total of each category with expenses, largest first.
///
/// # Errors
/// Returns [Error::SqlError] if the SQL query fails.
pub fn get_expenses_by_category(connection: &Connection) -> Result<Vec<CategoryTypeTotal>, Error> {
    get_type_totals_by_category(TransactionType::Expense, connection)
}

/// The income total of each category with incomes, largest first.
///
/// # Errors
/// Returns [Error::SqlError] if the SQL query fails.
pub fn get_incomes_by_category(connection: &Connection) -> Result<Vec<CategoryTypeTotal>, Error> {
    get_type_totals_by_category(TransactionType::Income, connection)
}

fn get_type_totals_by_category(
    transaction_type: TransactionType,
    connection: &Connection,
) -> Result<Vec<CategoryTypeTotal>, Error> {
    let entries = get_ledger_entries(None, Some(transaction_type), connection)?;

    let mut category_ids: Vec<_> = entries.iter().map(|entry| entry.category_id).collect();
    category_ids.sort_unstable();
    category_ids.dedup();
    let categories = get_categories_by_id(&category_ids, connection)?;

    Ok(totals_for_type(&categories, &entries, transaction_type))
}

/// The transactions in a month with their categories, newest first.
///
/// # Errors
/// Returns [Error::MissingYearOrMonth] if either the year or month is
/// missing, a validation error for an out of range year or month, or
/// [Error::SqlError] if the SQL query fails.
pub fn get_monthly_transactions(
    year: Option<i32>,
    month: Option<u8>,
    timezone: &LocalTimezone,
    connection: &Connection,
) -> Result<Vec<TransactionView>, Error> {
    let (Some(year), Some(month)) = (year, month) else {
        return Err(Error::MissingYearOrMonth("monthly transactions"));
    };

    let window = month_window(year, month, timezone)?;
    let transactions = get_transactions_between(window.start, window.end, connection)?;

    attach_categories(transactions, connection)
}

/// The totals of each month in `year`, which defaults to the current year.
///
/// # Errors
/// Returns [Error::InvalidYear] for an unsupported year, or
/// [Error::SqlError] if the SQL query fails.
pub fn get_monthly_totals(
    year: Option<i32>,
    timezone: &LocalTimezone,
    connection: &Connection,
) -> Result<Vec<MonthlyTotals>, Error> {
    let year = year.unwrap_or_else(|| timezone.today().year());
    let window = year_window(year, timezone)?;
    let entries = get_ledger_entries(Some(window), None, connection)?;

    Ok(monthly_totals(&entries, year, timezone))
}

/// The totals of each day in a month.
///
/// # Errors
/// Returns [Error::MissingYearOrMonth] if either the year or month is
/// missing, a validation error for an out of range year or month, or
/// [Error::SqlError] if the SQL query fails.
pub fn get_daily_totals(
    year: Option<i32>,
    month: Option<u8>,
    timezone: &LocalTimezone,
    connection: &Connection,
) -> Result<Vec<DailyTotals>, Error> {
    let (Some(year), Some(month)) = (year, month) else {
        return Err(Error::MissingYearOrMonth("daily totals"));
    };

    let window = month_window(year, month, timezone)?;
    let entries = get_ledger_entries(Some(window), None, connection)?;

    Ok(daily_totals(&entries, year, parse_month(month)?, timezone))
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::{OffsetDateTime, macros::datetime};

    use crate::{
        CategoryId, Error, LocalTimezone,
        category::{CategoryName, create_category, delete_category},
        db::initialize,
        report::Totals,
        transaction::{Transaction, TransactionType, create_transaction},
    };

    use super::{
        get_daily_totals, get_expenses_by_category, get_incomes_by_category,
        get_monthly_totals, get_monthly_transactions, get_totals, get_totals_by_category,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn new_category(conn: &Connection, name: &str) -> CategoryId {
        create_category(CategoryName::new_unchecked(name), conn)
            .unwrap()
            .id
    }

    fn insert(
        conn: &Connection,
        amount: i64,
        transaction_type: TransactionType,
        category_id: CategoryId,
        date: OffsetDateTime,
    ) {
        create_transaction(
            Transaction::build(amount, category_id, transaction_type).date(Some(date)),
            conn,
        )
        .unwrap();
    }

    #[test]
    fn totals_for_january() {
        let conn = get_test_connection();
        let utc = LocalTimezone::utc();
        let food = new_category(&conn, "food");
        let salary = new_category(&conn, "salary");
        insert(&conn, 500, TransactionType::Income, salary, datetime!(2024-01-05 00:00 UTC));
        insert(&conn, 200, TransactionType::Expense, food, datetime!(2024-01-20 00:00 UTC));
        insert(&conn, 999, TransactionType::Expense, food, datetime!(2024-02-20 00:00 UTC));

        let totals = get_totals(Some(2024), Some(1), &utc, &conn);

        assert_eq!(
            totals,
            Ok(Totals {
                income: 500,
                expense: 200
            })
        );
    }

    #[test]
    fn totals_without_window_cover_everything() {
        let conn = get_test_connection();
        let utc = LocalTimezone::utc();
        let food = new_category(&conn, "food");
        insert(&conn, 1, TransactionType::Expense, food, datetime!(2019-01-05 00:00 UTC));
        insert(&conn, 2, TransactionType::Expense, food, datetime!(2024-07-05 00:00 UTC));

        let totals = get_totals(Some(2024), None, &utc, &conn).unwrap();

        assert_eq!(totals.expense, 3);
        assert_eq!(totals.income, 0);
    }

    #[test]
    fn first_instant_of_next_month_belongs_to_next_month() {
        let conn = get_test_connection();
        let utc = LocalTimezone::utc();
        let food = new_category(&conn, "food");
        insert(&conn, 75, TransactionType::Expense, food, datetime!(2024-04-01 00:00 UTC));

        let march = get_totals(Some(2024), Some(3), &utc, &conn).unwrap();
        let april = get_totals(Some(2024), Some(4), &utc, &conn).unwrap();

        assert_eq!(march.expense, 0);
        assert_eq!(april.expense, 75);
    }

    #[test]
    fn totals_reject_invalid_month() {
        let conn = get_test_connection();

        assert_eq!(
            get_totals(Some(2024), Some(13), &LocalTimezone::utc(), &conn),
            Err(Error::InvalidMonth(13))
        );
    }

    #[test]
    fn totals_by_category_lists_every_category() {
        let conn = get_test_connection();
        let utc = LocalTimezone::utc();
        let food = new_category(&conn, "food");
        new_category(&conn, "rent");
        let salary = new_category(&conn, "salary");
        insert(&conn, 30, TransactionType::Expense, food, datetime!(2024-01-05 00:00 UTC));
        insert(&conn, 900, TransactionType::Income, salary, datetime!(2024-02-05 00:00 UTC));

        let totals = get_totals_by_category(Some(2024), Some(1), &utc, &conn).unwrap();

        assert_eq!(totals.len(), 3);
        let got: Vec<_> = totals
            .iter()
            .map(|t| (t.category_name.as_ref(), t.total_expense, t.total_income))
            .collect();
        assert_eq!(got, vec![("food", 30, 0), ("rent", 0, 0), ("salary", 0, 0)]);
    }

    #[test]
    fn totals_by_category_ignores_deleted_categories() {
        let conn = get_test_connection();
        let utc = LocalTimezone::utc();
        let food = new_category(&conn, "food");
        let rent = new_category(&conn, "rent");
        insert(&conn, 30, TransactionType::Expense, rent, datetime!(2024-01-05 00:00 UTC));
        delete_category(rent, &conn).unwrap();

        let totals = get_totals_by_category(None, None, &utc, &conn).unwrap();

        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].category_id, food);
        assert_eq!(totals[0].total_expense, 0);
    }

    #[test]
    fn expenses_by_category_sorted_by_total() {
        let conn = get_test_connection();
        let food = new_category(&conn, "food");
        let rent = new_category(&conn, "rent");
        let salary = new_category(&conn, "salary");
        new_category(&conn, "empty");
        let date = datetime!(2024-01-05 00:00 UTC);
        insert(&conn, 30, TransactionType::Expense, food, date);
        insert(&conn, 40, TransactionType::Expense, food, date);
        insert(&conn, 1200, TransactionType::Expense, rent, date);
        insert(&conn, 5000, TransactionType::Income, salary, date);

        let expenses = get_expenses_by_category(&conn).unwrap();

        let got: Vec<_> = expenses
            .iter()
            .map(|t| (t.category_name.as_ref(), t.total, t.transaction_count))
            .collect();
        assert_eq!(got, vec![("rent", 1200, 1), ("food", 70, 2)]);
    }

    #[test]
    fn expenses_by_category_span_thousands_of_categories() {
        let conn = get_test_connection();
        conn.execute_batch(
            "WITH RECURSIVE seq(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM seq WHERE n < 33000)
             INSERT INTO category (name) SELECT 'category ' || n FROM seq;
             INSERT INTO \"transaction\" (amount, date, category_id, type)
             SELECT 1, 0, id, 'expense' FROM category;",
        )
        .unwrap();

        let expenses = get_expenses_by_category(&conn).unwrap();

        assert_eq!(expenses.len(), 33_000);
        assert!(expenses.iter().all(|t| t.total == 1 && t.transaction_count == 1));
    }

    #[test]
    fn incomes_by_category_drop_deleted_categories() {
        let conn = get_test_connection();
        let salary = new_category(&conn, "salary");
        let bonus = new_category(&conn, "bonus");
        let date = datetime!(2024-01-05 00:00 UTC);
        insert(&conn, 5000, TransactionType::Income, salary, date);
        insert(&conn, 700, TransactionType::Income, bonus, date);
        delete_category(bonus, &conn).unwrap();

        let incomes = get_incomes_by_category(&conn).unwrap();

        assert_eq!(incomes.len(), 1);
        assert_eq!(incomes[0].category_id, salary);
        assert_eq!(incomes[0].total, 5000);
    }

    #[test]
    fn monthly_transactions_require_year_and_month() {
        let conn = get_test_connection();
        let utc = LocalTimezone::utc();

        assert_eq!(
            get_monthly_transactions(Some(2024), None, &utc, &conn),
            Err(Error::MissingYearOrMonth("monthly transactions"))
        );
        assert_eq!(
            get_monthly_transactions(None, Some(1), &utc, &conn),
            Err(Error::MissingYearOrMonth("monthly transactions"))
        );
    }

    #[test]
    fn monthly_transactions_are_newest_first_with_categories() {
        let conn = get_test_connection();
        let utc = LocalTimezone::utc();
        let food = new_category(&conn, "food");
        insert(&conn, 1, TransactionType::Expense, food, datetime!(2024-03-02 00:00 UTC));
        insert(&conn, 2, TransactionType::Expense, food, datetime!(2024-03-20 00:00 UTC));
        insert(&conn, 3, TransactionType::Expense, food, datetime!(2024-04-01 00:00 UTC));

        let transactions = get_monthly_transactions(Some(2024), Some(3), &utc, &conn).unwrap();

        let amounts: Vec<_> = transactions.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![2, 1]);
        assert!(
            transactions
                .iter()
                .all(|t| t.category.as_ref().map(|c| c.id) == Some(food))
        );
    }

    #[test]
    fn monthly_totals_always_has_twelve_months() {
        let conn = get_test_connection();
        let utc = LocalTimezone::utc();
        let food = new_category(&conn, "food");
        insert(&conn, 10, TransactionType::Expense, food, datetime!(2024-02-10 00:00 UTC));
        insert(&conn, 20, TransactionType::Income, food, datetime!(2024-11-10 00:00 UTC));
        insert(&conn, 40, TransactionType::Income, food, datetime!(2025-01-01 00:00 UTC));

        let totals = get_monthly_totals(Some(2024), &utc, &conn).unwrap();

        assert_eq!(totals.len(), 12);
        let months: Vec<_> = totals.iter().map(|t| t.month).collect();
        assert_eq!(months, (1..=12).collect::<Vec<u8>>());
        assert_eq!(totals[1].expense, 10);
        assert_eq!(totals[10].income, 20);
        assert_eq!(totals.iter().map(|t| t.income).sum::<i64>(), 20);
    }

    #[test]
    fn monthly_totals_default_to_current_year() {
        let conn = get_test_connection();
        let utc = LocalTimezone::utc();
        let food = new_category(&conn, "food");
        insert(&conn, 10, TransactionType::Expense, food, OffsetDateTime::now_utc());

        let totals = get_monthly_totals(None, &utc, &conn).unwrap();

        assert_eq!(totals.len(), 12);
        assert_eq!(totals.iter().map(|t| t.expense).sum::<i64>(), 10);
    }

    #[test]
    fn daily_totals_require_year_and_month() {
        let conn = get_test_connection();

        assert_eq!(
            get_daily_totals(Some(2024), None, &LocalTimezone::utc(), &conn),
            Err(Error::MissingYearOrMonth("daily totals"))
        );
    }

    #[test]
    fn daily_totals_leap_february() {
        let conn = get_test_connection();
        let utc = LocalTimezone::utc();

        let leap = get_daily_totals(Some(2024), Some(2), &utc, &conn).unwrap();
        let common = get_daily_totals(Some(2023), Some(2), &utc, &conn).unwrap();

        assert_eq!(leap.len(), 29);
        assert_eq!(common.len(), 28);
    }

    #[test]
    fn daily_totals_for_single_expense() {
        let conn = get_test_connection();
        let utc = LocalTimezone::utc();
        let food = new_category(&conn, "food");
        insert(&conn, 100, TransactionType::Expense, food, datetime!(2024-03-15 00:00 UTC));

        let totals = get_daily_totals(Some(2024), Some(3), &utc, &conn).unwrap();

        assert_eq!(totals.len(), 31);
        for day in &totals {
            if day.day == 15 {
                assert_eq!((day.income, day.expense), (0, 100));
            } else {
                assert_eq!((day.income, day.expense), (0, 0), "day {}", day.day);
            }
        }
    }

    #[test]
    fn daily_totals_use_local_calendar() {
        let conn = get_test_connection();
        let auckland = LocalTimezone::new("Pacific/Auckland").unwrap();
        let food = new_category(&conn, "food");
        // 1 April 09:00 in Auckland, still 31 March in UTC.
        insert(&conn, 50, TransactionType::Expense, food, datetime!(2024-03-31 20:00 UTC));

        let march = get_daily_totals(Some(2024), Some(3), &auckland, &conn).unwrap();
        let april = get_daily_totals(Some(2024), Some(4), &auckland, &conn).unwrap();

        assert!(march.iter().all(|day| day.expense == 0));
        assert_eq!(april[0].expense, 50);
    }
}
