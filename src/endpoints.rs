//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/categories/{category_id}', use [format_endpoint].

/// The route to create and list categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route to access a single category.
pub const CATEGORY: &str = "/api/categories/{category_id}";
/// The route to create and list transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route for the income and expense totals.
pub const TOTALS: &str = "/api/transactions/totals";
/// The route for the income and expense totals of every category.
pub const TOTALS_BY_CATEGORY: &str = "/api/transactions/totals/by-category";
/// The route for the income and expense totals of each month in a year.
pub const MONTHLY_TOTALS: &str = "/api/transactions/totals/monthly";
/// The route for the income and expense totals of each day in a month.
pub const DAILY_TOTALS: &str = "/api/transactions/totals/daily";
/// The route for the transactions in a month.
pub const MONTHLY_TRANSACTIONS: &str = "/api/transactions/monthly";
/// The route for the expense total of each category with expenses.
pub const EXPENSES_BY_CATEGORY: &str = "/api/transactions/expenses/by-category";
/// The route for the income total of each category with incomes.
pub const INCOMES_BY_CATEGORY: &str = "/api/transactions/incomes/by-category";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace and ends with a
/// right brace. For example, in the endpoint path '/categories/{category_id}',
/// '{category_id}' is the parameter.
///
/// This function assumes that an endpoint path contains a single parameter.
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map_or(endpoint_path.len(), |offset| param_start + offset + 1);

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::CATEGORIES);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS);
        assert_endpoint_is_valid_uri(endpoints::TOTALS);
        assert_endpoint_is_valid_uri(endpoints::TOTALS_BY_CATEGORY);
        assert_endpoint_is_valid_uri(endpoints::MONTHLY_TOTALS);
        assert_endpoint_is_valid_uri(endpoints::DAILY_TOTALS);
        assert_endpoint_is_valid_uri(endpoints::MONTHLY_TRANSACTIONS);
        assert_endpoint_is_valid_uri(endpoints::EXPENSES_BY_CATEGORY);
        assert_endpoint_is_valid_uri(endpoints::INCOMES_BY_CATEGORY);
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::CATEGORY, 1));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::TRANSACTION, 1));
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/hello/{world}/bye", 1);

        assert_eq!(formatted_path, "/hello/1/bye");
    }
}
