//! Application router configuration.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::{
    AppState,
    category::{
        create_category_endpoint, delete_category_endpoint, get_category_endpoint,
        list_categories_endpoint, update_category_endpoint,
    },
    endpoints,
    report::{
        get_daily_totals_endpoint, get_expenses_by_category_endpoint,
        get_incomes_by_category_endpoint, get_monthly_totals_endpoint,
        get_monthly_transactions_endpoint, get_totals_by_category_endpoint, get_totals_endpoint,
    },
    response::MessageBody,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
        list_transactions_endpoint, update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let category_routes = Router::new()
        .route(
            endpoints::CATEGORIES,
            get(list_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            get(get_category_endpoint)
                .patch(update_category_endpoint)
                .delete(delete_category_endpoint),
        );

    let transaction_routes = Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .patch(update_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        );

    let report_routes = Router::new()
        .route(endpoints::TOTALS, get(get_totals_endpoint))
        .route(
            endpoints::TOTALS_BY_CATEGORY,
            get(get_totals_by_category_endpoint),
        )
        .route(endpoints::MONTHLY_TOTALS, get(get_monthly_totals_endpoint))
        .route(endpoints::DAILY_TOTALS, get(get_daily_totals_endpoint))
        .route(
            endpoints::MONTHLY_TRANSACTIONS,
            get(get_monthly_transactions_endpoint),
        )
        .route(
            endpoints::EXPENSES_BY_CATEGORY,
            get(get_expenses_by_category_endpoint),
        )
        .route(
            endpoints::INCOMES_BY_CATEGORY,
            get(get_incomes_by_category_endpoint),
        );

    category_routes
        .merge(transaction_routes)
        .merge(report_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(MessageBody::new("The requested resource does not exist.")),
    )
        .into_response()
}
