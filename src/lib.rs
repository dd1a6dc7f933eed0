//! Cashbook is a service for recording personal incomes and expenses.
//!
//! Every transaction belongs to a category, and the reporting functions turn
//! the raw transactions into totals, per-category breakdowns, and dense
//! monthly and daily series.
//!
//! This library provides a JSON REST API over a SQLite database.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod app_state;
pub mod category;
mod database_id;
mod db;
pub mod endpoints;
mod extract;
mod logging;
pub mod report;
mod response;
mod routing;
mod timezone;
pub mod transaction;
mod validation;

pub use app_state::AppState;
pub use database_id::{CategoryId, DatabaseId, TransactionId, parse_database_id};
pub use db::initialize as initialize_db;
pub use extract::{AppJson, AppQuery};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use response::MessageBody;
pub use routing::build_router;
pub use timezone::LocalTimezone;
pub use validation::resolve_category_reference;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate_signal) => {
                terminate_signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The broad classes of failure that callers need to distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input was malformed and the request should not be retried as-is.
    Validation,
    /// A referenced category or transaction does not exist.
    NotFound,
    /// The request would break a uniqueness rule.
    Conflict,
    /// Something went wrong in the server or the database.
    Internal,
}

impl ErrorKind {
    /// The HTTP status code used to report this kind of error.
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The string could not be parsed as a database ID.
    ///
    /// IDs are positive whole numbers, anything else is rejected before it
    /// reaches the database.
    #[error("\"{0}\" is not a valid ID")]
    InvalidId(String),

    /// The category name broke one of the naming rules.
    #[error("{0}")]
    InvalidCategoryName(String),

    /// The amount was not a non-negative whole number.
    #[error("the amount \"{0}\" must be a non-negative whole number")]
    InvalidAmount(String),

    /// The date was neither a `yyyy-mm-dd` date nor an RFC 3339 timestamp.
    #[error("\"{0}\" is not a valid date, use the format yyyy-mm-dd or an RFC 3339 timestamp")]
    InvalidDate(String),

    /// The transaction type was not one of "income" or "expense".
    #[error("\"{0}\" is not a valid transaction type, expected \"income\" or \"expense\"")]
    InvalidTransactionType(String),

    /// The request body or query string could not be deserialized.
    ///
    /// The string describes what was wrong with it.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A month number outside of 1-12.
    #[error("{0} is not a valid month, expected a number between 1 and 12")]
    InvalidMonth(u8),

    /// A year that cannot be represented as a calendar date.
    #[error("{0} is not a supported year")]
    InvalidYear(i32),

    /// A report that needs both a year and a month was missing one of them.
    ///
    /// The string names the report.
    #[error("the year and month are required to get the {0}")]
    MissingYearOrMonth(&'static str),

    /// The category ID does not refer to a stored category.
    #[error("the category with the ID {0} does not exist")]
    CategoryNotFound(CategoryId),

    /// The transaction ID does not refer to a stored transaction.
    #[error("the transaction with the ID {0} does not exist")]
    TransactionNotFound(TransactionId),

    /// Another category already uses the (lowercased) name.
    #[error("the category \"{0}\" already exists")]
    DuplicateCategoryName(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A request or response body could not be read.
    #[error("could not read the message body")]
    BodyReadError,

    /// The time zone name is not a canonical IANA time zone.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),
}

impl Error {
    /// Classify the error for callers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidId(_)
            | Error::InvalidCategoryName(_)
            | Error::InvalidAmount(_)
            | Error::InvalidDate(_)
            | Error::InvalidTransactionType(_)
            | Error::InvalidRequest(_)
            | Error::InvalidMonth(_)
            | Error::InvalidYear(_)
            | Error::MissingYearOrMonth(_) => ErrorKind::Validation,
            Error::CategoryNotFound(_) | Error::TransactionNotFound(_) => ErrorKind::NotFound,
            Error::DuplicateCategoryName(_) => ErrorKind::Conflict,
            Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::BodyReadError
            | Error::InvalidTimezone(_) => ErrorKind::Internal,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let kind = self.kind();

        let message = match kind {
            // Internal details are only meant for the server logs.
            ErrorKind::Internal => {
                tracing::error!("An unexpected error occurred: {}", self);
                "An unexpected error occurred, check the server logs for more details.".to_owned()
            }
            _ => self.to_string(),
        };

        (kind.status_code(), Json(MessageBody::new(message))).into_response()
    }
}
