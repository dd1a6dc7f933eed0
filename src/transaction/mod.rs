//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `NewTransaction` builder for creating transactions
//! - Database functions for storing, querying, and managing transactions
//! - Attaching categories to transactions for display
//! - The JSON endpoints for transactions

mod date;
mod db;
mod domain;
mod endpoints;
mod message;
mod populate;

pub use date::{
    DayBound, format_timestamp, from_unix_millis, now, parse_date_input, serialize_timestamp,
    to_unix_millis,
};
pub use db::{
    TransactionFilter, create_transaction, create_transaction_table, delete_transaction,
    get_transaction, get_transactions_between, map_transaction_row, query_transactions,
    update_transaction,
};
pub(crate) use db::map_date_column;
pub use domain::{
    AmountInput, CreateTransactionForm, NewTransaction, Transaction, TransactionType,
    TransactionUpdate, UpdateTransactionForm, parse_amount,
};
pub use endpoints::{
    TransactionListQuery, TransactionState, create_transaction_endpoint,
    delete_transaction_endpoint, get_transaction_endpoint, list_transactions_endpoint,
    update_transaction_endpoint,
};
pub use message::{TransactionAction, transaction_message};
pub use populate::{TransactionView, attach_categories, attach_category};
