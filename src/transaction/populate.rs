//! Replaces the category ID of transactions with the full category.

use std::collections::HashMap;

use rusqlite::Connection;
use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    Error, TransactionId,
    category::{Category, get_categories_by_id, get_category},
    transaction::{Transaction, TransactionType, date::serialize_timestamp},
};

/// A transaction as it is shown to clients, with its category resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionView {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The amount of money in whole currency units.
    pub amount: i64,
    /// A text description of what the transaction was for.
    pub description: Option<String>,
    /// When the transaction happened.
    #[serde(serialize_with = "serialize_timestamp")]
    pub date: OffsetDateTime,
    /// The category, or `None` if it has since been deleted.
    pub category: Option<Category>,
    /// Whether the transaction is an income or an expense.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

impl TransactionView {
    fn new(transaction: Transaction, category: Option<Category>) -> Self {
        Self {
            id: transaction.id,
            amount: transaction.amount,
            description: transaction.description,
            date: transaction.date,
            category,
            transaction_type: transaction.transaction_type,
        }
    }
}

/// Attach the category to a single transaction.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn attach_category(
    transaction: Transaction,
    connection: &Connection,
) -> Result<TransactionView, Error> {
    let category = match get_category(transaction.category_id, connection) {
        Ok(category) => Some(category),
        Err(Error::CategoryNotFound(_)) => None,
        Err(error) => return Err(error),
    };

    Ok(TransactionView::new(transaction, category))
}

/// Attach the categories to a list of transactions, keeping their order.
///
/// The categories are fetched with a single query. Transactions whose
/// category no longer exists get `None`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn attach_categories(
    transactions: Vec<Transaction>,
    connection: &Connection,
) -> Result<Vec<TransactionView>, Error> {
    let mut category_ids: Vec<_> = transactions
        .iter()
        .map(|transaction| transaction.category_id)
        .collect();
    category_ids.sort_unstable();
    category_ids.dedup();

    let categories: HashMap<_, _> = get_categories_by_id(&category_ids, connection)?;

    Ok(transactions
        .into_iter()
        .map(|transaction| {
            let category = categories.get(&transaction.category_id).cloned();
            TransactionView::new(transaction, category)
        })
        .collect())
}
