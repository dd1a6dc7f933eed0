//! Defines the core data models for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{CategoryId, Error, TransactionId};

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned, e.g. a salary payment.
    Income,
    /// Money spent, e.g. groceries.
    Expense,
}

impl TransactionType {
    /// The lowercase name used in the database and the API.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(Error::InvalidTransactionType(other.to_owned())),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The amount of money in whole currency units, never negative.
    pub amount: i64,
    /// A text description of what the transaction was for.
    pub description: Option<String>,
    /// When the transaction happened, at millisecond precision.
    pub date: OffsetDateTime,
    /// The ID of the category the transaction belongs to.
    ///
    /// The category may have been deleted since the transaction was written.
    pub category_id: CategoryId,
    /// Whether the transaction is an income or an expense.
    pub transaction_type: TransactionType,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [NewTransaction] for discoverability.
    pub fn build(
        amount: i64,
        category_id: CategoryId,
        transaction_type: TransactionType,
    ) -> NewTransaction {
        NewTransaction {
            amount,
            description: None,
            date: None,
            category_id,
            transaction_type,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The date defaults to the time of insertion when not set.
#[derive(Debug, PartialEq, Clone)]
pub struct NewTransaction {
    /// The amount of money in whole currency units.
    pub amount: i64,
    /// An optional description.
    pub description: Option<String>,
    /// When the transaction happened.
    pub date: Option<OffsetDateTime>,
    /// The category the transaction belongs to.
    pub category_id: CategoryId,
    /// Whether the transaction is an income or an expense.
    pub transaction_type: TransactionType,
}

impl NewTransaction {
    /// Set the description for the transaction.
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Set the date for the transaction.
    pub fn date(mut self, date: Option<OffsetDateTime>) -> Self {
        self.date = date;
        self
    }
}

/// A partial update to a transaction. `None` fields are left unchanged.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct TransactionUpdate {
    /// The new amount.
    pub amount: Option<i64>,
    /// The new description.
    pub description: Option<String>,
    /// The new date.
    pub date: Option<OffsetDateTime>,
    /// The new category.
    pub category_id: Option<CategoryId>,
    /// The new transaction type.
    pub transaction_type: Option<TransactionType>,
}

/// An amount as sent by a client, either a JSON integer or a string of digits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    /// A JSON number.
    Number(serde_json::Number),
    /// A JSON string.
    Text(String),
}

impl AmountInput {
    /// Parse the amount into whole currency units.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if the amount is negative, fractional, or
    /// not a number.
    pub fn parse(&self) -> Result<i64, Error> {
        match self {
            AmountInput::Number(number) => number
                .as_i64()
                .filter(|amount| *amount >= 0)
                .ok_or_else(|| Error::InvalidAmount(number.to_string())),
            AmountInput::Text(text) => parse_amount(text),
        }
    }
}

/// Parse a string of digits into a non-negative amount.
///
/// # Errors
/// Returns [Error::InvalidAmount] if `raw` contains anything other than ASCII
/// digits or does not fit into an `i64`.
pub fn parse_amount(raw: &str) -> Result<i64, Error> {
    let digits = raw.trim();

    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(Error::InvalidAmount(raw.to_owned()));
    }

    digits
        .parse()
        .map_err(|_| Error::InvalidAmount(raw.to_owned()))
}

/// Request body for creating a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransactionForm {
    /// The amount in whole currency units.
    pub amount: AmountInput,
    /// An optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// A `yyyy-mm-dd` date or RFC 3339 timestamp, defaults to now.
    #[serde(default)]
    pub date: Option<String>,
    /// The ID of the category.
    pub category: String,
    /// Either "income" or "expense".
    #[serde(rename = "type")]
    pub transaction_type: String,
}

/// Request body for updating a transaction. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTransactionForm {
    /// The new amount.
    #[serde(default)]
    pub amount: Option<AmountInput>,
    /// The new description.
    #[serde(default)]
    pub description: Option<String>,
    /// The new date.
    #[serde(default)]
    pub date: Option<String>,
    /// The ID of the new category.
    #[serde(default)]
    pub category: Option<String>,
    /// The new transaction type.
    #[serde(default, rename = "type")]
    pub transaction_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use crate::Error;

    use super::{AmountInput, TransactionType, parse_amount};

    #[test]
    fn parses_transaction_type() {
        assert_eq!(TransactionType::from_str("income"), Ok(TransactionType::Income));
        assert_eq!(TransactionType::from_str("expense"), Ok(TransactionType::Expense));
        assert_eq!(
            TransactionType::from_str("transfer"),
            Err(Error::InvalidTransactionType("transfer".to_owned()))
        );
    }

    #[test]
    fn parses_amount_string() {
        assert_eq!(parse_amount("0"), Ok(0));
        assert_eq!(parse_amount("1500"), Ok(1500));
    }

    #[test]
    fn rejects_invalid_amount_strings() {
        for raw in ["", "-5", "+5", "12.50", "1e3", "ten", "99999999999999999999"] {
            assert_eq!(
                parse_amount(raw),
                Err(Error::InvalidAmount(raw.to_owned())),
                "want {raw:?} to be rejected"
            );
        }
    }

    #[test]
    fn parses_json_amounts() {
        let amount: AmountInput = serde_json::from_str("250").unwrap();
        assert_eq!(amount.parse(), Ok(250));

        let amount: AmountInput = serde_json::from_str("\"250\"").unwrap();
        assert_eq!(amount.parse(), Ok(250));
    }

    #[test]
    fn rejects_fractional_and_negative_json_amounts() {
        for raw in ["12.5", "-3"] {
            let amount: AmountInput = serde_json::from_str(raw).unwrap();

            assert!(
                matches!(amount.parse(), Err(Error::InvalidAmount(_))),
                "want {raw} to be rejected"
            );
        }
    }
}
