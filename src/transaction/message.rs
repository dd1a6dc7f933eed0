//! Confirmation messages for writes to transactions.

use crate::transaction::TransactionType;

/// What happened to a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionAction {
    /// The transaction was just created.
    Created,
    /// An existing transaction was changed.
    Updated,
}

impl TransactionAction {
    fn past_tense(self) -> &'static str {
        match self {
            TransactionAction::Created => "created",
            TransactionAction::Updated => "updated",
        }
    }
}

/// The confirmation message for a transaction, e.g. "Income created successfully.".
///
/// Updates use the type the transaction has after the update.
pub fn transaction_message(transaction_type: TransactionType, action: TransactionAction) -> String {
    let label = match transaction_type {
        TransactionType::Income => "Income",
        TransactionType::Expense => "Expense",
    };

    format!("{label} {} successfully.", action.past_tense())
}
