//! JSON endpoints for creating, reading, updating and deleting transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppJson, AppQuery, AppState, Error,
    app_state::lock_connection,
    parse_database_id,
    response::MessageBody,
    transaction::{
        CreateTransactionForm, Transaction, TransactionFilter, TransactionType, TransactionUpdate,
        TransactionView, UpdateTransactionForm, attach_categories, attach_category,
        create_transaction, delete_transaction,
        date::{DayBound, parse_date_input},
        get_transaction,
        message::{TransactionAction, transaction_message},
        query_transactions, update_transaction,
    },
    validation::resolve_category_reference,
};

/// The state needed for the transaction endpoints.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters for listing transactions.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionListQuery {
    /// The maximum number of transactions to return, zero means no limit.
    pub limit: Option<u32>,
    /// Only include transactions on or after this date.
    pub start_date: Option<String>,
    /// Only include transactions on or before this date.
    pub end_date: Option<String>,
}

/// Create a transaction from a JSON body.
///
/// The category must exist at the time of writing.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    AppJson(form): AppJson<CreateTransactionForm>,
) -> Result<(StatusCode, Json<MessageBody>), Error> {
    let amount = form.amount.parse()?;
    let transaction_type: TransactionType = form.transaction_type.parse()?;
    let date = form
        .date
        .as_deref()
        .map(|raw| parse_date_input(raw, DayBound::Start))
        .transpose()?;

    let connection = lock_connection(&state.db_connection)?;
    let category_id = resolve_category_reference(&form.category, &connection)?;

    let transaction = create_transaction(
        Transaction::build(amount, category_id, transaction_type)
            .description(form.description)
            .date(date),
        &connection,
    )
    .inspect_err(|error| tracing::error!("could not create transaction: {error}"))?;

    tracing::info!(
        "created {} transaction {} in category {}",
        transaction.transaction_type,
        transaction.id,
        transaction.category_id
    );

    Ok((
        StatusCode::CREATED,
        Json(MessageBody::with_id(
            transaction_message(transaction.transaction_type, TransactionAction::Created),
            transaction.id,
        )),
    ))
}

/// List transactions newest first, optionally filtered by date and limited in number.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionState>,
    AppQuery(query): AppQuery<TransactionListQuery>,
) -> Result<Json<Vec<TransactionView>>, Error> {
    let filter = TransactionFilter {
        start: query
            .start_date
            .as_deref()
            .map(|raw| parse_date_input(raw, DayBound::Start))
            .transpose()?,
        end: query
            .end_date
            .as_deref()
            .map(|raw| parse_date_input(raw, DayBound::End))
            .transpose()?,
        limit: query.limit,
    };

    let connection = lock_connection(&state.db_connection)?;
    let transactions = query_transactions(filter, &connection)?;

    attach_categories(transactions, &connection).map(Json)
}

/// Get a single transaction with its category.
pub async fn get_transaction_endpoint(
    Path(transaction_id): Path<String>,
    State(state): State<TransactionState>,
) -> Result<Json<TransactionView>, Error> {
    let transaction_id = parse_database_id(&transaction_id)?;
    let connection = lock_connection(&state.db_connection)?;

    let transaction = get_transaction(transaction_id, &connection)?;

    attach_category(transaction, &connection).map(Json)
}

/// Change some or all of the fields of a transaction.
///
/// A new category must exist at the time of writing.
pub async fn update_transaction_endpoint(
    Path(transaction_id): Path<String>,
    State(state): State<TransactionState>,
    AppJson(form): AppJson<UpdateTransactionForm>,
) -> Result<Json<MessageBody>, Error> {
    let transaction_id = parse_database_id(&transaction_id)?;
    let amount = form.amount.as_ref().map(|amount| amount.parse()).transpose()?;
    let transaction_type = form
        .transaction_type
        .as_deref()
        .map(str::parse::<TransactionType>)
        .transpose()?;
    let date = form
        .date
        .as_deref()
        .map(|raw| parse_date_input(raw, DayBound::Start))
        .transpose()?;

    let connection = lock_connection(&state.db_connection)?;
    let category_id = form
        .category
        .as_deref()
        .map(|raw_id| resolve_category_reference(raw_id, &connection))
        .transpose()?;

    let update = TransactionUpdate {
        amount,
        description: form.description,
        date,
        category_id,
        transaction_type,
    };

    let transaction = update_transaction(transaction_id, update, &connection)?;
    tracing::info!("updated transaction {}", transaction.id);

    Ok(Json(MessageBody::with_id(
        transaction_message(transaction.transaction_type, TransactionAction::Updated),
        transaction.id,
    )))
}

/// Delete a transaction.
pub async fn delete_transaction_endpoint(
    Path(transaction_id): Path<String>,
    State(state): State<TransactionState>,
) -> Result<Json<MessageBody>, Error> {
    let transaction_id = parse_database_id(&transaction_id)?;
    let connection = lock_connection(&state.db_connection)?;

    delete_transaction(transaction_id, &connection)?;
    tracing::info!("deleted transaction {transaction_id}");

    Ok(Json(MessageBody::new("Transaction deleted.")))
}
