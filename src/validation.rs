//! Checks that a transaction refers to a category that exists.

use rusqlite::Connection;

use crate::{CategoryId, Error, category::category_exists, parse_database_id};

/// Parse `raw_id` and check that it refers to a stored category.
///
/// Transactions must only be written with a category that exists at the time
/// of writing. The category may be deleted later.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidId] if `raw_id` is not a well-formed ID,
/// - [Error::CategoryNotFound] if no category has the ID,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn resolve_category_reference(
    raw_id: &str,
    connection: &Connection,
) -> Result<CategoryId, Error> {
    let category_id = parse_database_id(raw_id)?;

    if category_exists(category_id, connection)? {
        Ok(category_id)
    } else {
        tracing::debug!("rejected reference to missing category {category_id}");
        Err(Error::CategoryNotFound(category_id))
    }
}
