//! Database ID type definitions.

use crate::Error;

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;
/// Database identifier for a category.
pub type CategoryId = DatabaseId;
/// Database identifier for a transaction.
pub type TransactionId = DatabaseId;

/// Parse the text form of a database ID.
///
/// SQLite assigns IDs starting from 1, so only plain decimal strings of
/// positive integers are accepted. Signs, whitespace inside the digits and
/// values that overflow an `i64` are all rejected.
///
/// # Errors
/// Returns [Error::InvalidId] if `raw` is not a well-formed ID.
pub fn parse_database_id(raw: &str) -> Result<DatabaseId, Error> {
    let digits = raw.trim();

    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(Error::InvalidId(raw.to_owned()));
    }

    match digits.parse::<DatabaseId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(Error::InvalidId(raw.to_owned())),
    }
}
