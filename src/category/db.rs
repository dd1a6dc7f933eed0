//! Database operations for categories.

use std::collections::HashMap;

use rusqlite::{Connection, OptionalExtension, Row, params_from_iter};

use crate::{
    CategoryId, Error,
    category::{Category, CategoryName},
};

/// Create a category and return it with its generated ID.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateCategoryName] if a category with the same name already exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_category(name: CategoryName, connection: &Connection) -> Result<Category, Error> {
    connection
        .execute("INSERT INTO category (name) VALUES (?1);", (name.as_ref(),))
        .map_err(|error| map_unique_violation(error, &name))?;

    let id = connection.last_insert_rowid();

    Ok(Category { id, name })
}

/// Retrieve a single category by ID.
///
/// # Errors
/// This function will return a:
/// - [Error::CategoryNotFound] if `category_id` does not refer to a stored category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name FROM category WHERE id = :id;")?
        .query_row(&[(":id", &category_id)], map_row)
        .optional()?
        .ok_or(Error::CategoryNotFound(category_id))
}

/// Check whether `category_id` refers to a stored category.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn category_exists(category_id: CategoryId, connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM category WHERE id = ?1);",
            [category_id],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Retrieve all categories ordered alphabetically by name.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name FROM category ORDER BY name ASC, id ASC;")?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// The most IDs bound to a single `IN (...)` query, well under SQLite's
/// limit on bound variables.
const MAX_IDS_PER_QUERY: usize = 500;

/// Retrieve the categories for a set of IDs, keyed by ID.
///
/// IDs that do not refer to a stored category are left out of the map. Large
/// sets of IDs are looked up in batches.
pub fn get_categories_by_id(
    category_ids: &[CategoryId],
    connection: &Connection,
) -> Result<HashMap<CategoryId, Category>, Error> {
    let mut categories = HashMap::with_capacity(category_ids.len());

    for batch in category_ids.chunks(MAX_IDS_PER_QUERY) {
        let placeholders = batch.iter().map(|_| "?").collect::<Vec<_>>().join(",");
        let query = format!("SELECT id, name FROM category WHERE id IN ({placeholders});");

        let mut stmt = connection.prepare(&query)?;
        for category in stmt.query_map(params_from_iter(batch), map_row)? {
            let category = category?;
            categories.insert(category.id, category);
        }
    }

    Ok(categories)
}

/// Rename a category.
///
/// If `new_name` is `None` the category is left as is. Either way the stored
/// category is returned.
///
/// # Errors
/// This function will return a:
/// - [Error::CategoryNotFound] if `category_id` does not refer to a stored category,
/// - [Error::DuplicateCategoryName] if another category already uses `new_name`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_category(
    category_id: CategoryId,
    new_name: Option<CategoryName>,
    connection: &Connection,
) -> Result<Category, Error> {
    let Some(new_name) = new_name else {
        return get_category(category_id, connection);
    };

    let rows_affected = connection
        .execute(
            "UPDATE category SET name = ?1 WHERE id = ?2",
            (new_name.as_ref(), category_id),
        )
        .map_err(|error| map_unique_violation(error, &new_name))?;

    if rows_affected == 0 {
        return Err(Error::CategoryNotFound(category_id));
    }

    Ok(Category {
        id: category_id,
        name: new_name,
    })
}

/// Delete a category by ID.
///
/// Transactions that refer to the category are left untouched and will
/// resolve to no category when read.
///
/// # Errors
/// This function will return a:
/// - [Error::CategoryNotFound] if `category_id` does not refer to a stored category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_category(category_id: CategoryId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM category WHERE id = ?1", [category_id])?;

    if rows_affected == 0 {
        return Err(Error::CategoryNotFound(category_id));
    }

    Ok(())
}

/// Initialize the category table.
///
/// The UNIQUE constraint on the name is what keeps two concurrent requests
/// from creating the same category. IDs are never reused, so a transaction
/// that refers to a deleted category cannot pick up a new one.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        );",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = CategoryName::new_unchecked(&raw_name);

    Ok(Category { id, name })
}

fn map_unique_violation(error: rusqlite::Error, name: &CategoryName) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
            },
            _,
        ) => Error::DuplicateCategoryName(name.to_string()),
        error => error.into(),
    }
}
