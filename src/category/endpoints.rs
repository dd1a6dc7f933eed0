//! JSON endpoints for creating, reading, updating and deleting categories.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppJson, AppState, Error,
    app_state::lock_connection,
    category::{
        Category, CategoryName, CreateCategoryForm, UpdateCategoryForm, create_category,
        delete_category, get_all_categories, get_category, update_category,
    },
    parse_database_id,
    response::MessageBody,
};

/// The state needed for the category endpoints.
#[derive(Debug, Clone)]
pub struct CategoryState {
    /// The database connection for managing categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Create a category from a JSON body.
pub async fn create_category_endpoint(
    State(state): State<CategoryState>,
    AppJson(form): AppJson<CreateCategoryForm>,
) -> Result<(StatusCode, Json<MessageBody>), Error> {
    let name = CategoryName::new(&form.name)?;
    let connection = lock_connection(&state.db_connection)?;

    let category = create_category(name, &connection)
        .inspect_err(|error| tracing::debug!("could not create category: {error}"))?;

    tracing::info!("created category {} ({})", category.name, category.id);

    Ok((
        StatusCode::CREATED,
        Json(MessageBody::with_id(
            "Category created successfully.",
            category.id,
        )),
    ))
}

/// List every category, ordered by name.
pub async fn list_categories_endpoint(
    State(state): State<CategoryState>,
) -> Result<Json<Vec<Category>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_all_categories(&connection).map(Json)
}

/// Get a single category.
pub async fn get_category_endpoint(
    Path(category_id): Path<String>,
    State(state): State<CategoryState>,
) -> Result<Json<Category>, Error> {
    let category_id = parse_database_id(&category_id)?;
    let connection = lock_connection(&state.db_connection)?;

    get_category(category_id, &connection).map(Json)
}

/// Rename a category.
pub async fn update_category_endpoint(
    Path(category_id): Path<String>,
    State(state): State<CategoryState>,
    AppJson(form): AppJson<UpdateCategoryForm>,
) -> Result<Json<MessageBody>, Error> {
    let category_id = parse_database_id(&category_id)?;
    let new_name = form
        .name
        .as_deref()
        .map(CategoryName::new)
        .transpose()?;
    let connection = lock_connection(&state.db_connection)?;

    let category = update_category(category_id, new_name, &connection)?;

    Ok(Json(MessageBody::with_id(
        "Category updated successfully.",
        category.id,
    )))
}

/// Delete a category.
///
/// Transactions in the category are kept and will show no category.
pub async fn delete_category_endpoint(
    Path(category_id): Path<String>,
    State(state): State<CategoryState>,
) -> Result<Json<MessageBody>, Error> {
    let category_id = parse_database_id(&category_id)?;
    let connection = lock_connection(&state.db_connection)?;

    delete_category(category_id, &connection)?;
    tracing::info!("deleted category {category_id}");

    Ok(Json(MessageBody::new("Category deleted.")))
}
