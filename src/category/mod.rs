//! Category management for grouping transactions.

mod db;
mod domain;
mod endpoints;

pub use db::{
    category_exists, create_category, create_category_table, delete_category, get_all_categories,
    get_categories_by_id, get_category, update_category,
};
pub use domain::{Category, CategoryName, CreateCategoryForm, UpdateCategoryForm};
pub use endpoints::{
    CategoryState, create_category_endpoint, delete_category_endpoint, get_category_endpoint,
    list_categories_endpoint, update_category_endpoint,
};
