//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{CategoryId, Error};

/// A validated, lowercase category name.
///
/// Names are stored lowercased so that uniqueness in the database is
/// case-insensitive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash, PartialOrd, Ord)]
pub struct CategoryName(String);

impl CategoryName {
    /// The minimum number of characters in a name.
    pub const MIN_LENGTH: usize = 3;
    /// The maximum number of characters in a name.
    pub const MAX_LENGTH: usize = 30;

    /// Create a category name.
    ///
    /// Leading and trailing whitespace is trimmed and the name is lowercased.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::InvalidCategoryName] if the
    /// trimmed name is not between [Self::MIN_LENGTH] and [Self::MAX_LENGTH]
    /// characters long, or contains anything other than ASCII letters,
    /// digits and whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();
        let length = name.chars().count();

        if !(Self::MIN_LENGTH..=Self::MAX_LENGTH).contains(&length) {
            return Err(Error::InvalidCategoryName(format!(
                "Category name must be between {} and {} characters long",
                Self::MIN_LENGTH,
                Self::MAX_LENGTH
            )));
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        {
            return Err(Error::InvalidCategoryName(
                "Category name can only contain letters, numbers and spaces".to_owned(),
            ));
        }

        Ok(Self(name.to_lowercase()))
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is a valid, lowercase name.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A category for grouping transactions (e.g., 'groceries', 'salary').
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    /// The ID assigned by the database.
    pub id: CategoryId,
    /// The unique, lowercase name.
    pub name: CategoryName,
}

/// Request body for creating a category.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCategoryForm {
    /// The requested name, before validation and lowercasing.
    pub name: String,
}

/// Request body for updating a category.
///
/// Leaving out the name leaves the category unchanged.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateCategoryForm {
    /// The new name, before validation and lowercasing.
    #[serde(default)]
    pub name: Option<String>,
}
