//! The JSON body used to confirm writes and report errors.

use serde::{Deserialize, Serialize};

use crate::DatabaseId;

/// A human-readable message, optionally naming the record that was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    /// The text shown to the user.
    pub message: String,
    /// The ID of the created or updated record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DatabaseId>,
}

impl MessageBody {
    /// A message that does not refer to a record.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            id: None,
        }
    }

    /// A message about the record `id`.
    pub fn with_id(message: impl Into<String>, id: DatabaseId) -> Self {
        Self {
            message: message.into(),
            id: Some(id),
        }
    }
}
