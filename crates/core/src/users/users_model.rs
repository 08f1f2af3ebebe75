//! User domain models.

use serde::{Deserialize, Serialize};

use crate::documents::{Collection, Document};

/// A user and the records it owns.
///
/// Ownership is by id. The lists are kept consistent by the seed fixture and
/// goal creation; nothing else checks them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// bcrypt hash, never the clear-text password
    pub password: String,
    #[serde(default)]
    pub account_ids: Vec<String>,
    #[serde(default)]
    pub goal_ids: Vec<String>,
    #[serde(default)]
    pub transaction_ids: Vec<String>,
}

impl Document for User {
    const COLLECTION: Collection = Collection::Users;

    fn id(&self) -> &str {
        &self.id
    }
}
