use serde::{Deserialize, Serialize};

use crate::documents::{Collection, Document};

/// A label attached to any number of transactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub name: String,
}

impl Document for Tag {
    const COLLECTION: Collection = Collection::Tags;

    fn id(&self) -> &str {
        &self.id
    }
}
