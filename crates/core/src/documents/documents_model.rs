//! Document store models.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{DatabaseError, Error, Result};

/// The five collections making up the application's data set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Collection {
    Users,
    Accounts,
    Goals,
    Tags,
    Transactions,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Users,
        Collection::Accounts,
        Collection::Goals,
        Collection::Tags,
        Collection::Transactions,
    ];

    /// Canonical collection name, as stored.
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Users => "Users",
            Collection::Accounts => "Accounts",
            Collection::Goals => "Goals",
            Collection::Tags => "Tags",
            Collection::Transactions => "Transactions",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Collection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Collection::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| {
                Error::Database(DatabaseError::Internal(format!("Unknown collection '{}'", s)))
            })
    }
}

/// An untyped document: its id plus the JSON body as persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    pub id: String,
    pub body: Value,
}

impl RawDocument {
    pub fn new(id: impl Into<String>, body: Value) -> Self {
        Self {
            id: id.into(),
            body,
        }
    }
}

/// A batch of documents destined for one collection.
#[derive(Debug, Clone)]
pub struct CollectionBatch {
    pub collection: Collection,
    pub documents: Vec<RawDocument>,
}

/// A typed record that lives in exactly one collection.
pub trait Document: Serialize + DeserializeOwned {
    const COLLECTION: Collection;

    fn id(&self) -> &str;

    fn to_raw(&self) -> Result<RawDocument> {
        Ok(RawDocument::new(self.id(), serde_json::to_value(self)?))
    }

    fn from_raw(raw: RawDocument) -> Result<Self> {
        serde_json::from_value(raw.body).map_err(|e| {
            Error::Database(DatabaseError::MalformedDocument(format!(
                "{} '{}': {}",
                Self::COLLECTION,
                raw.id,
                e
            )))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_names_round_trip() {
        for collection in Collection::ALL {
            assert_eq!(collection.name().parse::<Collection>().unwrap(), collection);
        }
        assert!("Budgets".parse::<Collection>().is_err());
    }
}
