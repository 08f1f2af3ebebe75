//! Database models for documents.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use goalsaver_core::documents::{Collection, RawDocument};
use goalsaver_core::errors::{DatabaseError, Error, Result};

/// One row of the `documents` table. The body is the JSON text of the record.
#[derive(Queryable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::documents)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DocumentDB {
    pub collection: String,
    pub id: String,
    pub body: String,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::documents)]
pub struct NewDocumentDB {
    pub collection: String,
    pub id: String,
    pub body: String,
}

impl NewDocumentDB {
    pub fn from_raw(collection: Collection, document: &RawDocument) -> Result<Self> {
        Ok(NewDocumentDB {
            collection: collection.name().to_string(),
            id: document.id.clone(),
            body: serde_json::to_string(&document.body)?,
        })
    }
}

impl TryFrom<DocumentDB> for RawDocument {
    type Error = Error;

    fn try_from(db: DocumentDB) -> Result<Self> {
        let body = serde_json::from_str(&db.body).map_err(|e| {
            Error::Database(DatabaseError::MalformedDocument(format!(
                "{} '{}': {}",
                db.collection, db.id, e
            )))
        })?;
        Ok(RawDocument::new(db.id, body))
    }
}
