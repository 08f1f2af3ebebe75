use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;

use goalsaver_core::documents::{Collection, CollectionBatch, DocumentStoreTrait, RawDocument};
use goalsaver_core::{Error, Result};

use super::model::{DocumentDB, NewDocumentDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::documents;

/// Document store backed by the `documents` table.
///
/// Reads use pooled connections; every write goes through the writer actor,
/// so each call is one immediate transaction.
pub struct SqliteDocumentStore {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SqliteDocumentStore {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SqliteDocumentStore { pool, writer }
    }
}

fn insert_rows(
    conn: &mut SqliteConnection,
    collection: Collection,
    documents: &[RawDocument],
) -> Result<usize> {
    let rows = documents
        .iter()
        .map(|document| NewDocumentDB::from_raw(collection, document))
        .collect::<Result<Vec<_>>>()?;
    if rows.is_empty() {
        return Ok(0);
    }
    Ok(diesel::insert_into(documents::table)
        .values(&rows)
        .execute(conn)
        .map_err(StorageError::from)?)
}

fn update_row(conn: &mut SqliteConnection, row: &NewDocumentDB) -> Result<bool> {
    let affected = diesel::update(
        documents::table
            .filter(documents::collection.eq(&row.collection))
            .filter(documents::id.eq(&row.id)),
    )
    .set((
        documents::body.eq(&row.body),
        documents::updated_at.eq(chrono::Utc::now().naive_utc()),
    ))
    .execute(conn)
    .map_err(StorageError::from)?;
    Ok(affected > 0)
}

fn delete_collection(conn: &mut SqliteConnection, collection: Collection) -> Result<usize> {
    Ok(
        diesel::delete(documents::table.filter(documents::collection.eq(collection.name())))
            .execute(conn)
            .map_err(StorageError::from)?,
    )
}

#[async_trait]
impl DocumentStoreTrait for SqliteDocumentStore {
    fn find_by_id(&self, collection: Collection, id: &str) -> Result<Option<RawDocument>> {
        let mut conn = get_connection(&self.pool)?;
        documents::table
            .filter(documents::collection.eq(collection.name()))
            .filter(documents::id.eq(id))
            .select(DocumentDB::as_select())
            .first::<DocumentDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .map(RawDocument::try_from)
            .transpose()
    }

    fn list(&self, collection: Collection) -> Result<Vec<RawDocument>> {
        let mut conn = get_connection(&self.pool)?;
        documents::table
            .filter(documents::collection.eq(collection.name()))
            .order(documents::id.asc())
            .select(DocumentDB::as_select())
            .load::<DocumentDB>(&mut conn)
            .map_err(StorageError::from)?
            .into_iter()
            .map(RawDocument::try_from)
            .collect()
    }

    fn count(&self, collection: Collection) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;
        let count: i64 = documents::table
            .filter(documents::collection.eq(collection.name()))
            .count()
            .get_result(&mut conn)
            .map_err(StorageError::from)?;
        Ok(count.max(0) as usize)
    }

    async fn insert_many(
        &self,
        collection: Collection,
        documents: Vec<RawDocument>,
    ) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let inserted = insert_rows(conn, collection, &documents)?;
                debug!("Inserted {} document(s) into {}", inserted, collection);
                Ok(inserted)
            })
            .await
    }

    async fn replace_one(&self, collection: Collection, document: RawDocument) -> Result<bool> {
        let row = NewDocumentDB::from_raw(collection, &document)?;
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<bool> { update_row(conn, &row) })
            .await
    }

    async fn drop_collection(&self, collection: Collection) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let removed = delete_collection(conn, collection)?;
                debug!("Dropped {} ({} document(s))", collection, removed);
                Ok(())
            })
            .await
    }

    async fn insert_with_replacements(
        &self,
        inserts: CollectionBatch,
        replacements: CollectionBatch,
    ) -> Result<()> {
        let rows = replacements
            .documents
            .iter()
            .map(|document| NewDocumentDB::from_raw(replacements.collection, document))
            .collect::<Result<Vec<_>>>()?;
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                insert_rows(conn, inserts.collection, &inserts.documents)?;
                for row in &rows {
                    if !update_row(conn, row)? {
                        return Err(Error::NotFound(format!("{} '{}'", row.collection, row.id)));
                    }
                }
                Ok(())
            })
            .await
    }

    async fn reset_collections(&self, batches: Vec<CollectionBatch>) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let mut cleared = Vec::new();
                for batch in &batches {
                    if !cleared.contains(&batch.collection) {
                        delete_collection(conn, batch.collection)?;
                        cleared.push(batch.collection);
                    }
                }
                for batch in &batches {
                    insert_rows(conn, batch.collection, &batch.documents)?;
                }
                Ok(())
            })
            .await
    }
}
