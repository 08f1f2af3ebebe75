//! In-memory document store, used by tests and the demo client.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use log::debug;
use serde_json::Value;

use super::documents_model::{Collection, CollectionBatch, RawDocument};
use super::documents_traits::DocumentStoreTrait;
use crate::errors::{DatabaseError, Error, Result};

type Collections = HashMap<Collection, BTreeMap<String, Value>>;

#[derive(Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<Collections>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Collections>> {
        self.collections
            .read()
            .map_err(|_| Error::Database(DatabaseError::Internal("store lock poisoned".into())))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Collections>> {
        self.collections
            .write()
            .map_err(|_| Error::Database(DatabaseError::Internal("store lock poisoned".into())))
    }
}

fn check_unique(
    existing: Option<&BTreeMap<String, Value>>,
    collection: Collection,
    documents: &[RawDocument],
) -> Result<()> {
    let mut seen = HashSet::new();
    for doc in documents {
        let duplicate = existing.is_some_and(|docs| docs.contains_key(&doc.id));
        if duplicate || !seen.insert(doc.id.as_str()) {
            return Err(Error::Database(DatabaseError::UniqueViolation(format!(
                "{}.id = {}",
                collection, doc.id
            ))));
        }
    }
    Ok(())
}

#[async_trait]
impl DocumentStoreTrait for InMemoryDocumentStore {
    fn find_by_id(&self, collection: Collection, id: &str) -> Result<Option<RawDocument>> {
        let collections = self.read()?;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.get(id))
            .map(|body| RawDocument::new(id, body.clone())))
    }

    fn list(&self, collection: Collection) -> Result<Vec<RawDocument>> {
        let collections = self.read()?;
        Ok(collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, body)| RawDocument::new(id.clone(), body.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn count(&self, collection: Collection) -> Result<usize> {
        Ok(self.read()?.get(&collection).map_or(0, BTreeMap::len))
    }

    async fn insert_many(
        &self,
        collection: Collection,
        documents: Vec<RawDocument>,
    ) -> Result<usize> {
        let mut collections = self.write()?;
        check_unique(collections.get(&collection), collection, &documents)?;
        let inserted = documents.len();
        let docs = collections.entry(collection).or_default();
        for doc in documents {
            docs.insert(doc.id, doc.body);
        }
        debug!("Inserted {} document(s) into {}", inserted, collection);
        Ok(inserted)
    }

    async fn replace_one(&self, collection: Collection, document: RawDocument) -> Result<bool> {
        let mut collections = self.write()?;
        match collections
            .get_mut(&collection)
            .and_then(|docs| docs.get_mut(&document.id))
        {
            Some(body) => {
                *body = document.body;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn drop_collection(&self, collection: Collection) -> Result<()> {
        self.write()?.remove(&collection);
        Ok(())
    }

    async fn insert_with_replacements(
        &self,
        inserts: CollectionBatch,
        replacements: CollectionBatch,
    ) -> Result<()> {
        let mut collections = self.write()?;
        check_unique(
            collections.get(&inserts.collection),
            inserts.collection,
            &inserts.documents,
        )?;
        let existing = collections.get(&replacements.collection);
        if let Some(missing) = replacements
            .documents
            .iter()
            .find(|doc| !existing.is_some_and(|docs| docs.contains_key(&doc.id)))
        {
            return Err(Error::NotFound(format!(
                "{} '{}'",
                replacements.collection, missing.id
            )));
        }

        let docs = collections.entry(inserts.collection).or_default();
        for doc in inserts.documents {
            docs.insert(doc.id, doc.body);
        }
        let docs = collections.entry(replacements.collection).or_default();
        for doc in replacements.documents {
            docs.insert(doc.id, doc.body);
        }
        Ok(())
    }

    async fn reset_collections(&self, batches: Vec<CollectionBatch>) -> Result<()> {
        // Build the replacement collections first so a bad batch leaves the store untouched.
        let mut staged: Collections = HashMap::new();
        for batch in &batches {
            staged.entry(batch.collection).or_default();
        }
        for batch in batches {
            let docs = staged.entry(batch.collection).or_default();
            check_unique(Some(&*docs), batch.collection, &batch.documents)?;
            for doc in batch.documents {
                docs.insert(doc.id, doc.body);
            }
        }

        let mut collections = self.write()?;
        for (collection, docs) in staged {
            collections.insert(collection, docs);
        }
        Ok(())
    }
}
