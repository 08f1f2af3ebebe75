//! Typed access on top of [`DocumentStoreTrait`].

use super::documents_model::Document;
use super::documents_traits::DocumentStoreTrait;
use crate::errors::Result;

pub fn find_document<T: Document>(store: &dyn DocumentStoreTrait, id: &str) -> Result<Option<T>> {
    store
        .find_by_id(T::COLLECTION, id)?
        .map(T::from_raw)
        .transpose()
}

pub fn list_documents<T: Document>(store: &dyn DocumentStoreTrait) -> Result<Vec<T>> {
    store
        .list(T::COLLECTION)?
        .into_iter()
        .map(T::from_raw)
        .collect()
}

pub async fn replace_document<T: Document + Sync>(
    store: &dyn DocumentStoreTrait,
    document: &T,
) -> Result<bool> {
    store.replace_one(T::COLLECTION, document.to_raw()?).await
}
