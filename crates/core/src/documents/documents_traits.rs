use async_trait::async_trait;

use super::documents_model::{Collection, CollectionBatch, RawDocument};
use crate::errors::Result;

/// Trait for document store operations.
///
/// Reads are synchronous; writes are async so implementations can funnel them
/// through a single writer.
#[async_trait]
pub trait DocumentStoreTrait: Send + Sync {
    fn find_by_id(&self, collection: Collection, id: &str) -> Result<Option<RawDocument>>;

    /// All documents of a collection, ordered by id.
    fn list(&self, collection: Collection) -> Result<Vec<RawDocument>>;

    fn count(&self, collection: Collection) -> Result<usize>;

    /// Inserts every document or none. Fails with `UniqueViolation` when an id
    /// is already present (or repeated within the batch).
    async fn insert_many(&self, collection: Collection, documents: Vec<RawDocument>)
        -> Result<usize>;

    /// Replaces the body of an existing document. Returns `false` when absent.
    async fn replace_one(&self, collection: Collection, document: RawDocument) -> Result<bool>;

    async fn drop_collection(&self, collection: Collection) -> Result<()>;

    /// Inserts `inserts` and replaces every document of `replacements` as one
    /// write. Fails with `NotFound` when a replacement target is absent, and
    /// then nothing is written.
    async fn insert_with_replacements(
        &self,
        inserts: CollectionBatch,
        replacements: CollectionBatch,
    ) -> Result<()>;

    /// Drops every collection named in `batches` and inserts the batches in order,
    /// as one transaction.
    async fn reset_collections(&self, batches: Vec<CollectionBatch>) -> Result<()>;
}
