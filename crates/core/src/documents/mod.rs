//! Document store module - collections, raw documents, the store trait and
//! an in-memory implementation.

mod documents_model;
mod documents_traits;
mod memory;
mod typed;

pub use documents_model::{Collection, CollectionBatch, Document, RawDocument};
pub use documents_traits::DocumentStoreTrait;
pub use memory::InMemoryDocumentStore;
pub use typed::{find_document, list_documents, replace_document};
