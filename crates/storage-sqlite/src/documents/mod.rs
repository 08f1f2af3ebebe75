//! SQLite storage implementation for the document collections.

mod model;
mod repository;

pub use model::{DocumentDB, NewDocumentDB};
pub use repository::SqliteDocumentStore;
