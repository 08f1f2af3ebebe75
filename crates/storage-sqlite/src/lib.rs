//! SQLite storage implementation for Goalsaver.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the document store trait defined in `goalsaver-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The single-writer actor that serializes every write transaction
//! - The document table model and store implementation
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! `core` and `client` are database-agnostic and work with traits.
//!
//! ```text
//!        core (domain, seed)
//!               │
//!               ▼
//!     storage-sqlite (this crate)
//!               │
//!               ▼
//!           SQLite DB
//! ```

pub mod db;
pub mod documents;
pub mod errors;
pub mod schema;

pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};
pub use documents::SqliteDocumentStore;

pub use errors::{IntoCore, StorageError};

// Re-export from goalsaver-core for convenience
pub use goalsaver_core::errors::{DatabaseError, Error, Result};
