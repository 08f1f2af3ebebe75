//! Goalsaver Core - Domain entities, services, and traits.
//!
//! This crate contains the core business logic for Goalsaver.
//! It is storage-agnostic and defines the document store trait that is
//! implemented by the `storage-sqlite` crate (and in memory, for tests and demos).

pub mod accounts;
pub mod amount;
pub mod constants;
pub mod documents;
pub mod errors;
pub mod events;
pub mod goals;
pub mod seed;
pub mod tags;
pub mod transactions;
pub mod users;

pub use amount::Amount;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
