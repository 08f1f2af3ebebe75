//! Accounts module - domain models.

mod accounts_model;

pub use accounts_model::{Account, AccountType};
