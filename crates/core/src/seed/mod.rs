//! Seed module - the embedded demo fixture and the first-boot bootstrap.

mod fixture;
mod seed_service;

pub use fixture::{SeedFixture, SeedSummary};
pub use seed_service::{SeedOutcome, SeedService};
