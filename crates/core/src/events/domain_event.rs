//! Domain event types.

use serde::{Deserialize, Serialize};

/// Domain events emitted by core services after successful mutations.
///
/// Runtime adapters translate them into platform-specific actions
/// (logging, pushing to connected clients, cache invalidation).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// Goals were created or updated.
    GoalsChanged { goal_ids: Vec<String> },

    /// The seed fixture replaced the five collections.
    SeedApplied {
        sentinel_user_id: String,
        fixture_version: u32,
        documents: usize,
    },
}

impl DomainEvent {
    /// Creates a GoalsChanged event.
    pub fn goals_changed(goal_ids: Vec<String>) -> Self {
        Self::GoalsChanged { goal_ids }
    }

    /// Creates a SeedApplied event.
    pub fn seed_applied(sentinel_user_id: String, fixture_version: u32, documents: usize) -> Self {
        Self::SeedApplied {
            sentinel_user_id,
            fixture_version,
            documents,
        }
    }
}
