//! Goalsaver client - the goal editor and the state it writes through.
//!
//! ```text
//!   GoalEditor ──(sync upsert)──▶ GoalStore ◀── GoalSyncer ──(async)──▶ GoalApiTrait
//!        └──────────(dispatch projection)──────────┘                    (HttpGoalApi)
//! ```
//!
//! Every field commit is applied to the [`GoalStore`] before the remote write is
//! spawned, so readers of the store never wait on the network.

pub mod api;
pub mod editor;
pub mod store;
pub mod sync;

pub use api::{GoalApiTrait, HttpGoalApi};
pub use editor::{EditBuffer, GoalEditor};
pub use store::{GoalStore, SyncState};
pub use sync::{GoalSyncer, SyncOutcome};
