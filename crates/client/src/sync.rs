//! Fire-and-forget remote writes for goal projections.

use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, warn};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use goalsaver_core::errors::{Error, Result};
use goalsaver_core::goals::Goal;

use crate::api::GoalApiTrait;
use crate::store::GoalStore;

/// Result of one dispatched write.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    Synced { goal_id: String, goal: Goal },
    Failed { goal_id: String, error: String },
}

impl SyncOutcome {
    pub fn goal_id(&self) -> &str {
        match self {
            SyncOutcome::Synced { goal_id, .. } | SyncOutcome::Failed { goal_id, .. } => goal_id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SyncOutcome::Synced { .. })
    }
}

/// Sends goal projections to the API on the runtime it was created in.
///
/// Writes are independent: nothing is cancelled or reordered, so two writes
/// for the same goal may land in either order. The optimistic value in the
/// store is never overwritten by a write's response.
#[derive(Clone)]
pub struct GoalSyncer {
    api: Arc<dyn GoalApiTrait>,
    store: GoalStore,
    runtime: Handle,
    outcomes_tx: mpsc::UnboundedSender<SyncOutcome>,
    outcomes_rx: Arc<Mutex<Option<mpsc::UnboundedReceiver<SyncOutcome>>>>,
}

impl GoalSyncer {
    /// Must be called from within a Tokio runtime.
    pub fn new(api: Arc<dyn GoalApiTrait>, store: GoalStore) -> Result<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| Error::Sync(format!("No Tokio runtime to run goal writes on: {}", e)))?;
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        Ok(Self {
            api,
            store,
            runtime,
            outcomes_tx,
            outcomes_rx: Arc::new(Mutex::new(Some(outcomes_rx))),
        })
    }

    pub fn store(&self) -> &GoalStore {
        &self.store
    }

    /// Receiver of every write's outcome. Only the first call gets it.
    pub fn outcomes(&self) -> Option<mpsc::UnboundedReceiver<SyncOutcome>> {
        self.outcomes_rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Spawns the remote write of `goal` and returns immediately.
    pub fn dispatch(&self, goal: Goal) -> JoinHandle<()> {
        self.store.mark_in_flight(&goal.id);
        let api = self.api.clone();
        let store = self.store.clone();
        let outcomes = self.outcomes_tx.clone();

        self.runtime.spawn(async move {
            let goal_id = goal.id.clone();
            let outcome = match api.update_goal(&goal_id, &goal).await {
                Ok(saved) => {
                    debug!("Goal {} synced", goal_id);
                    store.record_sync_success(&goal_id);
                    SyncOutcome::Synced {
                        goal_id,
                        goal: saved,
                    }
                }
                Err(e) => {
                    warn!("Failed to sync goal {}: {}", goal_id, e);
                    store.record_sync_failure(&goal_id, e.to_string());
                    SyncOutcome::Failed {
                        goal_id,
                        error: e.to_string(),
                    }
                }
            };
            // Nobody listening is fine; the store already has the status.
            let _ = outcomes.send(outcome);
        })
    }

    /// Re-sends the cached projection of `goal_id`.
    pub fn retry(&self, goal_id: &str) -> Result<JoinHandle<()>> {
        let goal = self
            .store
            .select_goal_by_id(goal_id)
            .ok_or_else(|| Error::NotFound(format!("Goal '{}' is not cached", goal_id)))?;
        Ok(self.dispatch(goal))
    }

    /// Fills the store from the API. Returns the number of goals loaded.
    pub async fn load_all(&self) -> Result<usize> {
        let goals = self.api.get_goals().await?;
        let loaded = goals.len();
        self.store.upsert_goals(goals);
        debug!("Loaded {} goal(s)", loaded);
        Ok(loaded)
    }
}
