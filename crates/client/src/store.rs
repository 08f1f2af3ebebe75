//! Client-side goal cache shared by editors and background sync tasks.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use goalsaver_core::goals::Goal;
use tokio::sync::watch;

/// Remote write status of one goal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncState {
    /// Writes dispatched but not yet answered.
    pub in_flight: usize,
    /// Message of the most recent failed write, cleared by the next success.
    pub last_error: Option<String>,
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl SyncState {
    pub fn is_syncing(&self) -> bool {
        self.in_flight > 0
    }

    pub fn has_failed(&self) -> bool {
        self.last_error.is_some()
    }
}

#[derive(Default)]
struct StoreState {
    goals: BTreeMap<String, Goal>,
    sync: HashMap<String, SyncState>,
}

/// Table of goals keyed by id.
///
/// Cloning yields another handle onto the same table. Every upsert bumps a
/// revision counter that can be watched with [`GoalStore::subscribe`].
#[derive(Clone)]
pub struct GoalStore {
    state: Arc<RwLock<StoreState>>,
    revision: Arc<watch::Sender<u64>>,
}

impl Default for GoalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GoalStore {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        GoalStore {
            state: Arc::new(RwLock::new(StoreState::default())),
            revision: Arc::new(revision),
        }
    }

    // Handlers never panic while holding the lock, but a poisoned table is
    // still readable.
    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn bump(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }

    pub fn select_goal_by_id(&self, goal_id: &str) -> Option<Goal> {
        self.read().goals.get(goal_id).cloned()
    }

    /// Inserts or replaces the goal with the same id.
    pub fn upsert_goal(&self, goal: Goal) {
        self.write().goals.insert(goal.id.clone(), goal);
        self.bump();
    }

    pub fn upsert_goals(&self, goals: impl IntoIterator<Item = Goal>) {
        {
            let mut state = self.write();
            for goal in goals {
                state.goals.insert(goal.id.clone(), goal);
            }
        }
        self.bump();
    }

    /// All cached goals, ordered by id.
    pub fn goals(&self) -> Vec<Goal> {
        self.read().goals.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read().goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Receiver that is notified after every change to the table.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn sync_state(&self, goal_id: &str) -> SyncState {
        self.read().sync.get(goal_id).cloned().unwrap_or_default()
    }

    pub(crate) fn mark_in_flight(&self, goal_id: &str) {
        self.write()
            .sync
            .entry(goal_id.to_string())
            .or_default()
            .in_flight += 1;
    }

    pub(crate) fn record_sync_success(&self, goal_id: &str) {
        let mut state = self.write();
        let sync = state.sync.entry(goal_id.to_string()).or_default();
        sync.in_flight = sync.in_flight.saturating_sub(1);
        sync.last_error = None;
        sync.last_synced_at = Some(Utc::now());
    }

    pub(crate) fn record_sync_failure(&self, goal_id: &str, error: String) {
        let mut state = self.write();
        let sync = state.sync.entry(goal_id.to_string()).or_default();
        sync.in_flight = sync.in_flight.saturating_sub(1);
        sync.last_error = Some(error);
    }
}
