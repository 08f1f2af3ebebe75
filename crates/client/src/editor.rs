//! The goal editor: a local edit buffer over one goal, written through to the
//! shared [`GoalStore`] on every commit.

use chrono::{DateTime, Utc};
use log::debug;
use rust_decimal::Decimal;
use tokio::task::JoinHandle;

use goalsaver_core::errors::{Result, ValidationError};
use goalsaver_core::goals::Goal;
use goalsaver_core::Amount;

use crate::store::GoalStore;
use crate::sync::GoalSyncer;

/// Per-field edit values. `None` means the field falls back to the baseline.
///
/// `icon` is `Some(None)` when the goal is known to have no icon, which
/// overrides a baseline glyph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditBuffer {
    pub name: Option<String>,
    pub target_date: Option<DateTime<Utc>>,
    pub target_amount: Option<Amount>,
    pub icon: Option<Option<String>>,
}

impl EditBuffer {
    fn from_baseline(goal: &Goal) -> Self {
        EditBuffer {
            name: Some(goal.name.clone()),
            target_date: goal.target_date,
            target_amount: Some(goal.target_amount),
            icon: Some(goal.icon.clone()),
        }
    }
}

enum FieldChange {
    Name(String),
    TargetAmount(Amount),
    TargetDate(DateTime<Utc>),
    Icon(String),
}

impl FieldChange {
    fn apply(self, edit: &mut EditBuffer) {
        match self {
            FieldChange::Name(name) => edit.name = Some(name),
            FieldChange::TargetAmount(amount) => edit.target_amount = Some(amount),
            FieldChange::TargetDate(date) => edit.target_date = Some(date),
            FieldChange::Icon(icon) => edit.icon = Some(Some(icon)),
        }
    }
}

/// Editor bound to one goal at a time.
///
/// Commits update the buffer, write the merged projection into the store
/// synchronously, then hand the projection to the syncer without waiting.
/// Only `name` and `icon` follow changes other writers make to the cached goal.
pub struct GoalEditor {
    store: GoalStore,
    syncer: GoalSyncer,
    baseline: Goal,
    edit: EditBuffer,
    // Cached name/icon as last seen, to tell external changes from our own.
    observed_name: Option<String>,
    observed_icon: Option<Option<String>>,
    icon_picker_open: bool,
}

impl GoalEditor {
    pub fn mount(baseline: Goal, store: GoalStore, syncer: GoalSyncer) -> Self {
        let mut editor = GoalEditor {
            store,
            syncer,
            edit: EditBuffer::default(),
            baseline,
            observed_name: None,
            observed_icon: None,
            icon_picker_open: false,
        };
        editor.reset_from_baseline();
        editor
    }

    fn reset_from_baseline(&mut self) {
        self.edit = EditBuffer::from_baseline(&self.baseline);
        let cached = self.store.select_goal_by_id(&self.baseline.id);
        self.observed_name = cached.as_ref().map(|goal| goal.name.clone());
        self.observed_icon = cached.map(|goal| goal.icon);
    }

    /// Supplies a new authoritative goal. The edit buffer is reset only when
    /// the goal's id differs from the current one.
    pub fn set_baseline(&mut self, baseline: Goal) {
        let rebound = baseline.id != self.baseline.id;
        self.baseline = baseline;
        if rebound {
            debug!("Editor rebound to goal {}", self.baseline.id);
            self.icon_picker_open = false;
            self.reset_from_baseline();
        }
    }

    /// Pulls external changes of the cached name and icon into the buffer.
    /// Returns `true` when the buffer changed.
    pub fn reconcile_with_store(&mut self) -> bool {
        let Some(cached) = self.store.select_goal_by_id(&self.baseline.id) else {
            return false;
        };

        let mut changed = false;
        if self.observed_name.as_deref() != Some(cached.name.as_str()) {
            self.edit.name = Some(cached.name.clone());
            self.observed_name = Some(cached.name);
            changed = true;
        }
        if self.observed_icon.as_ref() != Some(&cached.icon) {
            self.edit.icon = Some(cached.icon.clone());
            self.observed_icon = Some(cached.icon);
            changed = true;
        }
        changed
    }

    pub fn commit_name(&mut self, name: impl Into<String>) -> JoinHandle<()> {
        self.commit(FieldChange::Name(name.into()))
    }

    pub fn commit_target_amount(&mut self, amount: Amount) -> JoinHandle<()> {
        self.commit(FieldChange::TargetAmount(amount))
    }

    /// Parses raw user input first; invalid input leaves every piece of state untouched.
    pub fn commit_target_amount_input(&mut self, input: &str) -> Result<JoinHandle<()>> {
        let amount = Amount::parse(input)?;
        Ok(self.commit_target_amount(amount))
    }

    /// Clearing the date is not a commit; `None` is ignored.
    pub fn commit_target_date(&mut self, date: Option<DateTime<Utc>>) -> Option<JoinHandle<()>> {
        date.map(|date| self.commit(FieldChange::TargetDate(date)))
    }

    /// Commits the chosen glyph and closes the picker.
    pub fn pick_icon(&mut self, glyph: &str) -> Result<JoinHandle<()>> {
        let glyph = glyph.trim();
        if glyph.is_empty() {
            return Err(ValidationError::InvalidInput("icon must not be blank".to_string()).into());
        }
        self.icon_picker_open = false;
        Ok(self.commit(FieldChange::Icon(glyph.to_string())))
    }

    pub fn toggle_icon_picker(&mut self) -> bool {
        self.icon_picker_open = !self.icon_picker_open;
        self.icon_picker_open
    }

    pub fn close_icon_picker(&mut self) {
        self.icon_picker_open = false;
    }

    fn commit(&mut self, change: FieldChange) -> JoinHandle<()> {
        change.apply(&mut self.edit);
        let projection = self.projection();

        self.store.upsert_goal(projection.clone());
        self.observed_name = Some(projection.name.clone());
        self.observed_icon = Some(projection.icon.clone());

        self.syncer.dispatch(projection)
    }

    /// The baseline with every set edit field applied.
    pub fn projection(&self) -> Goal {
        let mut goal = self.baseline.clone();
        if let Some(name) = &self.edit.name {
            goal.name = name.clone();
        }
        if let Some(target_amount) = self.edit.target_amount {
            goal.target_amount = target_amount;
        }
        if let Some(target_date) = self.edit.target_date {
            goal.target_date = Some(target_date);
        }
        if let Some(icon) = &self.edit.icon {
            goal.icon = icon.clone();
        }
        goal
    }

    pub fn baseline(&self) -> &Goal {
        &self.baseline
    }

    pub fn edit_buffer(&self) -> &EditBuffer {
        &self.edit
    }

    pub fn goal_id(&self) -> &str {
        &self.baseline.id
    }

    pub fn name(&self) -> &str {
        self.edit.name.as_deref().unwrap_or(&self.baseline.name)
    }

    pub fn target_amount(&self) -> Amount {
        self.edit.target_amount.unwrap_or(self.baseline.target_amount)
    }

    pub fn target_date(&self) -> Option<DateTime<Utc>> {
        self.edit.target_date.or(self.baseline.target_date)
    }

    pub fn icon(&self) -> Option<&str> {
        match &self.edit.icon {
            Some(icon) => icon.as_deref(),
            None => self.baseline.icon.as_deref(),
        }
    }

    pub fn balance(&self) -> Decimal {
        self.baseline.balance
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.baseline.created
    }

    pub fn is_target_reached(&self) -> bool {
        self.balance() >= self.target_amount().value()
    }

    pub fn is_icon_picker_open(&self) -> bool {
        self.icon_picker_open
    }
}
