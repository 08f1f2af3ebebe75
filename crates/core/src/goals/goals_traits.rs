use async_trait::async_trait;

use crate::errors::Result;
use crate::goals::goals_model::{Goal, NewGoal};

/// Trait for goal service operations
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    fn get_goals(&self) -> Result<Vec<Goal>>;
    fn get_goal(&self, goal_id: &str) -> Result<Goal>;
    fn get_goals_for_user(&self, user_id: &str) -> Result<Vec<Goal>>;
    async fn create_goal(&self, new_goal: NewGoal) -> Result<Goal>;
    /// Persists a full goal projection. Only the editable fields are taken from
    /// `goal`; balance, creation time and owner stay as stored.
    async fn update_goal(&self, goal_id: &str, goal: Goal) -> Result<Goal>;
}
