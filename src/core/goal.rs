//! Savings goal business logic.
//!
//! Goals are plain records with a target and a deadline; progress is derived on
//! read the same way for every caller.

use crate::{
    core::{clock::Clock, owner::require_owner},
    entities::{Goal, goal},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Serialize;

/// Input for [`create_goal`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewGoal {
    pub owner_id: String,
    pub name: String,
    pub target_amount: f64,
    /// Amount already saved; defaults to zero when the caller has none
    pub current_amount: Option<f64>,
    pub deadline: NaiveDate,
}

/// A goal together with its completion percentage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalView {
    #[serde(flatten)]
    pub goal: goal::Model,
    pub progress_percent: f64,
}

/// Calculates how much of `target` has been saved, as a percentage.
///
/// Values above 100 mean the goal was overshot. A zero target reports 0.
#[must_use]
pub fn calculate_progress(current: f64, target: f64) -> f64 {
    if target == 0.0 {
        return 0.0;
    }

    (current / target) * 100.0
}

/// Creates a savings goal.
///
/// # Errors
/// * [`Error::InvalidInput`] - empty name, non-positive target or negative current amount
/// * [`Error::NotFound`] - the owner does not exist
pub async fn create_goal<C>(db: &C, clock: &impl Clock, new: NewGoal) -> Result<goal::Model>
where
    C: ConnectionTrait,
{
    let name = new.name.trim().to_string();
    if name.is_empty() {
        return Err(Error::invalid_input("Goal name cannot be empty"));
    }

    if !new.target_amount.is_finite() || new.target_amount <= 0.0 {
        return Err(Error::invalid_input(format!(
            "Goal target must be a positive number, got {}",
            new.target_amount
        )));
    }

    let current_amount = new.current_amount.unwrap_or(0.0);
    if !current_amount.is_finite() || current_amount < 0.0 {
        return Err(Error::invalid_input(format!(
            "Goal current amount cannot be negative, got {current_amount}"
        )));
    }

    require_owner(db, &new.owner_id).await?;

    let now = clock.now();
    let model = goal::ActiveModel {
        owner_id: Set(new.owner_id),
        name: Set(name),
        target_amount: Set(new.target_amount),
        current_amount: Set(current_amount),
        deadline: Set(new.deadline),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    model.insert(db).await.map_err(Into::into)
}

/// Lists the owner's goals, nearest deadline first, with progress attached.
pub async fn list_goals<C>(db: &C, owner_id: &str) -> Result<Vec<GoalView>>
where
    C: ConnectionTrait,
{
    let goals = Goal::find()
        .filter(goal::Column::OwnerId.eq(owner_id))
        .order_by_asc(goal::Column::Deadline)
        .order_by_asc(goal::Column::Id)
        .all(db)
        .await?;

    Ok(goals
        .into_iter()
        .map(|goal| GoalView {
            progress_percent: calculate_progress(goal.current_amount, goal.target_amount),
            goal,
        })
        .collect())
}
