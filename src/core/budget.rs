//! Budget business logic - budget CRUD and spend-to-date evaluation.
//!
//! Budgets are keyed by `(owner, category)`. Their spend is never stored: every call
//! to [`evaluate_budgets`] recomputes it from the ledger for the current period and
//! notifies the owner about each budget found over its limit.

use crate::{
    core::{
        clock::Clock,
        notification::{self, NotificationPolicy, Overage},
        owner::require_owner,
        period::{first_date_on_or_after, start_of_period},
        transaction::find_category_transactions_since,
    },
    entities::{Budget, Period, budget},
    errors::{Error, Result},
};
use chrono::NaiveDateTime;
use sea_orm::{QueryOrder, Set, SqlErr, prelude::*};
use serde::Serialize;
use tracing::{debug, instrument};

/// Input for [`create_budget`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudget {
    pub owner_id: String,
    pub category: String,
    /// Spending limit per period, must be positive
    pub amount: f64,
    pub period: Period,
}

/// The mutable fields of a budget. The category cannot change after creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetUpdate {
    pub amount: f64,
    pub period: Period,
}

/// A budget together with its derived spend for the current period.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetView {
    #[serde(flatten)]
    pub budget: budget::Model,
    /// Sum of absolute amounts in the budget's category since `period_start`
    pub spent: f64,
    pub period_start: NaiveDateTime,
    /// `spent > budget.amount`
    pub exceeded: bool,
}

fn validate_limit(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::invalid_input(format!(
            "Budget amount must be a positive number, got {amount}"
        )));
    }
    Ok(())
}

/// Sums the absolute amounts of `amounts`.
///
/// The sign is ignored on purpose: only the category decides what counts
/// towards a budget.
pub fn total_spent(amounts: impl IntoIterator<Item = f64>) -> f64 {
    amounts.into_iter().map(f64::abs).sum()
}

/// Finds the owner's budget for `category`, if any.
pub async fn get_budget_by_category<C>(
    db: &C,
    owner_id: &str,
    category: &str,
) -> Result<Option<budget::Model>>
where
    C: ConnectionTrait,
{
    Budget::find()
        .filter(budget::Column::OwnerId.eq(owner_id))
        .filter(budget::Column::Category.eq(category))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists every budget belonging to `owner_id`, alphabetically by category.
pub async fn get_budgets_for_owner<C>(db: &C, owner_id: &str) -> Result<Vec<budget::Model>>
where
    C: ConnectionTrait,
{
    Budget::find()
        .filter(budget::Column::OwnerId.eq(owner_id))
        .order_by_asc(budget::Column::Category)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a budget for a category the owner has no budget for yet.
///
/// # Errors
/// * [`Error::InvalidInput`] - empty category or non-positive amount
/// * [`Error::NotFound`] - the owner does not exist
/// * [`Error::DuplicateCategory`] - the owner already budgets this category
pub async fn create_budget<C>(db: &C, clock: &impl Clock, new: NewBudget) -> Result<budget::Model>
where
    C: ConnectionTrait,
{
    let category = new.category.trim().to_string();
    if category.is_empty() {
        return Err(Error::invalid_input("Budget category cannot be empty"));
    }
    validate_limit(new.amount)?;
    require_owner(db, &new.owner_id).await?;

    if get_budget_by_category(db, &new.owner_id, &category)
        .await?
        .is_some()
    {
        return Err(Error::DuplicateCategory { category });
    }

    let now = clock.now();
    let model = budget::ActiveModel {
        owner_id: Set(new.owner_id),
        category: Set(category.clone()),
        amount: Set(new.amount),
        period: Set(new.period),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    // The unique index catches a concurrent create that slipped past the check above
    model.insert(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => Error::DuplicateCategory { category },
        _ => e.into(),
    })
}

async fn find_owned_budget<C>(db: &C, owner_id: &str, budget_id: i64) -> Result<budget::Model>
where
    C: ConnectionTrait,
{
    let existing = Budget::find_by_id(budget_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "budget",
            id: budget_id.to_string(),
        })?;

    if existing.owner_id != owner_id {
        return Err(Error::Unauthorized {
            entity: "budget",
            id: budget_id.to_string(),
            owner_id: owner_id.to_string(),
        });
    }

    Ok(existing)
}

/// Changes a budget's limit and period and re-stamps `updated_at`.
///
/// # Errors
/// * [`Error::InvalidInput`] - non-positive amount
/// * [`Error::NotFound`] - no budget with this id
/// * [`Error::Unauthorized`] - the budget belongs to another owner
pub async fn update_budget<C>(
    db: &C,
    clock: &impl Clock,
    owner_id: &str,
    budget_id: i64,
    update: BudgetUpdate,
) -> Result<budget::Model>
where
    C: ConnectionTrait,
{
    validate_limit(update.amount)?;
    let existing = find_owned_budget(db, owner_id, budget_id).await?;

    let mut active_model: budget::ActiveModel = existing.into();
    active_model.amount = Set(update.amount);
    active_model.period = Set(update.period);
    active_model.updated_at = Set(clock.now());
    active_model.update(db).await.map_err(Into::into)
}

/// Deletes one of the owner's budgets.
///
/// # Errors
/// * [`Error::NotFound`] - no budget with this id
/// * [`Error::Unauthorized`] - the budget belongs to another owner
pub async fn delete_budget<C>(db: &C, owner_id: &str, budget_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let existing = find_owned_budget(db, owner_id, budget_id).await?;
    existing.delete(db).await?;
    Ok(())
}

/// Computes spend-to-date for one budget and notifies if it is exceeded.
async fn evaluate_budget<C>(
    db: &C,
    clock: &impl Clock,
    budget: budget::Model,
    policy: NotificationPolicy,
) -> Result<BudgetView>
where
    C: ConnectionTrait,
{
    let period_start = start_of_period(budget.period, clock.now());
    let matched = find_category_transactions_since(
        db,
        &budget.owner_id,
        &budget.category,
        first_date_on_or_after(period_start),
    )
    .await?;
    let spent = total_spent(matched.iter().map(|t| t.amount));
    let exceeded = spent > budget.amount;

    debug!(
        budget_id = budget.id,
        category = %budget.category,
        spent,
        limit = budget.amount,
        "Budget evaluated"
    );

    if exceeded {
        let overage = Overage {
            owner_id: &budget.owner_id,
            category: &budget.category,
            spent,
            limit: budget.amount,
            period_start,
        };
        notification::emit_overage(db, clock, &overage, policy).await?;
    }

    Ok(BudgetView {
        budget,
        spent,
        period_start,
        exceeded,
    })
}

/// Evaluates every budget of `owner_id` against the current period.
///
/// Each exceeded budget emits a notification according to `policy`; with
/// [`NotificationPolicy::Always`] that happens on every call.
#[instrument(skip(db, clock))]
pub async fn evaluate_budgets<C>(
    db: &C,
    clock: &impl Clock,
    owner_id: &str,
    policy: NotificationPolicy,
) -> Result<Vec<BudgetView>>
where
    C: ConnectionTrait,
{
    let budgets = get_budgets_for_owner(db, owner_id).await?;
    let mut views = Vec::with_capacity(budgets.len());
    for budget in budgets {
        views.push(evaluate_budget(db, clock, budget, policy).await?);
    }
    Ok(views)
}
