//! Owner business logic - owner records and the running balance.
//!
//! The running balance is the authoritative "current balance" shown on the
//! dashboard. It is only ever changed through [`increment_balance_atomic`].

use crate::{
    core::clock::Clock,
    entities::{Owner, owner},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*, sea_query::Expr};
use tracing::debug;

/// Creates an owner with a zero running balance.
pub async fn create_owner<C>(
    db: &C,
    clock: &impl Clock,
    owner_id: &str,
    name: &str,
) -> Result<owner::Model>
where
    C: ConnectionTrait,
{
    if owner_id.trim().is_empty() {
        return Err(Error::invalid_input("Owner id cannot be empty"));
    }

    let owner = owner::ActiveModel {
        id: Set(owner_id.to_string()),
        name: Set(name.trim().to_string()),
        total_balance: Set(0.0),
        created_at: Set(clock.now()),
    };

    owner.insert(db).await.map_err(Into::into)
}

/// Finds an owner by id, returning None if it does not exist.
pub async fn get_owner<C>(db: &C, owner_id: &str) -> Result<Option<owner::Model>>
where
    C: ConnectionTrait,
{
    Owner::find_by_id(owner_id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an owner by id, failing with [`Error::NotFound`] if it does not exist.
pub async fn require_owner<C>(db: &C, owner_id: &str) -> Result<owner::Model>
where
    C: ConnectionTrait,
{
    get_owner(db, owner_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "owner",
            id: owner_id.to_string(),
        })
}

/// Adds `amount_delta` to the owner's running balance in a single statement.
///
/// `UPDATE owners SET total_balance = total_balance + ? WHERE id = ?` never loses an
/// update to a concurrent writer, unlike reading the balance and writing it back.
///
/// # Errors
/// Returns [`Error::NotFound`] if no owner row matched.
pub async fn increment_balance_atomic<C>(db: &C, owner_id: &str, amount_delta: f64) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = Owner::update_many()
        .col_expr(
            owner::Column::TotalBalance,
            Expr::col(owner::Column::TotalBalance).add(amount_delta),
        )
        .filter(owner::Column::Id.eq(owner_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "owner",
            id: owner_id.to_string(),
        });
    }

    debug!(owner_id, amount_delta, "Running balance adjusted");
    Ok(())
}
