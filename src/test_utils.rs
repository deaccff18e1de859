//! Shared test utilities for the finance tracker.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        budget::{self, NewBudget},
        owner,
        transaction::{self, NewTransaction},
    },
    entities::{self, Period},
    errors::Result,
};
use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::DatabaseConnection;

pub use crate::core::clock::{Clock, FixedClock};

/// Owner id used by [`setup_with_owner`] and the `create_test_*` helpers.
pub const TEST_OWNER: &str = "test-owner";

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Routes `tracing` output through the test harness so it shows up on failure.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

/// Saturday 2024-06-15 12:00, the "now" of most tests.
#[must_use]
pub fn test_clock() -> FixedClock {
    FixedClock(at(2024, 6, 15, 12, 0))
}

#[must_use]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[must_use]
pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    date(year, month, day).and_hms_opt(hour, minute, 0).unwrap()
}

/// Creates an owner with the given id and a zero balance.
pub async fn create_owner_with_id(
    db: &DatabaseConnection,
    owner_id: &str,
) -> Result<entities::owner::Model> {
    owner::create_owner(db, &test_clock(), owner_id, "Test Owner").await
}

/// Creates a database with [`TEST_OWNER`] already in it.
pub async fn setup_with_owner() -> Result<(DatabaseConnection, entities::owner::Model)> {
    let db = setup_test_db().await?;
    let owner = create_owner_with_id(&db, TEST_OWNER).await?;
    Ok((db, owner))
}

/// Records a transaction for [`TEST_OWNER`] with sensible defaults.
///
/// # Defaults
/// * description: "Test transaction"
/// * written at [`test_clock`]
pub async fn create_test_transaction(
    db: &DatabaseConnection,
    category: &str,
    amount: f64,
    date: NaiveDate,
) -> Result<entities::transaction::Model> {
    create_test_transaction_at(db, category, amount, date, test_clock().now()).await
}

/// Like [`create_test_transaction`] but with an explicit write time, for
/// ordering tests.
pub async fn create_test_transaction_at(
    db: &DatabaseConnection,
    category: &str,
    amount: f64,
    date: NaiveDate,
    created_at: NaiveDateTime,
) -> Result<entities::transaction::Model> {
    let new = NewTransaction {
        owner_id: TEST_OWNER.to_string(),
        description: "Test transaction".to_string(),
        amount,
        category: category.to_string(),
        date,
    };
    transaction::create_transaction(db, &FixedClock(created_at), new).await
}

/// Records a transaction for an arbitrary owner.
pub async fn create_custom_transaction(
    db: &DatabaseConnection,
    owner_id: &str,
    category: &str,
    amount: f64,
    date: NaiveDate,
) -> Result<entities::transaction::Model> {
    let new = NewTransaction {
        owner_id: owner_id.to_string(),
        description: "Test transaction".to_string(),
        amount,
        category: category.to_string(),
        date,
    };
    transaction::create_transaction(db, &test_clock(), new).await
}

/// Creates a budget for [`TEST_OWNER`].
pub async fn create_test_budget(
    db: &DatabaseConnection,
    category: &str,
    amount: f64,
    period: Period,
) -> Result<entities::budget::Model> {
    let new = NewBudget {
        owner_id: TEST_OWNER.to_string(),
        category: category.to_string(),
        amount,
        period,
    };
    budget::create_budget(db, &test_clock(), new).await
}
