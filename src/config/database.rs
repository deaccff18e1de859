//! Database configuration module.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs. The one constraint the entities cannot
//! express, a composite unique index on `budgets(owner_id, category)`, is added here.

use crate::entities::{Budget, Goal, Notification, Owner, OwnerSettings, Transaction, budget};
use crate::errors::Result;
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{debug, info, instrument};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/finance_tracker.sqlite?mode=rwc";

/// Resolves the database URL.
///
/// `DATABASE_URL` in the environment wins, then the value from `config.toml`,
/// then a local `SQLite` file.
#[must_use]
pub fn get_database_url(configured: Option<&str>) -> String {
    std::env::var("DATABASE_URL")
        .ok()
        .or_else(|| configured.map(str::to_string))
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database at `database_url`.
#[instrument]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database");
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all tables, plus the budget uniqueness index, if they do not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    // Owners first so the foreign keys of the other tables resolve.
    let tables = [
        schema.create_table_from_entity(Owner).if_not_exists().to_owned(),
        schema.create_table_from_entity(Transaction).if_not_exists().to_owned(),
        schema.create_table_from_entity(Budget).if_not_exists().to_owned(),
        schema.create_table_from_entity(Notification).if_not_exists().to_owned(),
        schema.create_table_from_entity(Goal).if_not_exists().to_owned(),
        schema.create_table_from_entity(OwnerSettings).if_not_exists().to_owned(),
    ];

    for table in &tables {
        db.execute(builder.build(table)).await?;
    }

    let budget_category_index = Index::create()
        .name("idx_budgets_owner_category")
        .table(Budget)
        .col(budget::Column::OwnerId)
        .col(budget::Column::Category)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&budget_category_index)).await?;

    info!("Database tables ensured.");
    Ok(())
}
