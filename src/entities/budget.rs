//! Budget entity - A spending limit on one category for a recurring period.
//!
//! At most one budget exists per `(owner_id, category)`; the unique index is created
//! alongside the table in [`crate::config::database::create_tables`]. The amount
//! spent so far is never stored, it is derived from the ledger on every read.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Recurrence window that scopes "spend to date" for a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Resets at midnight every day
    #[sea_orm(string_value = "daily")]
    Daily,
    /// Resets at midnight on Monday
    #[sea_orm(string_value = "weekly")]
    Weekly,
    /// Resets on the first day of the month
    #[sea_orm(string_value = "monthly")]
    Monthly,
    /// Resets on January 1st
    #[sea_orm(string_value = "yearly")]
    Yearly,
    /// Any label not listed above; the period starts "now"
    #[sea_orm(string_value = "unrecognized")]
    Unrecognized,
}

impl Period {
    /// Maps a user supplied label onto a period. Unknown labels are kept as
    /// [`Period::Unrecognized`] rather than rejected.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "daily" => Self::Daily,
            "weekly" => Self::Weekly,
            "monthly" => Self::Monthly,
            "yearly" => Self::Yearly,
            _ => Self::Unrecognized,
        }
    }
}

/// Budget database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    /// Unique identifier for the budget
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the budget
    pub owner_id: String,
    /// Category the limit applies to; immutable after creation
    pub category: String,
    /// Spending limit per period
    pub amount: f64,
    /// Recurrence period
    pub period: Period,
    /// When the budget was created
    pub created_at: DateTime,
    /// When the budget was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between Budget and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each budget belongs to one owner
    #[sea_orm(
        belongs_to = "super::owner::Entity",
        from = "Column::OwnerId",
        to = "super::owner::Column::Id"
    )]
    Owner,
}

impl Related<super::owner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
