//! Transaction entity - One row of an owner's income/expense ledger.
//!
//! Each transaction has an `owner_id`, description, signed amount, category label,
//! calendar `date`, `created_at` timestamp (tiebreak for same-day rows) and a `kind`
//! tag. The sign of `amount` always agrees with `kind`: income is non-negative,
//! everything else is non-positive.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether a ledger row adds to or draws from the running balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Stored with a non-negative amount
    #[sea_orm(string_value = "income")]
    Income,
    /// Stored with a non-positive amount
    #[sea_orm(string_value = "expense")]
    Expense,
}

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner who recorded the transaction
    pub owner_id: String,
    /// Human-readable description of the transaction
    pub description: String,
    /// Signed amount (positive for income, negative for spending)
    pub amount: f64,
    /// Category label; `"income"` is the only income category
    pub category: String,
    /// Income or expense, derived from the category
    pub kind: TransactionKind,
    /// Calendar date of the transaction
    pub date: Date,
    /// When the row was written
    pub created_at: DateTime,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one owner
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
