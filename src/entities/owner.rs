//! Owner entity - The authenticated user every other record belongs to.
//!
//! Only the running balance matters to this crate; credentials and sessions
//! live elsewhere.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Owner database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "owners")]
pub struct Model {
    /// Opaque owner identifier issued by the authentication layer
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Display name
    pub name: String,
    /// Running balance, incremented atomically on every ledger write
    pub total_balance: f64,
    /// When the owner record was created
    pub created_at: DateTime,
}

/// Defines relationships between Owner and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One owner has many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
    /// One owner has many budgets
    #[sea_orm(has_many = "super::budget::Entity")]
    Budgets,
    /// One owner has many notifications
    #[sea_orm(has_many = "super::notification::Entity")]
    Notifications,
    /// One owner has many savings goals
    #[sea_orm(has_many = "super::goal::Entity")]
    Goals,
    /// One owner has at most one settings row
    #[sea_orm(has_one = "super::owner_settings::Entity")]
    Settings,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::budget::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budgets.def()
    }
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notifications.def()
    }
}

impl Related<super::goal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Goals.def()
    }
}

impl Related<super::owner_settings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Settings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
