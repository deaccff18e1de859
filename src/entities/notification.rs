//! Notification entity - One-way alert written when a budget is exceeded.
//!
//! Notifications are append-only. `period_start` records which budget period the
//! overage belongs to so repeats can be suppressed when the policy asks for it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Notification database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    /// Unique identifier for the notification
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner the alert is addressed to
    pub owner_id: String,
    /// Budget category that was exceeded
    pub category: String,
    /// Free-text alert message
    pub message: String,
    /// Start of the budget period in which the overage was detected
    pub period_start: DateTime,
    /// When the notification was emitted
    pub created_at: DateTime,
    /// Whether the owner has acknowledged it
    pub is_read: bool,
}

/// Defines relationships between Notification and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each notification belongs to one owner
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
