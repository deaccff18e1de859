//! Goal entity - A savings target with a deadline.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Savings goal database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "goals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub owner_id: String,
    /// Name of the goal (e.g., "Emergency fund")
    pub name: String,
    pub target_amount: f64,
    /// Amount saved towards the target so far
    pub current_amount: f64,
    pub deadline: Date,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
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
