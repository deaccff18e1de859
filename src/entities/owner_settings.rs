//! Owner settings entity - Display preferences and the notification preference.
//!
//! At most one row per owner, keyed by `owner_id`. Every field is optional: the
//! row only records what the owner chose.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether an overage that was already reported is reported again.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum NotificationPolicy {
    /// Notify on every evaluation that finds the budget exceeded
    #[default]
    #[sea_orm(string_value = "always")]
    Always,
    /// Notify at most once per owner, category and budget period.
    ///
    /// A [`Period::Unrecognized`](super::Period::Unrecognized) budget starts its
    /// period at the evaluation instant, so every evaluation is a new key and
    /// nothing is suppressed for it.
    #[sea_orm(string_value = "once_per_period")]
    OncePerPeriod,
}

/// Owner settings database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "owner_settings")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub owner_id: String,
    /// ISO currency code shown next to amounts (e.g., "USD")
    pub default_currency: Option<String>,
    pub language: Option<String>,
    pub theme: Option<String>,
    /// Overrides the configured policy for this owner's budget alerts
    pub notification_policy: Option<NotificationPolicy>,
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
