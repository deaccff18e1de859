//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod budget;
pub mod goal;
pub mod notification;
pub mod owner;
pub mod owner_settings;
pub mod transaction;

// Re-export specific types to avoid conflicts
pub use budget::{Column as BudgetColumn, Entity as Budget, Model as BudgetModel, Period};
pub use goal::{Column as GoalColumn, Entity as Goal, Model as GoalModel};
pub use notification::{
    Column as NotificationColumn, Entity as Notification, Model as NotificationModel,
};
pub use owner::{Column as OwnerColumn, Entity as Owner, Model as OwnerModel};
pub use owner_settings::{
    Column as OwnerSettingsColumn, Entity as OwnerSettings, Model as OwnerSettingsModel,
    NotificationPolicy,
};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
    TransactionKind,
};
