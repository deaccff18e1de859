//! Unified error type for the finance tracker.
//!
//! Every fallible operation in [`crate::core`] returns [`Result`]. Store failures
//! are wrapped as [`Error::Database`]; the remaining variants are the domain
//! failures a caller is expected to branch on.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// A budget, notification, goal or owner lookup came back empty.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The record exists but belongs to a different owner.
    #[error("{entity} {id} does not belong to owner {owner_id}")]
    Unauthorized {
        entity: &'static str,
        id: String,
        owner_id: String,
    },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Invalid time range: {range}")]
    InvalidRange { range: String },

    #[error("A budget for category '{category}' already exists")]
    DuplicateCategory { category: String },
}

impl Error {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
