//! Core business logic - framework-agnostic operations over the ledger.
//!
//! Every operation takes its store handle (a SeaORM connection) and, where it needs
//! the current time, a [`clock::Clock`] as arguments.

pub mod analysis;
pub mod budget;
pub mod clock;
pub mod dashboard;
pub mod goal;
pub mod notification;
pub mod owner;
pub mod period;
pub mod settings;
pub mod transaction;
