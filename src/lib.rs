//! Finance tracker - budget evaluation and dashboard aggregation over a
//! per-owner transaction ledger.
//!
//! The crate records income and expenses, keeps a running balance per owner,
//! checks category budgets against the current daily, weekly, monthly or yearly
//! period, raises overage notifications and derives dashboard snapshots for
//! trailing time windows.

#![deny(
    unsafe_code,
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::dbg_macro,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::panic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    rust_2018_idioms,
)]
// Error and panic sections are written where a caller branches on the variant,
// not on every fallible function.
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

/// Configuration management for database and application settings
pub mod config;
/// Core business logic - ledger, budget, dashboard and goal operations
pub mod core;
/// SeaORM entity definitions for database tables
pub mod entities;
/// Unified error types and result handling
pub mod errors;

#[cfg(test)]
pub mod test_utils;
