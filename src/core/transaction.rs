//! Transaction business logic - Handles all ledger reads and writes.
//!
//! The ledger is append-only: a transaction is created once and never edited here.
//! Creating a transaction normalizes the sign of its amount from the category and
//! atomically moves the owner's running balance by the same amount, inside one
//! database transaction so the ledger and the balance can never disagree.

use crate::{
    core::{clock::Clock, owner},
    entities::{Transaction, TransactionKind, transaction},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, QuerySelect, Select, Set, TransactionTrait, prelude::*};
use tracing::{debug, instrument};

/// The only category recorded as income.
pub const INCOME_CATEGORY: &str = "income";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Input for [`create_transaction`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub owner_id: String,
    pub description: String,
    /// Amount as entered; only its magnitude is used, the sign comes from `category`
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
}

/// Inclusive calendar-date bounds for ledger queries. `None` leaves a side open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Range covering `start..=end`.
    #[must_use]
    pub const fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Range covering every date from `start` onwards.
    #[must_use]
    pub const fn since(start: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    /// Parses a pair of `YYYY-MM-DD` strings into an inclusive range.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if either date does not parse.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Ok(Self::between(parse_date(start)?, parse_date(end)?))
    }

    fn apply(self, query: Select<Transaction>) -> Select<Transaction> {
        let query = match self.start {
            Some(start) => query.filter(transaction::Column::Date.gte(start)),
            None => query,
        };
        match self.end {
            Some(end) => query.filter(transaction::Column::Date.lte(end)),
            None => query,
        }
    }
}

/// Parses a `YYYY-MM-DD` calendar date.
///
/// # Errors
/// Returns [`Error::InvalidInput`] if the text is not a valid date.
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
        .map_err(|e| Error::invalid_input(format!("Invalid date '{text}': {e}")))
}

/// Returns the kind and stored amount for an entered amount in `category`.
///
/// Income is stored as `|amount|`, every other category as `-|amount|`, so the sign
/// always matches the kind regardless of what the caller typed.
#[must_use]
pub fn normalize_amount(category: &str, amount: f64) -> (TransactionKind, f64) {
    if category == INCOME_CATEGORY {
        (TransactionKind::Income, amount.abs())
    } else {
        (TransactionKind::Expense, -amount.abs())
    }
}

/// Creates a new transaction and applies it to the owner's running balance.
///
/// # Errors
/// * [`Error::InvalidInput`] - the amount is not finite or the category is empty
/// * [`Error::NotFound`] - the owner does not exist; nothing is written
#[instrument(skip(db, clock, new), fields(owner_id = %new.owner_id, category = %new.category))]
pub async fn create_transaction(
    db: &DatabaseConnection,
    clock: &impl Clock,
    new: NewTransaction,
) -> Result<transaction::Model> {
    if !new.amount.is_finite() {
        return Err(Error::invalid_input(format!(
            "Invalid amount: {}",
            new.amount
        )));
    }

    let category = new.category.trim().to_string();
    if category.is_empty() {
        return Err(Error::invalid_input("Category cannot be empty"));
    }

    let (kind, amount) = normalize_amount(&category, new.amount);

    // Use a transaction to ensure atomicity
    let txn = db.begin().await?;

    let transaction_model = transaction::ActiveModel {
        owner_id: Set(new.owner_id.clone()),
        description: Set(new.description),
        amount: Set(amount),
        category: Set(category),
        kind: Set(kind),
        date: Set(new.date),
        created_at: Set(clock.now()),
        ..Default::default()
    };

    // Fails with NotFound (and rolls back on drop) when the owner is missing
    owner::increment_balance_atomic(&txn, &new.owner_id, amount).await?;
    let result = transaction_model.insert(&txn).await?;

    // Commit the transaction
    txn.commit().await?;

    debug!(transaction_id = result.id, amount, "Transaction recorded");
    Ok(result)
}

fn owner_ledger(owner_id: &str) -> Select<Transaction> {
    Transaction::find()
        .filter(transaction::Column::OwnerId.eq(owner_id))
        .order_by_desc(transaction::Column::Date)
        .order_by_desc(transaction::Column::CreatedAt)
        .order_by_desc(transaction::Column::Id)
}

/// Lists an owner's transactions, newest date first, then newest write first.
pub async fn list_transactions<C>(
    db: &C,
    owner_id: &str,
    range: Option<DateRange>,
) -> Result<Vec<transaction::Model>>
where
    C: ConnectionTrait,
{
    range
        .unwrap_or_default()
        .apply(owner_ledger(owner_id))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists an owner's transactions in one category dated on or after `since`.
pub async fn find_category_transactions_since<C>(
    db: &C,
    owner_id: &str,
    category: &str,
    since: NaiveDate,
) -> Result<Vec<transaction::Model>>
where
    C: ConnectionTrait,
{
    DateRange::since(since)
        .apply(owner_ledger(owner_id))
        .filter(transaction::Column::Category.eq(category))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Returns at most `limit` of the owner's most recent transactions.
pub async fn recent_transactions<C>(
    db: &C,
    owner_id: &str,
    limit: u64,
) -> Result<Vec<transaction::Model>>
where
    C: ConnectionTrait,
{
    owner_ledger(owner_id)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}
