//! Dashboard aggregation.
//!
//! Turns an owner's ledger into a snapshot for a trailing time window: income,
//! expenses, spend per category, the running balance, how the balance compares to
//! the previous window of the same length, and short textual insights. Nothing here
//! is persisted; every snapshot is computed on request.

use crate::{
    core::{
        clock::Clock,
        owner::require_owner,
        period::first_date_on_or_after,
        transaction::{DateRange, list_transactions},
    },
    entities::transaction,
    errors::{Error, Result},
};
use chrono::{Days, NaiveDateTime, TimeDelta};
use sea_orm::ConnectionTrait;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, instrument};

/// Trailing window the dashboard aggregates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeKey {
    /// Last 7 days
    Week,
    /// Last 30 days
    Month,
    /// Last 90 days
    Quarter,
    /// Last 365 days
    Year,
}

impl RangeKey {
    /// Length of the window.
    #[must_use]
    pub fn lookback(self) -> TimeDelta {
        match self {
            Self::Week => TimeDelta::days(7),
            Self::Month => TimeDelta::days(30),
            Self::Quarter => TimeDelta::days(90),
            Self::Year => TimeDelta::days(365),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for RangeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RangeKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "quarter" => Ok(Self::Quarter),
            "year" => Ok(Self::Year),
            other => Err(Error::InvalidRange {
                range: other.to_string(),
            }),
        }
    }
}

/// A `[start, end]` instant window and the date range it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Window {
    /// The window of length `range.lookback()` ending at `now`.
    #[must_use]
    pub fn trailing(range: RangeKey, now: NaiveDateTime) -> Self {
        Self {
            start: now - range.lookback(),
            end: now,
        }
    }

    /// The window of the same length immediately before this one, `[start - len, start)`.
    #[must_use]
    pub fn previous(self) -> Self {
        Self {
            start: self.start - (self.end - self.start),
            end: self.start,
        }
    }

    /// Dates whose midnight falls in `[start, end]`.
    #[must_use]
    pub fn closed_dates(self) -> DateRange {
        DateRange::between(first_date_on_or_after(self.start), self.end.date())
    }

    /// Dates whose midnight falls in `[start, end)`.
    #[must_use]
    pub fn half_open_dates(self) -> DateRange {
        DateRange::between(
            first_date_on_or_after(self.start),
            first_date_on_or_after(self.end) - Days::new(1),
        )
    }
}

/// A labelled amount, used for chart-style breakdowns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedValue {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub message: String,
}

/// Aggregated view of an owner's finances over one window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub range: RangeKey,
    /// Owner's running balance, not derived from the window
    pub total_balance: f64,
    pub balance_change: f64,
    pub income: f64,
    pub expenses: f64,
    /// Always `[Income, Expenses]`
    pub income_vs_expenses: Vec<NamedValue>,
    /// Expense totals per category, sorted by category
    pub spending_by_category: Vec<NamedValue>,
    pub insights: Vec<Insight>,
}

/// In-window totals split by sign.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowTotals {
    pub income: f64,
    pub expenses: f64,
    pub spending_by_category: BTreeMap<String, f64>,
}

/// Splits transactions by sign: positive amounts are income, everything else is
/// an expense counted by magnitude and attributed to its category.
#[must_use]
pub fn aggregate_window(transactions: &[transaction::Model]) -> WindowTotals {
    let mut totals = WindowTotals::default();
    for t in transactions {
        if t.amount > 0.0 {
            totals.income += t.amount;
        } else {
            let spent = t.amount.abs();
            totals.expenses += spent;
            *totals
                .spending_by_category
                .entry(t.category.clone())
                .or_insert(0.0) += spent;
        }
    }
    totals
}

/// Net signed flow of the previous window.
#[must_use]
pub fn previous_window_balance(previous: &[transaction::Model]) -> f64 {
    previous.iter().map(|t| t.amount).sum()
}

/// Compares the running balance with the previous window's net flow.
///
/// This subtracts a period-local flow from an all-time balance, which is how the
/// dashboard has always reported "balance change".
#[must_use]
pub fn balance_change(total_balance: f64, previous_balance: f64) -> f64 {
    total_balance - previous_balance
}

/// Builds the insight messages for a snapshot. May be empty.
#[must_use]
pub fn generate_insights(
    range: RangeKey,
    balance_change: f64,
    income: f64,
    expenses: f64,
) -> Vec<Insight> {
    let mut insights = Vec::new();

    if balance_change > 0.0 {
        insights.push(Insight {
            kind: InsightKind::Info,
            message: format!(
                "Your balance increased by ${balance_change:.2} compared to the previous {range}."
            ),
        });
    } else if balance_change < 0.0 {
        insights.push(Insight {
            kind: InsightKind::Warning,
            message: format!(
                "Your balance decreased by ${:.2} compared to the previous {range}.",
                balance_change.abs()
            ),
        });
    }

    if expenses > income {
        insights.push(Insight {
            kind: InsightKind::Warning,
            message: format!(
                "Your expenses (${expenses:.2}) exceeded your income (${income:.2}) in this {range}."
            ),
        });
    }

    insights
}

/// Builds the dashboard snapshot for `owner_id` over the window named by `range_key`.
///
/// # Errors
/// * [`Error::InvalidRange`] - `range_key` is not week, month, quarter or year;
///   returned before the store is touched
/// * [`Error::NotFound`] - the owner does not exist
#[instrument(skip(db, clock))]
pub async fn build_dashboard<C>(
    db: &C,
    clock: &impl Clock,
    owner_id: &str,
    range_key: &str,
) -> Result<DashboardSnapshot>
where
    C: ConnectionTrait,
{
    let range: RangeKey = range_key.parse()?;
    let window = Window::trailing(range, clock.now());

    let in_window = list_transactions(db, owner_id, Some(window.closed_dates())).await?;
    let totals = aggregate_window(&in_window);

    let total_balance = require_owner(db, owner_id).await?.total_balance;

    let previous =
        list_transactions(db, owner_id, Some(window.previous().half_open_dates())).await?;
    let previous_balance = previous_window_balance(&previous);
    let balance_change = balance_change(total_balance, previous_balance);

    debug!(
        transactions = in_window.len(),
        previous_transactions = previous.len(),
        total_balance,
        balance_change,
        "Dashboard aggregated"
    );

    let insights = generate_insights(range, balance_change, totals.income, totals.expenses);

    Ok(DashboardSnapshot {
        range,
        total_balance,
        balance_change,
        income: totals.income,
        expenses: totals.expenses,
        income_vs_expenses: vec![
            NamedValue {
                name: "Income".to_string(),
                value: totals.income,
            },
            NamedValue {
                name: "Expenses".to_string(),
                value: totals.expenses,
            },
        ],
        spending_by_category: totals
            .spending_by_category
            .into_iter()
            .map(|(name, value)| NamedValue { name, value })
            .collect(),
        insights,
    })
}

/// Formats a snapshot into a human-readable summary, for logs and terminals.
#[must_use]
pub fn format_dashboard_summary(snapshot: &DashboardSnapshot) -> String {
    let mut lines = vec![
        format!(
            "Dashboard - last {} | Balance: ${:.2} ({:+.2})",
            snapshot.range, snapshot.total_balance, snapshot.balance_change
        ),
        format!(
            "  Income: ${:.2} | Expenses: ${:.2}",
            snapshot.income, snapshot.expenses
        ),
    ];

    lines.extend(
        snapshot
            .spending_by_category
            .iter()
            .map(|category| format!("  {} - ${:.2}", category.name, category.value)),
    );

    lines.extend(snapshot.insights.iter().map(|insight| {
        let marker = match insight.kind {
            InsightKind::Info => "i",
            InsightKind::Warning => "!",
        };
        format!("  [{marker}] {}", insight.message)
    }));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::transaction::INCOME_CATEGORY;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[test]
    fn test_range_key_parse() {
        assert_eq!("week".parse::<RangeKey>().unwrap(), RangeKey::Week);
        assert_eq!("month".parse::<RangeKey>().unwrap(), RangeKey::Month);
        assert_eq!("quarter".parse::<RangeKey>().unwrap(), RangeKey::Quarter);
        assert_eq!("year".parse::<RangeKey>().unwrap(), RangeKey::Year);
        assert!(matches!(
            "decade".parse::<RangeKey>(),
            Err(Error::InvalidRange { range }) if range == "decade"
        ));
    }

    #[test]
    fn test_window_dates() {
        // Saturday noon, one week back is the previous Saturday noon
        let window = Window::trailing(RangeKey::Week, at(2024, 6, 15, 12, 0));
        assert_eq!(
            window.closed_dates(),
            DateRange::between(date(2024, 6, 9), date(2024, 6, 15))
        );

        let previous = window.previous();
        assert_eq!(previous.start, at(2024, 6, 1, 12, 0));
        assert_eq!(previous.end, at(2024, 6, 8, 12, 0));
        assert_eq!(
            previous.half_open_dates(),
            DateRange::between(date(2024, 6, 2), date(2024, 6, 8))
        );
    }

    #[test]
    fn test_window_midnight_boundaries_do_not_overlap() {
        let window = Window::trailing(RangeKey::Week, at(2024, 6, 15, 0, 0));
        assert_eq!(
            window.closed_dates(),
            DateRange::between(date(2024, 6, 8), date(2024, 6, 15))
        );
        assert_eq!(
            window.previous().half_open_dates(),
            DateRange::between(date(2024, 6, 1), date(2024, 6, 7))
        );
    }

    #[test]
    fn test_generate_insights() {
        let increase = generate_insights(RangeKey::Week, 50.0, 100.0, 50.0);
        assert_eq!(
            increase,
            vec![Insight {
                kind: InsightKind::Info,
                message: "Your balance increased by $50.00 compared to the previous week."
                    .to_string(),
            }]
        );

        let decrease = generate_insights(RangeKey::Month, -12.5, 10.0, 30.0);
        assert_eq!(decrease.len(), 2);
        assert_eq!(decrease[0].kind, InsightKind::Warning);
        assert_eq!(
            decrease[0].message,
            "Your balance decreased by $12.50 compared to the previous month."
        );
        assert_eq!(
            decrease[1].message,
            "Your expenses ($30.00) exceeded your income ($10.00) in this month."
        );

        assert!(generate_insights(RangeKey::Year, 0.0, 10.0, 10.0).is_empty());
    }

    #[test]
    fn test_balance_change_uses_signed_previous_flow() {
        assert_eq!(balance_change(500.0, 120.0), 380.0);
        assert_eq!(balance_change(0.0, 50.0), -50.0);
    }

    #[tokio::test]
    async fn test_build_dashboard_invalid_range_issues_no_query() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = build_dashboard(&db, &test_clock(), TEST_OWNER, "decade").await;
        assert!(matches!(result, Err(Error::InvalidRange { .. })));
        assert!(db.into_transaction_log().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_build_dashboard_week() -> Result<()> {
        let (db, _owner) = setup_with_owner().await?;
        create_test_transaction(&db, INCOME_CATEGORY, 100.0, date(2024, 6, 14)).await?;
        create_test_transaction(&db, "groceries", 40.0, date(2024, 6, 13)).await?;
        create_test_transaction(&db, "groceries", 10.0, date(2024, 6, 12)).await?;

        let snapshot = build_dashboard(&db, &test_clock(), TEST_OWNER, "week").await?;

        assert_eq!(snapshot.range, RangeKey::Week);
        assert_eq!(snapshot.income, 100.0);
        assert_eq!(snapshot.expenses, 50.0);
        assert_eq!(
            snapshot.spending_by_category,
            vec![NamedValue {
                name: "groceries".to_string(),
                value: 50.0
            }]
        );
        assert_eq!(
            snapshot.income_vs_expenses,
            vec![
                NamedValue {
                    name: "Income".to_string(),
                    value: 100.0
                },
                NamedValue {
                    name: "Expenses".to_string(),
                    value: 50.0
                },
            ]
        );
        assert_eq!(snapshot.total_balance, 50.0);
        assert_eq!(snapshot.balance_change, 50.0);
        assert_eq!(
            snapshot.insights,
            vec![Insight {
                kind: InsightKind::Info,
                message: "Your balance increased by $50.00 compared to the previous week."
                    .to_string(),
            }]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_build_dashboard_previous_window_and_overspend() -> Result<()> {
        let (db, _owner) = setup_with_owner().await?;
        // Previous week (2024-06-02..=2024-06-08): net +200
        create_test_transaction(&db, INCOME_CATEGORY, 300.0, date(2024, 6, 3)).await?;
        create_test_transaction(&db, "rent", 100.0, date(2024, 6, 8)).await?;
        // Current week (2024-06-09..=2024-06-15)
        create_test_transaction(&db, INCOME_CATEGORY, 20.0, date(2024, 6, 9)).await?;
        create_test_transaction(&db, "groceries", 30.0, date(2024, 6, 10)).await?;
        create_test_transaction(&db, "coffee", 5.0, date(2024, 6, 15)).await?;
        // Older than both windows, and future-dated: only in the running balance
        create_test_transaction(&db, INCOME_CATEGORY, 1000.0, date(2024, 1, 1)).await?;
        create_test_transaction(&db, "travel", 400.0, date(2024, 6, 20)).await?;

        let snapshot = build_dashboard(&db, &test_clock(), TEST_OWNER, "week").await?;

        assert_eq!(snapshot.income, 20.0);
        assert_eq!(snapshot.expenses, 35.0);
        let categories: Vec<&str> = snapshot
            .spending_by_category
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(categories, vec!["coffee", "groceries"]);

        // 300 - 100 + 20 - 30 - 5 + 1000 - 400
        assert_eq!(snapshot.total_balance, 785.0);
        assert_eq!(snapshot.balance_change, 585.0);
        assert_eq!(snapshot.insights.len(), 2);
        assert_eq!(snapshot.insights[0].kind, InsightKind::Info);
        assert_eq!(
            snapshot.insights[1].message,
            "Your expenses ($35.00) exceeded your income ($20.00) in this week."
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_build_dashboard_empty_ledger() -> Result<()> {
        let (db, _owner) = setup_with_owner().await?;

        let snapshot = build_dashboard(&db, &test_clock(), TEST_OWNER, "year").await?;
        assert_eq!(snapshot.income, 0.0);
        assert_eq!(snapshot.expenses, 0.0);
        assert_eq!(snapshot.balance_change, 0.0);
        assert!(snapshot.spending_by_category.is_empty());
        assert!(snapshot.insights.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_build_dashboard_unknown_owner() -> Result<()> {
        let db = setup_test_db().await?;

        let result = build_dashboard(&db, &test_clock(), "ghost", "month").await;
        assert!(matches!(result, Err(Error::NotFound { entity: "owner", .. })));
        Ok(())
    }

    #[test]
    fn test_format_dashboard_summary_lines() {
        let snapshot = DashboardSnapshot {
            range: RangeKey::Month,
            total_balance: 1200.0,
            balance_change: 150.5,
            income: 300.0,
            expenses: 75.25,
            income_vs_expenses: Vec::new(),
            spending_by_category: vec![
                NamedValue {
                    name: "coffee".to_string(),
                    value: 5.25,
                },
                NamedValue {
                    name: "groceries".to_string(),
                    value: 70.0,
                },
            ],
            insights: generate_insights(RangeKey::Month, 150.5, 300.0, 75.25),
        };

        let summary = format_dashboard_summary(&snapshot);
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Dashboard - last month | Balance: $1200.00 (+150.50)",
                "  Income: $300.00 | Expenses: $75.25",
                "  coffee - $5.25",
                "  groceries - $70.00",
                "  [i] Your balance increased by $150.50 compared to the previous month.",
            ]
        );
        assert!(!summary.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_format_dashboard_summary() -> Result<()> {
        let (db, _owner) = setup_with_owner().await?;
        create_test_transaction(&db, "groceries", 40.0, date(2024, 6, 13)).await?;

        let snapshot = build_dashboard(&db, &test_clock(), TEST_OWNER, "week").await?;
        let summary = format_dashboard_summary(&snapshot);

        assert!(summary.starts_with("Dashboard - last week | Balance: $-40.00 (-40.00)"));
        assert!(summary.contains("  groceries - $40.00"));
        assert!(summary.contains("[!] Your expenses ($40.00) exceeded your income ($0.00) in this week."));
        Ok(())
    }
}
