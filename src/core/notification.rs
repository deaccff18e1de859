//! Budget overage notifications.
//!
//! Notifications are written only by budget evaluation. With the default
//! [`NotificationPolicy::Always`] every evaluation of an exceeded budget writes a new
//! notification, even if an identical one already exists.
//! [`NotificationPolicy::OncePerPeriod`] keys notifications on
//! `(owner, category, period_start)` and skips the insert when that key exists.

use crate::{
    core::clock::Clock,
    entities::{Notification, notification},
    errors::{Error, Result},
};
pub use crate::entities::NotificationPolicy;
use chrono::NaiveDateTime;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, info};

/// An exceeded budget, as detected by the evaluator.
#[derive(Debug, Clone, PartialEq)]
pub struct Overage<'a> {
    pub owner_id: &'a str,
    pub category: &'a str,
    pub spent: f64,
    pub limit: f64,
    /// Start of the budget period the spend was measured over
    pub period_start: NaiveDateTime,
}

/// Formats the alert text. Both amounts are truncated to whole currency units.
#[must_use]
pub fn format_overage_message(category: &str, spent: f64, limit: f64) -> String {
    format!(
        "Budget limit exceeded for {category}. Spent: ${:.2}, Limit: ${:.2}",
        spent.trunc(),
        limit.trunc()
    )
}

/// Records an unread notification for an exceeded budget.
///
/// Returns the stored notification, or `None` when `policy` suppressed it.
pub async fn emit_overage<C>(
    db: &C,
    clock: &impl Clock,
    overage: &Overage<'_>,
    policy: NotificationPolicy,
) -> Result<Option<notification::Model>>
where
    C: ConnectionTrait,
{
    if policy == NotificationPolicy::OncePerPeriod {
        let existing = Notification::find()
            .filter(notification::Column::OwnerId.eq(overage.owner_id))
            .filter(notification::Column::Category.eq(overage.category))
            .filter(notification::Column::PeriodStart.eq(overage.period_start))
            .count(db)
            .await?;
        if existing > 0 {
            debug!(
                owner_id = overage.owner_id,
                category = overage.category,
                "Overage already notified for this period"
            );
            return Ok(None);
        }
    }

    let message = format_overage_message(overage.category, overage.spent, overage.limit);
    let model = notification::ActiveModel {
        owner_id: Set(overage.owner_id.to_string()),
        category: Set(overage.category.to_string()),
        message: Set(message),
        period_start: Set(overage.period_start),
        created_at: Set(clock.now()),
        is_read: Set(false),
        ..Default::default()
    };

    let stored = model.insert(db).await?;
    info!(
        owner_id = overage.owner_id,
        category = overage.category,
        spent = overage.spent,
        limit = overage.limit,
        "Budget exceeded, notification recorded"
    );
    Ok(Some(stored))
}

/// Lists an owner's notifications, newest first.
pub async fn list_notifications<C>(db: &C, owner_id: &str) -> Result<Vec<notification::Model>>
where
    C: ConnectionTrait,
{
    Notification::find()
        .filter(notification::Column::OwnerId.eq(owner_id))
        .order_by_desc(notification::Column::CreatedAt)
        .order_by_desc(notification::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Marks one of the owner's notifications as read.
///
/// # Errors
/// * [`Error::NotFound`] - no notification with this id
/// * [`Error::Unauthorized`] - the notification belongs to another owner
pub async fn mark_notification_read<C>(
    db: &C,
    owner_id: &str,
    notification_id: i64,
) -> Result<notification::Model>
where
    C: ConnectionTrait,
{
    let existing = Notification::find_by_id(notification_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "notification",
            id: notification_id.to_string(),
        })?;

    if existing.owner_id != owner_id {
        return Err(Error::Unauthorized {
            entity: "notification",
            id: notification_id.to_string(),
            owner_id: owner_id.to_string(),
        });
    }

    let mut active_model: notification::ActiveModel = existing.into();
    active_model.is_read = Set(true);
    active_model.update(db).await.map_err(Into::into)
}
