//! Per-owner settings.
//!
//! An owner has no settings until the first [`upsert_settings`]. Each upsert replaces
//! every preference with the submitted values, so an omitted preference is cleared.

use crate::{
    core::{clock::Clock, owner::require_owner},
    entities::{NotificationPolicy, OwnerSettings, owner_settings},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};
use tracing::debug;

/// The preferences submitted by an owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub default_currency: Option<String>,
    pub language: Option<String>,
    pub theme: Option<String>,
    pub notification_policy: Option<NotificationPolicy>,
}

/// Returns the owner's settings.
///
/// # Errors
/// Returns [`Error::NotFound`] if the owner has never saved settings.
pub async fn get_settings<C>(db: &C, owner_id: &str) -> Result<owner_settings::Model>
where
    C: ConnectionTrait,
{
    OwnerSettings::find_by_id(owner_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "settings",
            id: owner_id.to_string(),
        })
}

/// Creates or replaces the owner's settings.
///
/// `created_at` is stamped on the first save only; `updated_at` on every save.
///
/// # Errors
/// Returns [`Error::NotFound`] if the owner does not exist.
pub async fn upsert_settings<C>(
    db: &C,
    clock: &impl Clock,
    owner_id: &str,
    update: SettingsUpdate,
) -> Result<owner_settings::Model>
where
    C: ConnectionTrait,
{
    require_owner(db, owner_id).await?;
    let now = clock.now();

    let existing = OwnerSettings::find_by_id(owner_id.to_string())
        .one(db)
        .await?;

    let (mut active_model, is_new): (owner_settings::ActiveModel, bool) = match existing {
        Some(model) => (model.into(), false),
        None => (
            owner_settings::ActiveModel {
                owner_id: Set(owner_id.to_string()),
                created_at: Set(now),
                ..Default::default()
            },
            true,
        ),
    };

    active_model.default_currency = Set(update.default_currency);
    active_model.language = Set(update.language);
    active_model.theme = Set(update.theme);
    active_model.notification_policy = Set(update.notification_policy);
    active_model.updated_at = Set(now);

    let saved = if is_new {
        active_model.insert(db).await?
    } else {
        active_model.update(db).await?
    };
    debug!(owner_id, is_new, "Settings saved");
    Ok(saved)
}

/// The policy for the owner's budget alerts: their own preference if they set
/// one, otherwise `default`.
pub async fn notification_policy_for<C>(
    db: &C,
    owner_id: &str,
    default: NotificationPolicy,
) -> Result<NotificationPolicy>
where
    C: ConnectionTrait,
{
    let stored = OwnerSettings::find_by_id(owner_id.to_string())
        .one(db)
        .await?;
    Ok(stored
        .and_then(|settings| settings.notification_policy)
        .unwrap_or(default))
}
