//! Budget period math.
//!
//! A budget's "spend to date" counts every transaction dated on or after the start
//! of its current period. Periods start at local midnight; weeks start on Monday.

use crate::entities::Period;
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};

/// Computes the start instant of the period containing `now`.
///
/// * `Daily` - midnight today
/// * `Weekly` - midnight of the most recent Monday
/// * `Monthly` - midnight on the first of the month
/// * `Yearly` - midnight on January 1st
/// * `Unrecognized` - `now` unchanged, so only future-dated transactions count
#[must_use]
pub fn start_of_period(period: Period, now: NaiveDateTime) -> NaiveDateTime {
    let today = now.date();
    let start_day = match period {
        Period::Daily => today,
        Period::Weekly => today - Days::new(u64::from(today.weekday().num_days_from_monday())),
        Period::Monthly => today - Days::new(u64::from(today.day0())),
        Period::Yearly => today - Days::new(u64::from(today.ordinal0())),
        Period::Unrecognized => return now,
    };
    start_day.and_time(NaiveTime::MIN)
}

/// Returns the first calendar date whose midnight is at or after `instant`.
///
/// Transaction dates carry no time of day, so "dated at or after `instant`" means
/// `date >= first_date_on_or_after(instant)`.
#[must_use]
pub fn first_date_on_or_after(instant: NaiveDateTime) -> NaiveDate {
    if instant.time() == NaiveTime::MIN {
        instant.date()
    } else {
        instant.date() + Days::new(1)
    }
}
