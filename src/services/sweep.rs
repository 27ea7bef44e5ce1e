//! Time-driven transitions applied on read instead of by a scheduler.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};

use crate::models::events::{self, EventStatus};

/// Contact stays unlocked this many days past the event date.
pub const CONTACT_DAYS_AFTER_EVENT: u64 = 15;

/// Window used when the event has no date, counted from acceptance.
pub const CONTACT_DAYS_WITHOUT_DATE: u64 = 30;

/// When contact details stop being disclosable for a quote accepted at `now`.
///
/// Anchored to midnight UTC of the event date plus 15 days when the event has
/// a date, otherwise `now` plus 30 days.
pub fn contact_expiry(event_date: Option<NaiveDate>, now: DateTime<Utc>) -> DateTime<Utc> {
    let anchored = event_date
        .and_then(|date| date.checked_add_days(Days::new(CONTACT_DAYS_AFTER_EVENT)))
        .map(|date| date.and_time(NaiveTime::MIN).and_utc());

    anchored.unwrap_or_else(|| {
        now.checked_add_days(Days::new(CONTACT_DAYS_WITHOUT_DATE))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    })
}

/// An event counts as completed once its date is before `today`, even if the
/// status column has not been swept yet.
pub fn event_is_completed(event: &events::Model, today: NaiveDate) -> bool {
    event.status == EventStatus::Completed || event.event_date.is_some_and(|d| d < today)
}

/// Counts from one sweep, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    pub events_completed: u64,
    pub quotes_archived: u64,
}
