//! Display order and date formatting for tables

use chrono::NaiveDate;
use dlv_model::{Intervention, RecordId, ScheduleItem};
use dlv_store::{Collection, Record};

/// `dd-mm`, used in the schedule table
#[must_use]
pub fn short_date(date: NaiveDate) -> String {
    date.format("%d-%m").to_string()
}

/// `dd-mm-yyyy`, used in the interventions table
#[must_use]
pub fn long_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// Interventions by target end date, earliest first
#[must_use]
pub fn interventions_by_end_date(
    items: &Collection<RecordId, Intervention>,
) -> Vec<&Record<RecordId, Intervention>> {
    items.sorted_by_key(|i| i.target_end_date)
}

/// Schedule items by start date, earliest first
#[must_use]
pub fn schedule_by_start_date(
    items: &Collection<RecordId, ScheduleItem>,
) -> Vec<&Record<RecordId, ScheduleItem>> {
    items.sorted_by_key(|i| i.start_date)
}

/// Resolve a 1-based displayed position to a record id
#[must_use]
pub fn displayed_id<T>(rows: &[&Record<RecordId, T>], position: usize) -> Option<RecordId> {
    position
        .checked_sub(1)
        .and_then(|i| rows.get(i))
        .map(|r| r.id)
}
