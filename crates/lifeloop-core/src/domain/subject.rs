//! Reminder subjects: the records that may own a scheduled reminder.
//!
//! Subjects are plain data. Creating, updating and deleting them is the
//! persistence layer's job; the engine only sees them through
//! [`SubjectEvent`](super::events::SubjectEvent)s.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ProductEntryId, SubjectKey, TaskEntryId};

/// Time-of-day bucket of the skincare routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SlotOfDay {
    #[serde(rename = "AM")]
    Am,
    #[serde(rename = "PM")]
    Pm,
}

impl SlotOfDay {
    pub const ALL: [SlotOfDay; 2] = [SlotOfDay::Am, SlotOfDay::Pm];

    /// Stored code ("AM" / "PM").
    pub fn code(&self) -> &'static str {
        match self {
            SlotOfDay::Am => "AM",
            SlotOfDay::Pm => "PM",
        }
    }

    /// Default reminder hour: 08:00 for the morning, 21:00 for the evening.
    pub fn default_reminder_hour(&self) -> u32 {
        match self {
            SlotOfDay::Am => 8,
            SlotOfDay::Pm => 21,
        }
    }

    /// Decode a stored slot code. Missing or unknown values fall back to AM.
    pub fn from_stored(code: Option<&str>) -> Self {
        match code {
            Some("PM") => SlotOfDay::Pm,
            _ => SlotOfDay::Am,
        }
    }
}

impl fmt::Display for SlotOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Whether the user has acted on a slot for the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlotStatus {
    #[default]
    NotLogged,
    Completed,
    Skipped,
}

impl SlotStatus {
    /// Decode a stored status string. Missing or unknown values mean not logged.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("completed") => SlotStatus::Completed,
            Some("skipped") => SlotStatus::Skipped,
            _ => SlotStatus::NotLogged,
        }
    }

    /// Completed or skipped: the user already dealt with the slot.
    pub fn is_logged(&self) -> bool {
        matches!(self, SlotStatus::Completed | SlotStatus::Skipped)
    }
}

/// A task with an optional reminder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSubject {
    pub id: TaskEntryId,
    pub title: String,
    /// Calendar day the task is filed under.
    pub due_on: NaiveDate,
    /// Requested reminder instant. `None` means the reminder toggle is off.
    pub remind_at: Option<DateTime<Utc>>,
    pub completed: bool,
}

/// A skincare product entry with an optional reminder (per-product model).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSubject {
    pub id: ProductEntryId,
    pub product_name: String,
    pub slot: SlotOfDay,
    /// Requested reminder instant. `None` means the reminder toggle is off.
    pub remind_at: Option<DateTime<Utc>>,
}

/// The fixed morning or evening skincare slot of one calendar day.
///
/// Exactly one logical subject exists per `(day, slot)`; its delivery id
/// depends on the slot alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedSlotSubject {
    pub day: NaiveDate,
    pub slot: SlotOfDay,
    pub status: SlotStatus,
    /// Hour of day (0..=23) the reminder fires at, on the minute.
    pub reminder_hour: u32,
}

impl FixedSlotSubject {
    pub fn new(day: NaiveDate, slot: SlotOfDay, status: SlotStatus) -> Self {
        Self {
            day,
            slot,
            status,
            reminder_hour: slot.default_reminder_hour(),
        }
    }

    pub fn with_reminder_hour(mut self, hour: u32) -> Self {
        self.reminder_hour = hour;
        self
    }
}

/// Any entity that can own a reminder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReminderSubject {
    Task(TaskSubject),
    Product(ProductSubject),
    FixedSlot(FixedSlotSubject),
}

impl ReminderSubject {
    pub fn key(&self) -> SubjectKey {
        match self {
            ReminderSubject::Task(task) => SubjectKey::Task(task.id),
            ReminderSubject::Product(product) => SubjectKey::Product(product.id),
            ReminderSubject::FixedSlot(slot) => SubjectKey::FixedSlot {
                day: slot.day,
                slot: slot.slot,
            },
        }
    }
}

impl From<TaskSubject> for ReminderSubject {
    fn from(task: TaskSubject) -> Self {
        ReminderSubject::Task(task)
    }
}

impl From<ProductSubject> for ReminderSubject {
    fn from(product: ProductSubject) -> Self {
        ReminderSubject::Product(product)
    }
}

impl From<FixedSlotSubject> for ReminderSubject {
    fn from(slot: FixedSlotSubject) -> Self {
        ReminderSubject::FixedSlot(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::not_logged(Some("notLogged"), SlotStatus::NotLogged)]
    #[case::completed(Some("completed"), SlotStatus::Completed)]
    #[case::skipped(Some("skipped"), SlotStatus::Skipped)]
    #[case::missing(None, SlotStatus::NotLogged)]
    #[case::garbage(Some("done?"), SlotStatus::NotLogged)]
    fn slot_status_decodes_stored_values(
        #[case] stored: Option<&str>,
        #[case] expected: SlotStatus,
    ) {
        assert_eq!(SlotStatus::from_stored(stored), expected);
    }

    #[test]
    fn slot_codes_decode_with_am_fallback() {
        assert_eq!(SlotOfDay::from_stored(Some("PM")), SlotOfDay::Pm);
        assert_eq!(SlotOfDay::from_stored(Some("AM")), SlotOfDay::Am);
        assert_eq!(SlotOfDay::from_stored(Some("noon")), SlotOfDay::Am);
        assert_eq!(SlotOfDay::from_stored(None), SlotOfDay::Am);
    }

    #[test]
    fn fixed_slot_defaults_to_slot_hour() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let am = FixedSlotSubject::new(day, SlotOfDay::Am, SlotStatus::NotLogged);
        let pm = FixedSlotSubject::new(day, SlotOfDay::Pm, SlotStatus::NotLogged);
        assert_eq!(am.reminder_hour, 8);
        assert_eq!(pm.reminder_hour, 21);
    }

    #[test]
    fn recreated_slot_record_keeps_its_key() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let first = ReminderSubject::from(FixedSlotSubject::new(
            day,
            SlotOfDay::Pm,
            SlotStatus::Completed,
        ));
        let again = ReminderSubject::from(FixedSlotSubject::new(
            day,
            SlotOfDay::Pm,
            SlotStatus::NotLogged,
        ));
        assert_eq!(first.key(), again.key());
        assert_eq!(first.key().delivery_id(), again.key().delivery_id());
    }

    #[test]
    fn slot_status_uses_stored_spelling_in_json() {
        let s = serde_json::to_string(&SlotStatus::NotLogged).unwrap();
        assert_eq!(s, "\"notLogged\"");
    }
}
