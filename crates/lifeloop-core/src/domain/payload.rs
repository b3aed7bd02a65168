//! Notification content handed to the delivery adapter.

use serde::{Deserialize, Serialize};

use super::ids::SubjectKind;
use super::subject::{ReminderSubject, SlotOfDay};

/// Title and body of a reminder, plus the kind of subject it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderPayload {
    pub title: String,
    pub body: String,
    pub kind: SubjectKind,
}

impl ReminderPayload {
    pub fn for_subject(subject: &ReminderSubject) -> Self {
        match subject {
            ReminderSubject::Task(task) => Self {
                title: "Task Reminder".to_string(),
                body: task.title.clone(),
                kind: SubjectKind::Task,
            },
            ReminderSubject::Product(product) => Self {
                title: skincare_title(product.slot),
                body: format!("Time to use {}", product.product_name),
                kind: SubjectKind::Product,
            },
            ReminderSubject::FixedSlot(slot) => Self {
                title: skincare_title(slot.slot),
                body: match slot.slot {
                    SlotOfDay::Am => "Time for your morning skincare routine!".to_string(),
                    SlotOfDay::Pm => "Time for your evening skincare routine!".to_string(),
                },
                kind: SubjectKind::FixedSlot,
            },
        }
    }
}

fn skincare_title(slot: SlotOfDay) -> String {
    format!("{slot} Skincare Reminder")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::subject::{FixedSlotSubject, ProductSubject, SlotStatus, TaskSubject};
    use chrono::NaiveDate;
    use ulid::Ulid;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 17).unwrap()
    }

    fn slot(slot: SlotOfDay) -> ReminderSubject {
        FixedSlotSubject::new(day(), slot, SlotStatus::NotLogged).into()
    }

    #[test]
    fn slot_payloads_name_the_routine() {
        let am = ReminderPayload::for_subject(&slot(SlotOfDay::Am));
        assert_eq!(am.title, "AM Skincare Reminder");
        assert_eq!(am.body, "Time for your morning skincare routine!");

        let pm = ReminderPayload::for_subject(&slot(SlotOfDay::Pm));
        assert_eq!(pm.title, "PM Skincare Reminder");
        assert_eq!(pm.body, "Time for your evening skincare routine!");
        assert_eq!(pm.kind, SubjectKind::FixedSlot);
    }

    #[test]
    fn task_payload_carries_the_task_title() {
        let payload = ReminderPayload::for_subject(
            &TaskSubject {
                id: Ulid::new().into(),
                title: "Drink 8 glasses of water".to_string(),
                due_on: day(),
                remind_at: None,
                completed: false,
            }
            .into(),
        );
        assert_eq!(payload.title, "Task Reminder");
        assert_eq!(payload.body, "Drink 8 glasses of water");
    }

    #[test]
    fn product_payload_names_the_product() {
        let payload = ReminderPayload::for_subject(
            &ProductSubject {
                id: Ulid::new().into(),
                product_name: "Retinol Night Cream".to_string(),
                slot: SlotOfDay::Pm,
                remind_at: None,
            }
            .into(),
        );
        assert_eq!(payload.title, "PM Skincare Reminder");
        assert_eq!(payload.body, "Time to use Retinol Night Cream");
        assert_eq!(payload.kind, SubjectKind::Product);
    }
}
