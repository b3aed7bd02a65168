//! Trigger decisions: should a reminder be pending, and when does it fire.
//!
//! This module defines the TriggerDecision type (the desired reminder state
//! of one subject) and the TriggerPolicy trait (how to compute it from the
//! subject, the current time and the user's time zone).

use chrono::{DateTime, Days, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::subject::{FixedSlotSubject, ReminderSubject, SlotStatus};
use super::zone::LocalZone;

/// Why no reminder should be pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SuppressReason {
    /// The record carries no reminder instant (toggle off).
    NoReminderRequested,
    /// The requested instant is at or before now.
    InstantPassed,
    /// The slot was already completed or skipped.
    SlotLogged { status: SlotStatus },
    /// The configured slot hour does not name a valid time of day.
    InvalidReminderHour { hour: u32 },
}

/// Desired reminder state of a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum TriggerDecision {
    /// No reminder should be pending.
    Suppressed(SuppressReason),
    /// A reminder should be pending, firing at the given instant.
    Armed { at: DateTime<Utc> },
}

impl TriggerDecision {
    pub fn trigger_at(&self) -> Option<DateTime<Utc>> {
        match self {
            TriggerDecision::Armed { at } => Some(*at),
            TriggerDecision::Suppressed(_) => None,
        }
    }

    pub fn is_armed(&self) -> bool {
        matches!(self, TriggerDecision::Armed { .. })
    }
}

/// Computes the desired reminder state of a subject.
///
/// Policies are pure functions: given the subject, "now" and the user's
/// zone, they return a decision without touching the delivery adapter.
/// Calendar-day arithmetic happens on the zone's wall clock, so a slot
/// keeps its hour across daylight-saving changes.
pub trait TriggerPolicy: Send + Sync {
    fn decide(
        &self,
        subject: &ReminderSubject,
        now: DateTime<FixedOffset>,
        zone: LocalZone,
    ) -> TriggerDecision;
}

/// Default trigger rules.
///
/// - Tasks and products: armed at the requested instant while it lies in
///   the future, suppressed otherwise.
/// - Fixed slots: suppressed once logged; otherwise armed at today's slot
///   hour, rolled forward one calendar day if that moment is not after now.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTriggerPolicy;

impl DefaultTriggerPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl TriggerPolicy for DefaultTriggerPolicy {
    fn decide(
        &self,
        subject: &ReminderSubject,
        now: DateTime<FixedOffset>,
        zone: LocalZone,
    ) -> TriggerDecision {
        match subject {
            ReminderSubject::Task(task) => requested_instant(task.remind_at, now),
            ReminderSubject::Product(product) => requested_instant(product.remind_at, now),
            ReminderSubject::FixedSlot(slot) => fixed_slot(slot, now, zone),
        }
    }
}

fn requested_instant(
    remind_at: Option<DateTime<Utc>>,
    now: DateTime<FixedOffset>,
) -> TriggerDecision {
    match remind_at {
        None => TriggerDecision::Suppressed(SuppressReason::NoReminderRequested),
        // never schedule into the past
        Some(at) if at <= now => TriggerDecision::Suppressed(SuppressReason::InstantPassed),
        Some(at) => TriggerDecision::Armed { at },
    }
}

fn fixed_slot(
    slot: &FixedSlotSubject,
    now: DateTime<FixedOffset>,
    zone: LocalZone,
) -> TriggerDecision {
    if slot.status.is_logged() {
        return TriggerDecision::Suppressed(SuppressReason::SlotLogged {
            status: slot.status,
        });
    }

    let invalid_hour = TriggerDecision::Suppressed(SuppressReason::InvalidReminderHour {
        hour: slot.reminder_hour,
    });
    let today = zone.at(now.with_timezone(&Utc)).date_naive();
    let Some(today_at) = slot_instant(today, slot.reminder_hour, zone) else {
        return invalid_hour;
    };
    if today_at > now {
        return TriggerDecision::Armed {
            at: today_at.with_timezone(&Utc),
        };
    }

    // Today's slot time already passed: same wall-clock hour tomorrow.
    match today
        .checked_add_days(Days::new(1))
        .and_then(|tomorrow| slot_instant(tomorrow, slot.reminder_hour, zone))
    {
        Some(at) => TriggerDecision::Armed {
            at: at.with_timezone(&Utc),
        },
        None => invalid_hour,
    }
}

fn slot_instant(day: NaiveDate, hour: u32, zone: LocalZone) -> Option<DateTime<FixedOffset>> {
    zone.resolve(day.and_hms_opt(hour, 0, 0)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::{ProductEntryId, TaskEntryId};
    use crate::domain::subject::{ProductSubject, SlotOfDay, TaskSubject};
    use chrono::{Duration, TimeZone};
    use chrono_tz::America::New_York;
    use rstest::rstest;
    use ulid::Ulid;

    fn offset() -> FixedOffset {
        FixedOffset::east_opt(2 * 3600).unwrap()
    }

    fn local(day: u32, hour: u32, minute: u32) -> DateTime<FixedOffset> {
        offset().with_ymd_and_hms(2026, 3, day, hour, minute, 0).unwrap()
    }

    fn decide(subject: &ReminderSubject, now: DateTime<FixedOffset>) -> TriggerDecision {
        DefaultTriggerPolicy.decide(subject, now, LocalZone::Fixed(*now.offset()))
    }

    fn slot(slot: SlotOfDay, status: SlotStatus) -> ReminderSubject {
        let day = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        FixedSlotSubject::new(day, slot, status).into()
    }

    fn task(remind_at: Option<DateTime<Utc>>) -> ReminderSubject {
        TaskSubject {
            id: TaskEntryId::from_ulid(Ulid::new()),
            title: "Evening walk".to_string(),
            due_on: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            remind_at,
            completed: false,
        }
        .into()
    }

    fn armed_at(t: DateTime<FixedOffset>) -> TriggerDecision {
        TriggerDecision::Armed {
            at: t.with_timezone(&Utc),
        }
    }

    #[test]
    fn morning_slot_before_eight_arms_today() {
        let decision = decide(&slot(SlotOfDay::Am, SlotStatus::NotLogged), local(10, 7, 0));
        assert_eq!(decision, armed_at(local(10, 8, 0)));
    }

    #[test]
    fn morning_slot_after_eight_arms_tomorrow() {
        let decision = decide(&slot(SlotOfDay::Am, SlotStatus::NotLogged), local(10, 9, 0));
        assert_eq!(decision, armed_at(local(11, 8, 0)));
    }

    #[test]
    fn slot_time_exactly_now_rolls_forward() {
        let decision = decide(&slot(SlotOfDay::Pm, SlotStatus::NotLogged), local(10, 21, 0));
        assert_eq!(decision, armed_at(local(11, 21, 0)));
    }

    #[rstest]
    #[case::am_completed(SlotOfDay::Am, SlotStatus::Completed)]
    #[case::am_skipped(SlotOfDay::Am, SlotStatus::Skipped)]
    #[case::pm_completed(SlotOfDay::Pm, SlotStatus::Completed)]
    #[case::pm_skipped(SlotOfDay::Pm, SlotStatus::Skipped)]
    fn logged_slot_is_always_suppressed(#[case] which: SlotOfDay, #[case] status: SlotStatus) {
        for hour in [0, 7, 8, 9, 20, 21, 23] {
            let decision = decide(&slot(which, status), local(10, hour, 30));
            assert_eq!(
                decision,
                TriggerDecision::Suppressed(SuppressReason::SlotLogged { status })
            );
        }
    }

    #[rstest]
    #[case::midnight(0, 0, 10)]
    #[case::minute_before(20, 59, 10)]
    #[case::minute_after(21, 1, 11)]
    #[case::late(23, 59, 11)]
    fn evening_slot_rolls_only_after_its_hour(
        #[case] hour: u32,
        #[case] minute: u32,
        #[case] expected_day: u32,
    ) {
        let decision = decide(
            &slot(SlotOfDay::Pm, SlotStatus::NotLogged),
            local(10, hour, minute),
        );
        assert_eq!(decision, armed_at(local(expected_day, 21, 0)));
    }

    #[test]
    fn rollover_crosses_month_end() {
        let now = offset().with_ymd_and_hms(2026, 3, 31, 22, 0, 0).unwrap();
        let decision = decide(&slot(SlotOfDay::Pm, SlotStatus::NotLogged), now);
        let expected = offset().with_ymd_and_hms(2026, 4, 1, 21, 0, 0).unwrap();
        assert_eq!(decision, armed_at(expected));
    }

    #[test]
    fn rollover_keeps_the_wall_clock_hour_across_dst() {
        // 22:00 EST the night before clocks go forward
        let now = New_York
            .with_ymd_and_hms(2026, 3, 7, 22, 0, 0)
            .unwrap()
            .fixed_offset();
        let day = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        let subject: ReminderSubject =
            FixedSlotSubject::new(day, SlotOfDay::Pm, SlotStatus::NotLogged).into();

        let decision = DefaultTriggerPolicy.decide(&subject, now, LocalZone::Named(New_York));
        let expected = New_York.with_ymd_and_hms(2026, 3, 8, 21, 0, 0).unwrap();
        assert_eq!(decision.trigger_at(), Some(expected.with_timezone(&Utc)));
        assert_eq!(
            decision.trigger_at().unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 9, 1, 0, 0).unwrap()
        );
    }

    #[test]
    fn slot_hour_skipped_by_dst_fires_when_the_gap_ends() {
        let now = New_York
            .with_ymd_and_hms(2026, 3, 8, 0, 30, 0)
            .unwrap()
            .fixed_offset();
        let day = NaiveDate::from_ymd_opt(2026, 3, 8).unwrap();
        let subject: ReminderSubject =
            FixedSlotSubject::new(day, SlotOfDay::Am, SlotStatus::NotLogged)
                .with_reminder_hour(2)
                .into();

        let decision = DefaultTriggerPolicy.decide(&subject, now, LocalZone::Named(New_York));
        // 02:00 does not exist that night; 03:00 EDT is 07:00 UTC
        assert_eq!(
            decision.trigger_at().unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 8, 7, 0, 0).unwrap()
        );
    }

    #[test]
    fn custom_slot_hour_is_respected() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let subject: ReminderSubject =
            FixedSlotSubject::new(day, SlotOfDay::Am, SlotStatus::NotLogged)
                .with_reminder_hour(6)
                .into();
        let decision = decide(&subject, local(10, 7, 0));
        assert_eq!(decision, armed_at(local(11, 6, 0)));
    }

    #[test]
    fn invalid_slot_hour_is_suppressed() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let subject: ReminderSubject =
            FixedSlotSubject::new(day, SlotOfDay::Am, SlotStatus::NotLogged)
                .with_reminder_hour(24)
                .into();
        assert_eq!(
            decide(&subject, local(10, 7, 0)),
            TriggerDecision::Suppressed(SuppressReason::InvalidReminderHour { hour: 24 })
        );
    }

    #[test]
    fn task_in_the_future_is_armed() {
        let now = local(10, 12, 0);
        let at = (now + Duration::hours(3)).with_timezone(&Utc);
        assert_eq!(decide(&task(Some(at)), now), TriggerDecision::Armed { at });
    }

    #[rstest]
    #[case::exactly_now(0)]
    #[case::a_second_ago(-1)]
    #[case::yesterday(-86_400)]
    fn task_not_in_the_future_is_suppressed(#[case] offset_secs: i64) {
        let now = local(10, 12, 0);
        let at = (now + Duration::seconds(offset_secs)).with_timezone(&Utc);
        assert_eq!(
            decide(&task(Some(at)), now),
            TriggerDecision::Suppressed(SuppressReason::InstantPassed)
        );
    }

    #[test]
    fn task_without_reminder_is_suppressed() {
        assert_eq!(
            decide(&task(None), local(10, 12, 0)),
            TriggerDecision::Suppressed(SuppressReason::NoReminderRequested)
        );
    }

    #[test]
    fn product_follows_requested_instant() {
        let now = local(10, 6, 0);
        let at = local(10, 7, 0).with_timezone(&Utc);
        let product: ReminderSubject = ProductSubject {
            id: ProductEntryId::from_ulid(Ulid::new()),
            product_name: "Vitamin C Serum".to_string(),
            slot: SlotOfDay::Am,
            remind_at: Some(at),
        }
        .into();
        assert_eq!(decide(&product, now), TriggerDecision::Armed { at });
        assert_eq!(
            decide(&product, local(10, 7, 30)),
            TriggerDecision::Suppressed(SuppressReason::InstantPassed)
        );
    }
}
