//! LocalZone - the user's time zone, used for calendar arithmetic.
//!
//! Slot reminders fire at a wall-clock hour ("21:00 every evening"). A UTC
//! offset alone cannot place tomorrow's 21:00: on the night before a
//! daylight-saving change, tomorrow's offset differs from today's.
//! `LocalZone` resolves a local date and time against the zone's rules.
//!
//! # Resolution rules
//! - unambiguous wall-clock time: that instant
//! - repeated hour (clocks go back): the earlier of the two instants
//! - skipped hour (clocks go forward): the first valid minute after the gap

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Widest zone gap searched for a valid wall-clock time.
const MAX_GAP_MINUTES: i64 = 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalZone {
    /// The machine's local zone.
    System,
    /// A constant offset without daylight saving.
    Fixed(FixedOffset),
    /// An IANA zone such as `America/New_York`.
    Named(Tz),
}

impl LocalZone {
    /// The instant `at` as seen on this zone's wall clock.
    pub fn at(&self, at: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            LocalZone::System => at.with_timezone(&Local).fixed_offset(),
            LocalZone::Fixed(offset) => at.with_timezone(offset),
            LocalZone::Named(tz) => at.with_timezone(tz).fixed_offset(),
        }
    }

    /// Resolve a wall-clock time in this zone to an instant.
    pub fn resolve(&self, local: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            LocalZone::System => resolve_in(&Local, local),
            LocalZone::Fixed(offset) => resolve_in(offset, local),
            LocalZone::Named(tz) => resolve_in(tz, local),
        }
    }
}

impl From<FixedOffset> for LocalZone {
    fn from(offset: FixedOffset) -> Self {
        LocalZone::Fixed(offset)
    }
}

impl From<Tz> for LocalZone {
    fn from(tz: Tz) -> Self {
        LocalZone::Named(tz)
    }
}

fn resolve_in<Z: TimeZone>(zone: &Z, local: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
    (0..=MAX_GAP_MINUTES)
        .find_map(|minutes| {
            let candidate = local.checked_add_signed(Duration::minutes(minutes))?;
            zone.from_local_datetime(&candidate).earliest()
        })
        .map(|at| at.fixed_offset())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use chrono_tz::America::New_York;

    fn wall(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn named_zone_follows_daylight_saving() {
        let zone = LocalZone::Named(New_York);
        // EST (-05:00) on the 7th, EDT (-04:00) on the 8th
        let before = zone.resolve(wall(2026, 3, 7, 21, 0)).unwrap();
        let after = zone.resolve(wall(2026, 3, 8, 21, 0)).unwrap();
        assert_eq!(before.with_timezone(&Utc), utc(2026, 3, 8, 2, 0));
        assert_eq!(after.with_timezone(&Utc), utc(2026, 3, 9, 1, 0));
    }

    #[test]
    fn skipped_hour_resolves_to_end_of_gap() {
        let zone = LocalZone::Named(New_York);
        let at = zone.resolve(wall(2026, 3, 8, 2, 0)).unwrap();
        assert_eq!(at.with_timezone(&Utc), utc(2026, 3, 8, 7, 0));
        assert_eq!(at.naive_local(), wall(2026, 3, 8, 3, 0));
    }

    #[test]
    fn repeated_hour_takes_the_earlier_instant() {
        let zone = LocalZone::Named(New_York);
        let at = zone.resolve(wall(2026, 11, 1, 1, 0)).unwrap();
        assert_eq!(at.with_timezone(&Utc), utc(2026, 11, 1, 5, 0));
    }

    #[test]
    fn fixed_zone_is_a_plain_offset() {
        let offset = FixedOffset::east_opt(9 * 3600).unwrap();
        let zone = LocalZone::from(offset);
        let at = zone.resolve(wall(2026, 1, 17, 8, 0)).unwrap();
        assert_eq!(at.with_timezone(&Utc), utc(2026, 1, 16, 23, 0));
        assert_eq!(zone.at(utc(2026, 1, 16, 23, 0)), at);
    }
}
