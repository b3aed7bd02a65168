//! Clock port - wall-clock time in the user's time zone.
//!
//! The zone matters: slot reminders are computed on the local calendar, and
//! tomorrow's slot time has to be placed with tomorrow's offset, not today's.

use chrono::{DateTime, FixedOffset, Utc};
use std::sync::{Arc, Mutex};

use crate::domain::LocalZone;

/// Clock provides "now" and the zone it is read in.
///
/// # Contract
/// - `now()` is `zone().at(<current instant>)`: its offset is the zone's
///   offset at that instant
///
/// # Testability
/// - tests swap in FixedClock and move it by hand
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;

    fn zone(&self) -> LocalZone;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> DateTime<FixedOffset> {
        (**self).now()
    }

    fn zone(&self) -> LocalZone {
        (**self).zone()
    }
}

/// System wall clock, read in the machine's zone unless told otherwise.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    zone: LocalZone,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::in_zone(LocalZone::System)
    }

    pub fn in_zone(zone: LocalZone) -> Self {
        Self { zone }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.zone.at(Utc::now())
    }

    fn zone(&self) -> LocalZone {
        self.zone
    }
}

/// Clock that only moves when told to.
///
/// Keeps the instant in UTC and renders it through its zone, so moving
/// across a daylight-saving change picks up the new offset.
#[derive(Debug)]
pub struct FixedClock {
    zone: LocalZone,
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// A clock pinned to `now`, in a zone with `now`'s constant offset.
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self::in_zone(LocalZone::Fixed(*now.offset()), now.with_timezone(&Utc))
    }

    pub fn in_zone(zone: LocalZone, now: DateTime<Utc>) -> Self {
        Self {
            zone,
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<FixedOffset>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now.with_timezone(&Utc);
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut guard = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *guard += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.zone.at(*self.now.lock().unwrap_or_else(|e| e.into_inner()))
    }

    fn zone(&self) -> LocalZone {
        self.zone
    }
}
