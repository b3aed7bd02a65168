//! InMemorySlotLog - skincare slot statuses keyed by (day, slot).
//!
//! Stands in for the app's store in tests and in the demo binary.
//!
//! # Behaviour
//! - a missing entry reads as `Ok(None)` (not logged)
//! - `set_unavailable` makes every read fail, to exercise the engine's
//!   "leave the reminder alone" path

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use crate::domain::{SlotOfDay, SlotStatus};
use crate::ports::{SlotStatusSource, SourceError};

/// # Thread Safety
/// - entries and the failure switch sit behind separate tokio mutexes;
///   a read takes them one after the other, never both at once
#[derive(Default)]
pub struct InMemorySlotLog {
    entries: Mutex<HashMap<(NaiveDate, SlotOfDay), SlotStatus>>,
    unavailable: Mutex<Option<String>>,
}

impl InMemorySlotLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log `status` for the slot, replacing any earlier entry.
    pub async fn set(&self, day: NaiveDate, slot: SlotOfDay, status: SlotStatus) {
        self.entries.lock().await.insert((day, slot), status);
    }

    pub async fn remove(&self, day: NaiveDate, slot: SlotOfDay) {
        self.entries.lock().await.remove(&(day, slot));
    }

    /// Make every query fail until `None` is set again.
    pub async fn set_unavailable(&self, reason: Option<String>) {
        *self.unavailable.lock().await = reason;
    }
}

#[async_trait]
impl SlotStatusSource for InMemorySlotLog {
    async fn slot_status(
        &self,
        day: NaiveDate,
        slot: SlotOfDay,
    ) -> Result<Option<SlotStatus>, SourceError> {
        if let Some(reason) = self.unavailable.lock().await.clone() {
            return Err(SourceError(reason));
        }
        Ok(self.entries.lock().await.get(&(day, slot)).copied())
    }
}
