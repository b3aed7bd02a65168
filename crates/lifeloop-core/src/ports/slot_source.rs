//! SlotStatusSource port - read access to the persisted skincare slot log.
//!
//! The slot log lives in the app's store. The engine only reads it, on
//! activation and on the periodic re-check, to rebuild today's two slot
//! subjects; writes reach the engine as `SubjectEvent`s instead.
//!
//! # Implementations
//! - `impls::InMemorySlotLog`: in-process log for tests and the demo binary

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{SlotOfDay, SlotStatus};

/// The store could not answer. The engine leaves the slot's reminder as it
/// is and reports a warning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("slot store query failed: {0}")]
pub struct SourceError(pub String);

/// SlotStatusSource looks up the status logged for a slot on a day.
///
/// # Contract
/// - `Ok(None)` means no record exists, which counts as not logged
/// - `Err` means the store could not answer; callers must not read it as
///   "not logged"
/// - reads have no side effects and may run concurrently
#[async_trait]
pub trait SlotStatusSource: Send + Sync {
    async fn slot_status(
        &self,
        day: NaiveDate,
        slot: SlotOfDay,
    ) -> Result<Option<SlotStatus>, SourceError>;
}
