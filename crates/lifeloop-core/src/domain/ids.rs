//! Subject identifiers and delivery identifiers.
//!
//! Record identifiers are ULIDs wrapped in a phantom-typed `Id<T>`, so a
//! task id and a product-entry id cannot be mixed up at compile time. The
//! `Display` prefix of each id type is the prefix of its delivery
//! identifier, which makes `SubjectKey::delivery_id` a plain formatting step.
//!
//! # Delivery identifier scheme
//! - `task-<ulid>` for tasks
//! - `skincare-<ulid>` for per-product skincare entries
//! - `skincare-slot-AM` / `skincare-slot-PM` for the fixed daily slots
//!
//! A ULID renders as 26 Crockford base32 characters, so `skincare-<ulid>`
//! can never spell `skincare-slot-AM`. The mapping is injective.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use ulid::Ulid;

use super::subject::SlotOfDay;

/// Marker trait for each record id type.
pub trait IdMarker: Send + Sync + 'static {
    /// Display prefix, also the delivery identifier prefix (e.g. "task-").
    fn prefix() -> &'static str;
}

/// Generic record id.
///
/// # Example
/// ```ignore
/// let task: TaskEntryId = Id::from(Ulid::new());
/// let product: ProductEntryId = Id::from(Ulid::new());
/// // different types, cannot be confused
/// ```
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

/// Task entry marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskEntry {}

impl IdMarker for TaskEntry {
    fn prefix() -> &'static str {
        "task-"
    }
}

/// Skincare product entry marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProductEntry {}

impl IdMarker for ProductEntry {
    fn prefix() -> &'static str {
        "skincare-"
    }
}

/// Identifier of a task record.
pub type TaskEntryId = Id<TaskEntry>;

/// Identifier of a skincare product entry record.
pub type ProductEntryId = Id<ProductEntry>;

/// Which variant of subject a key or reminder belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    Task,
    Product,
    FixedSlot,
}

/// Stable key of a reminder subject: enough to find its pending reminder
/// without the rest of the record (deletion events carry only this).
///
/// # Fixed slots
/// A slot record is keyed by `(day, slot)`, but its delivery id depends on
/// the slot alone: there is at most one future trigger per slot. The day
/// stays in the key so the engine can tell today's record from another
/// day's, which must not touch the shared delivery id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "key", rename_all = "snake_case")]
pub enum SubjectKey {
    Task(TaskEntryId),
    Product(ProductEntryId),
    FixedSlot { day: NaiveDate, slot: SlotOfDay },
}

impl SubjectKey {
    pub fn kind(&self) -> SubjectKind {
        match self {
            SubjectKey::Task(_) => SubjectKind::Task,
            SubjectKey::Product(_) => SubjectKind::Product,
            SubjectKey::FixedSlot { .. } => SubjectKind::FixedSlot,
        }
    }

    /// Deterministic, injective delivery identifier for this subject.
    pub fn delivery_id(&self) -> DeliveryId {
        match self {
            SubjectKey::Task(id) => DeliveryId(id.to_string()),
            SubjectKey::Product(id) => DeliveryId(id.to_string()),
            SubjectKey::FixedSlot { slot, .. } => DeliveryId::fixed_slot(*slot),
        }
    }
}

/// Identifier handed to the delivery adapter. At most one pending reminder
/// exists per delivery id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeliveryId(String);

impl DeliveryId {
    /// Delivery id shared by every day's record of `slot`.
    pub fn fixed_slot(slot: SlotOfDay) -> Self {
        DeliveryId(format!("skincare-slot-{}", slot.code()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeliveryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn slot_key(d: u32, slot: SlotOfDay) -> SubjectKey {
        let day = NaiveDate::from_ymd_opt(2026, 1, d).unwrap();
        SubjectKey::FixedSlot { day, slot }
    }

    #[test]
    fn delivery_ids_follow_the_scheme() {
        let ulid = Ulid::new();
        let task = SubjectKey::Task(TaskEntryId::from_ulid(ulid));
        let product = SubjectKey::Product(ProductEntryId::from_ulid(ulid));

        assert_eq!(task.delivery_id().as_str(), format!("task-{ulid}"));
        assert_eq!(product.delivery_id().as_str(), format!("skincare-{ulid}"));
        assert_eq!(DeliveryId::fixed_slot(SlotOfDay::Am).as_str(), "skincare-slot-AM");
        assert_eq!(DeliveryId::fixed_slot(SlotOfDay::Pm).as_str(), "skincare-slot-PM");
    }

    #[test]
    fn same_ulid_under_different_kinds_gives_distinct_ids() {
        let ulid = Ulid::new();
        let keys = [
            SubjectKey::Task(ulid.into()),
            SubjectKey::Product(ulid.into()),
            slot_key(17, SlotOfDay::Am),
            slot_key(17, SlotOfDay::Pm),
        ];
        let ids: HashSet<DeliveryId> = keys.iter().map(SubjectKey::delivery_id).collect();
        assert_eq!(ids.len(), keys.len());
    }

    #[test]
    fn slot_records_of_different_days_share_one_delivery_id() {
        let today = slot_key(17, SlotOfDay::Am);
        let yesterday = slot_key(16, SlotOfDay::Am);
        assert_ne!(today, yesterday);
        assert_eq!(today.delivery_id(), yesterday.delivery_id());
    }

    #[test]
    fn delivery_id_is_stable_for_the_same_key() {
        let id = TaskEntryId::from_ulid(Ulid::new());
        assert_eq!(
            SubjectKey::Task(id).delivery_id(),
            SubjectKey::Task(id).delivery_id()
        );
    }

    #[test]
    fn phantom_marker_costs_nothing() {
        assert_eq!(std::mem::size_of::<TaskEntryId>(), std::mem::size_of::<Ulid>());
        assert_eq!(std::mem::size_of::<ProductEntryId>(), 16);
    }

    #[test]
    fn subject_key_serializes_tagged() {
        let key = slot_key(17, SlotOfDay::Pm);
        let v = serde_json::to_value(key).unwrap();
        assert_eq!(v["kind"], "fixed_slot");
        assert_eq!(v["key"]["day"], "2026-01-17");
        assert_eq!(v["key"]["slot"], "PM");
    }
}
