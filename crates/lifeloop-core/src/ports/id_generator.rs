//! IdGenerator port - minting record identifiers.
//!
//! The persistence layer normally owns id creation; this port exists so the
//! demo binary and tests can create subjects the same way the store does.

use crate::domain::{ProductEntryId, TaskEntryId};
use crate::ports::Clock;
use ulid::Ulid;

/// IdGenerator hands out fresh record ids.
///
/// # Thread Safety
/// - `Send + Sync`, shared across tasks
pub trait IdGenerator: Send + Sync {
    fn task_entry_id(&self) -> TaskEntryId;

    fn product_entry_id(&self) -> ProductEntryId;
}

/// ULID ids stamped with the injected clock.
///
/// With a FixedClock the timestamp part is deterministic; the random part
/// still keeps ids unique.
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    fn next_ulid(&self) -> Ulid {
        let timestamp_ms = self.clock.now().timestamp_millis().max(0) as u64;
        Ulid::from_parts(timestamp_ms, rand::random())
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn task_entry_id(&self) -> TaskEntryId {
        TaskEntryId::from(self.next_ulid())
    }

    fn product_entry_id(&self) -> ProductEntryId {
        ProductEntryId::from(self.next_ulid())
    }
}
