//! Domain model: subjects, identifiers, trigger decisions, payloads and
//! the local time zone they are evaluated in.

pub mod decision;
pub mod errors;
pub mod events;
pub mod ids;
pub mod payload;
pub mod subject;
pub mod zone;

pub use decision::{DefaultTriggerPolicy, SuppressReason, TriggerDecision, TriggerPolicy};
pub use errors::ReminderError;
pub use events::SubjectEvent;
pub use ids::{DeliveryId, ProductEntryId, SubjectKey, SubjectKind, TaskEntryId};
pub use payload::ReminderPayload;
pub use subject::{
    FixedSlotSubject, ProductSubject, ReminderSubject, SlotOfDay, SlotStatus, TaskSubject,
};
pub use zone::LocalZone;
