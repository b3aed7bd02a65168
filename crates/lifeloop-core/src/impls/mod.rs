//! Impls - in-memory implementations of the ports.
//!
//! Used by the tests and the demo binary. Platform adapters (the real
//! notification center, the real store) live with the host application.

pub mod inmem_delivery;
pub mod permissions;
pub mod slot_log;

pub use self::inmem_delivery::{DeliveryCall, InMemoryDeliveryAdapter, PendingReminder};
pub use self::permissions::{PromptAnswer, ScriptedPermissions};
pub use self::slot_log::InMemorySlotLog;
