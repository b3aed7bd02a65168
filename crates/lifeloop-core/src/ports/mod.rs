//! Ports - boundaries to the collaborators the engine does not own.
//!
//! Each trait hides one external system: the OS notification service, the
//! permission prompt, the persisted slot log, the wall clock. The engine
//! only talks to these traits, so tests plug in the in-memory versions
//! from `impls`.

pub mod clock;
pub mod delivery_adapter;
pub mod id_generator;
pub mod permissions;
pub mod slot_source;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::delivery_adapter::{DeliveryAdapter, DeliveryError};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::permissions::{NotificationPermissions, PermissionError, PlatformAuthorization};
pub use self::slot_source::{SlotStatusSource, SourceError};
