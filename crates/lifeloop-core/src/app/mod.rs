//! App - the reminder scheduling engine built from the ports.
//!
//! # Components
//! - **AuthorizationGate**: whether notifications may be delivered at all
//! - **ReminderEngine**: reconciliation of subjects against the delivery adapter
//! - **EngineBuilder**: wiring and fail-fast validation
//! - **RecheckLoop**: periodic re-check of the fixed slots
//! - **EngineStatus**: snapshot of last-applied decisions

pub mod builder;
pub mod engine;
pub mod gate;
pub mod recheck_loop;
pub mod status;

pub use self::builder::{BuildError, EngineBuilder};
pub use self::engine::{
    ClearReason, Effect, Plan, ReconcileOutcome, ReconcileReport, ReminderEngine, SkipReason,
};
pub use self::gate::{AuthorizationGate, AuthorizationState};
pub use self::recheck_loop::{RecheckHandle, RecheckLoop};
pub use self::status::{AppliedReminder, EngineStatus};
