//! lifeloop-core
//!
//! Reminder scheduling engine for the Lifeloop daily log.
//!
//! Decides, for every reminder-eligible record (a task, a skincare product
//! entry, or a fixed morning/evening skincare slot), whether a local
//! notification should be pending and when it fires, and keeps the
//! platform notification service in line with that decision.
//!
//! # Modules
//! - **domain**: subjects, identifiers, trigger decisions, payloads, errors
//! - **ports**: Clock, DeliveryAdapter, NotificationPermissions, SlotStatusSource, IdGenerator
//! - **app**: AuthorizationGate, ReminderEngine, EngineBuilder, RecheckLoop
//! - **impls**: in-memory ports for tests and the demo binary
//! - **config**: TOML configuration

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{EngineBuilder, ReminderEngine};
pub use config::ReminderConfig;
