//! EngineBuilder - wiring the engine from its ports.
//!
//! The engine is built once at process start and passed to callers
//! explicitly; there is no global instance.
//!
//! # Fail-fast
//! - the delivery adapter and the permission prompt are mandatory
//! - the fixed-slot model needs a slot status source
//! - the config (slot hours, time zone) is validated before anything is wired

use std::sync::Arc;

use super::engine::ReminderEngine;
use super::gate::AuthorizationGate;
use crate::config::{ConfigError, ReminderConfig, SkincareModel};
use crate::domain::{DefaultTriggerPolicy, TriggerPolicy};
use crate::ports::{
    Clock, DeliveryAdapter, NotificationPermissions, SlotStatusSource, SystemClock,
};

/// BuildError is raised when the engine cannot be wired.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing component: {0}. Register it on the builder before build().")]
    MissingComponent(&'static str),

    #[error("The fixed-slot skincare model needs a slot status source.")]
    MissingSlotSource,

    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
}

/// # Example
/// ```ignore
/// let engine = EngineBuilder::new()
///     .config(ReminderConfig::load("lifeloop.toml")?)
///     .delivery(Arc::new(platform_center))
///     .permissions(Arc::new(platform_prompt))
///     .slot_source(Arc::new(store))
///     .build()?;
/// ```
#[derive(Default)]
pub struct EngineBuilder {
    config: ReminderConfig,
    delivery: Option<Arc<dyn DeliveryAdapter>>,
    permissions: Option<Arc<dyn NotificationPermissions>>,
    clock: Option<Arc<dyn Clock>>,
    policy: Option<Arc<dyn TriggerPolicy>>,
    slot_source: Option<Arc<dyn SlotStatusSource>>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: ReminderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn delivery(mut self, delivery: Arc<dyn DeliveryAdapter>) -> Self {
        self.delivery = Some(delivery);
        self
    }

    pub fn permissions(mut self, permissions: Arc<dyn NotificationPermissions>) -> Self {
        self.permissions = Some(permissions);
        self
    }

    /// Defaults to the system clock, read in the configured time zone.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Defaults to `DefaultTriggerPolicy`.
    pub fn policy(mut self, policy: Arc<dyn TriggerPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn slot_source(mut self, source: Arc<dyn SlotStatusSource>) -> Self {
        self.slot_source = Some(source);
        self
    }

    pub fn build(self) -> Result<ReminderEngine, BuildError> {
        self.config.validate()?;
        let delivery = self
            .delivery
            .ok_or(BuildError::MissingComponent("delivery adapter"))?;
        let permissions = self
            .permissions
            .ok_or(BuildError::MissingComponent("notification permissions"))?;
        if self.config.skincare_model == SkincareModel::FixedSlots && self.slot_source.is_none() {
            return Err(BuildError::MissingSlotSource);
        }

        let zone = self.config.local_zone()?;
        let mut gate = AuthorizationGate::new(permissions);
        if !self.config.auto_request_authorization {
            gate = gate.without_auto_prompt();
        }

        Ok(ReminderEngine::from_parts(
            delivery,
            Arc::new(gate),
            self.clock
                .unwrap_or_else(|| Arc::new(SystemClock::in_zone(zone))),
            self.policy.unwrap_or_else(|| Arc::new(DefaultTriggerPolicy::new())),
            self.slot_source,
            self.config,
        ))
    }
}
