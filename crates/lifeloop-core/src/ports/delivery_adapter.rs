//! DeliveryAdapter port - the OS-level local notification service.
//!
//! The service keeps at most one pending one-shot trigger per identifier
//! and calls back at or after the trigger time. Replacing a pending
//! trigger is always done as cancel-then-schedule by the engine.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{DeliveryId, ReminderPayload};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The service rejected the request (duplicate id, bad trigger, ...).
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The service could not take the request right now (resource exhaustion, ...).
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

/// DeliveryAdapter schedules and cancels one-shot local notifications.
///
/// # Contract
/// - `cancel` is a no-op when nothing is pending for the id
/// - `schedule` expects no pending trigger for the id
/// - every call may suspend (crosses a service boundary)
#[async_trait]
pub trait DeliveryAdapter: Send + Sync {
    async fn schedule(
        &self,
        id: &DeliveryId,
        trigger_at: DateTime<Utc>,
        payload: &ReminderPayload,
    ) -> Result<(), DeliveryError>;

    async fn cancel(&self, id: &DeliveryId) -> Result<(), DeliveryError>;

    async fn cancel_all(&self) -> Result<(), DeliveryError>;
}
