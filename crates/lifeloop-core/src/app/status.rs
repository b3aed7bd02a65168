//! Status - what the engine believes is pending.
//!
//! Built from the engine's own last-applied decisions, never from the
//! delivery adapter.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::gate::AuthorizationState;
use crate::config::SkincareModel;
use crate::domain::{DeliveryId, SubjectKind};

/// A reminder the engine last scheduled successfully and that has not
/// reached its trigger instant yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedReminder {
    pub id: DeliveryId,
    pub kind: SubjectKind,
    pub trigger_at: DateTime<Utc>,
}

/// Snapshot of engine state.
///
/// # Example
/// ```ignore
/// let status = engine.status().await;
/// println!("{}", serde_json::to_string_pretty(&status)?);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineStatus {
    pub authorization: AuthorizationState,
    pub skincare_model: SkincareModel,
    /// Ordered by delivery id.
    pub reminders: Vec<AppliedReminder>,
}
