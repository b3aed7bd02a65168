//! InMemoryDeliveryAdapter - development/test stand-in for the OS
//! notification service.
//!
//! Behaves like the real service where it matters for the engine:
//! - at most one pending trigger per id; scheduling over a pending id is rejected
//! - cancel of an unknown id is a no-op
//! - `deliver_due` fires (and consumes) every trigger at or before a given time
//!
//! It also records every call so tests can assert on the exact sequence,
//! and can be told to fail the next schedule, cancel or cancel-all call.

use std::collections::{BTreeMap, VecDeque};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::domain::{DeliveryId, ReminderPayload};
use crate::ports::{DeliveryAdapter, DeliveryError};

/// A trigger waiting to fire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingReminder {
    pub id: DeliveryId,
    pub trigger_at: DateTime<Utc>,
    pub payload: ReminderPayload,
}

/// One call received by the adapter, successful or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryCall {
    Schedule { id: DeliveryId, trigger_at: DateTime<Utc> },
    Cancel(DeliveryId),
    CancelAll,
}

#[derive(Default)]
struct AdapterState {
    pending: BTreeMap<DeliveryId, PendingReminder>,
    calls: Vec<DeliveryCall>,
    schedule_failures: VecDeque<DeliveryError>,
    cancel_failures: VecDeque<DeliveryError>,
    cancel_all_failures: VecDeque<DeliveryError>,
}

#[derive(Default)]
pub struct InMemoryDeliveryAdapter {
    state: Mutex<AdapterState>,
}

impl InMemoryDeliveryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of pending triggers, ordered by id.
    pub async fn pending(&self) -> Vec<PendingReminder> {
        self.state.lock().await.pending.values().cloned().collect()
    }

    pub async fn pending_for(&self, id: &DeliveryId) -> Option<PendingReminder> {
        self.state.lock().await.pending.get(id).cloned()
    }

    /// Every call received so far, in arrival order.
    pub async fn calls(&self) -> Vec<DeliveryCall> {
        self.state.lock().await.calls.clone()
    }

    pub async fn clear_calls(&self) {
        self.state.lock().await.calls.clear();
    }

    /// Make the next `schedule` call fail with `error`.
    pub async fn fail_next_schedule(&self, error: DeliveryError) {
        self.state.lock().await.schedule_failures.push_back(error);
    }

    /// Make the next `cancel` call fail with `error`.
    pub async fn fail_next_cancel(&self, error: DeliveryError) {
        self.state.lock().await.cancel_failures.push_back(error);
    }

    /// Make the next `cancel_all` call fail with `error`.
    pub async fn fail_next_cancel_all(&self, error: DeliveryError) {
        self.state.lock().await.cancel_all_failures.push_back(error);
    }

    /// Fire every trigger due at `now`. Fired triggers are consumed, like
    /// a delivered one-shot notification.
    pub async fn deliver_due(&self, now: DateTime<Utc>) -> Vec<PendingReminder> {
        let mut state = self.state.lock().await;
        let due: Vec<DeliveryId> = state
            .pending
            .values()
            .filter(|p| p.trigger_at <= now)
            .map(|p| p.id.clone())
            .collect();
        due.iter()
            .filter_map(|id| state.pending.remove(id))
            .collect()
    }
}

#[async_trait]
impl DeliveryAdapter for InMemoryDeliveryAdapter {
    async fn schedule(
        &self,
        id: &DeliveryId,
        trigger_at: DateTime<Utc>,
        payload: &ReminderPayload,
    ) -> Result<(), DeliveryError> {
        let mut state = self.state.lock().await;
        state.calls.push(DeliveryCall::Schedule {
            id: id.clone(),
            trigger_at,
        });
        if let Some(error) = state.schedule_failures.pop_front() {
            return Err(error);
        }
        if state.pending.contains_key(id) {
            return Err(DeliveryError::Rejected(format!("{id} is already pending")));
        }
        state.pending.insert(
            id.clone(),
            PendingReminder {
                id: id.clone(),
                trigger_at,
                payload: payload.clone(),
            },
        );
        Ok(())
    }

    async fn cancel(&self, id: &DeliveryId) -> Result<(), DeliveryError> {
        let mut state = self.state.lock().await;
        state.calls.push(DeliveryCall::Cancel(id.clone()));
        if let Some(error) = state.cancel_failures.pop_front() {
            return Err(error);
        }
        state.pending.remove(id);
        Ok(())
    }

    async fn cancel_all(&self) -> Result<(), DeliveryError> {
        let mut state = self.state.lock().await;
        state.calls.push(DeliveryCall::CancelAll);
        if let Some(error) = state.cancel_all_failures.pop_front() {
            return Err(error);
        }
        state.pending.clear();
        Ok(())
    }
}
