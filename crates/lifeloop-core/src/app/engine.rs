//! ReminderEngine - converges the delivery adapter to the desired reminders.
//!
//! # Flow of `reconcile`
//! 1. Take the per-delivery-id lock (FIFO, so calls for one id apply in
//!    call order; different ids run concurrently)
//! 2. Evaluate the trigger policy against the clock
//! 3. Armed: ask the authorization gate (may prompt once per process)
//! 4. Emit `cancel(id)`, plus `schedule(id, at, payload)` when armed
//! 5. Record the applied decision; collect adapter failures as warnings
//!
//! The engine never reads the adapter back. Its own last-applied decision
//! is the source of truth, and cancel-before-schedule keeps every call
//! idempotent regardless of what the adapter currently holds.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use super::gate::{AuthorizationGate, AuthorizationState};
use super::status::{AppliedReminder, EngineStatus};
use crate::config::{ReminderConfig, SkincareModel};
use crate::domain::{
    DeliveryId, FixedSlotSubject, ReminderError, ReminderPayload, ReminderSubject, SlotOfDay,
    SubjectEvent, SubjectKey, SubjectKind, SuppressReason, TriggerDecision, TriggerPolicy,
};
use crate::ports::{Clock, DeliveryAdapter, DeliveryError, SlotStatusSource};

/// One call the engine issues to the delivery adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    Cancel {
        id: DeliveryId,
    },
    Schedule {
        id: DeliveryId,
        trigger_at: DateTime<Utc>,
        payload: ReminderPayload,
    },
}

/// Why a subject ends up with no pending reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "cleared", rename_all = "snake_case")]
pub enum ClearReason {
    Deleted,
    Suppressed(SuppressReason),
    NotAuthorized,
}

/// Why an event was ignored without touching the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "skipped", rename_all = "snake_case")]
pub enum SkipReason {
    /// The subject belongs to the skincare model that is not active.
    InactiveModel,
    /// A slot record for a day other than the current one.
    OtherDay { day: NaiveDate },
    /// The slot log could not be read.
    SourceUnavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReconcileOutcome {
    Armed { at: DateTime<Utc> },
    Cleared { reason: ClearReason },
    Skipped { reason: SkipReason },
}

/// Effects planned for one event, before any adapter call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub id: DeliveryId,
    pub outcome: ReconcileOutcome,
    pub effects: Vec<Effect>,
}

/// Result of one reconciliation, handed back so callers can surface
/// failures as non-blocking warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileReport {
    pub id: DeliveryId,
    pub outcome: ReconcileOutcome,
    /// Effects issued to the adapter, in order. Stops at the first failure.
    pub effects: Vec<Effect>,
    pub warnings: Vec<ReminderError>,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

enum Evaluation {
    Skip(SkipReason),
    Clear(ClearReason),
    Arm {
        at: DateTime<Utc>,
        payload: ReminderPayload,
    },
}

/// Converges the delivery adapter to the reminders the trigger policy
/// wants, one subject at a time.
///
/// # Thread Safety
/// - calls for one delivery id run one at a time, in call order
/// - calls for different ids run concurrently
/// - `remove_all` waits for in-flight calls and holds new ones back until
///   the adapter and the ledger are both cleared
pub struct ReminderEngine {
    delivery: Arc<dyn DeliveryAdapter>,
    gate: Arc<AuthorizationGate>,
    clock: Arc<dyn Clock>,
    policy: Arc<dyn TriggerPolicy>,
    slot_source: Option<Arc<dyn SlotStatusSource>>,
    config: ReminderConfig,
    locks: KeyedLocks,
    // reconciles share it, a full reset takes it exclusively
    reset: RwLock<()>,
    applied: Mutex<BTreeMap<DeliveryId, AppliedReminder>>,
}

impl ReminderEngine {
    pub(crate) fn from_parts(
        delivery: Arc<dyn DeliveryAdapter>,
        gate: Arc<AuthorizationGate>,
        clock: Arc<dyn Clock>,
        policy: Arc<dyn TriggerPolicy>,
        slot_source: Option<Arc<dyn SlotStatusSource>>,
        config: ReminderConfig,
    ) -> Self {
        Self {
            delivery,
            gate,
            clock,
            policy,
            slot_source,
            config,
            locks: KeyedLocks::default(),
            reset: RwLock::new(()),
            applied: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn config(&self) -> &ReminderConfig {
        &self.config
    }

    pub fn gate(&self) -> &AuthorizationGate {
        &self.gate
    }

    /// Explicit user request for notification permission.
    pub async fn request_authorization(&self) -> AuthorizationState {
        self.gate.request_authorization().await
    }

    /// Converge the pending reminder of one subject after a create, update
    /// or delete.
    pub async fn reconcile(&self, event: SubjectEvent) -> ReconcileReport {
        let _pass = self.reset.read().await;
        let id = event.key().delivery_id();
        let _guard = self.locks.lock(&id).await;

        let now = self.clock.now();
        let evaluation = self.evaluate(&event, now);
        let authorized = match evaluation {
            Evaluation::Arm { .. } => self.gate.authorize_for_scheduling().await,
            _ => true,
        };
        let plan = plan_for(id, evaluation, authorized);
        tracing::debug!(delivery_id = %plan.id, outcome = ?plan.outcome, "reminder planned");

        let mut warnings = Vec::new();
        if plan.outcome == cleared(ClearReason::NotAuthorized) {
            warnings.push(ReminderError::AuthorizationDenied(plan.id.clone()));
        }

        let (issued, failure) = self.apply(&plan.effects).await;
        self.record(&plan, event.key().kind(), failure.is_some(), now).await;
        if let Some((id, source)) = failure {
            warnings.push(ReminderError::Delivery { id, source });
        }

        ReconcileReport {
            id: plan.id,
            outcome: plan.outcome,
            effects: issued,
            warnings,
        }
    }

    /// Plan the effects for an event without calling the adapter or the
    /// gate. `authorized` stands in for the gate's answer.
    pub fn plan(&self, event: &SubjectEvent, now: DateTime<FixedOffset>, authorized: bool) -> Plan {
        plan_for(
            event.key().delivery_id(),
            self.evaluate(event, now),
            authorized,
        )
    }

    /// App foreground/activation: re-validate permission, then re-check the
    /// fixed slots for the current day.
    pub async fn on_activation(&self) -> Vec<ReconcileReport> {
        let state = self.gate.refresh_status().await;
        tracing::debug!(authorization = ?state, "activation re-check");
        self.recheck_fixed_slots().await
    }

    /// Reconcile both fixed slots of the current day from the slot log.
    /// Catches day rollovers and slots that elapsed while nobody looked.
    pub async fn recheck_fixed_slots(&self) -> Vec<ReconcileReport> {
        if self.config.skincare_model != SkincareModel::FixedSlots {
            return Vec::new();
        }
        let Some(source) = self.slot_source.clone() else {
            return Vec::new();
        };

        let today = self.today(self.clock.now());
        let mut reports = Vec::with_capacity(SlotOfDay::ALL.len());
        for slot in SlotOfDay::ALL {
            match source.slot_status(today, slot).await {
                Ok(status) => {
                    let subject = FixedSlotSubject::new(today, slot, status.unwrap_or_default());
                    reports.push(self.reconcile(SubjectEvent::upserted(subject)).await);
                }
                Err(e) => {
                    tracing::warn!(
                        slot = %slot,
                        error = %e,
                        "slot status unavailable, leaving reminder as is"
                    );
                    reports.push(ReconcileReport {
                        id: DeliveryId::fixed_slot(slot),
                        outcome: ReconcileOutcome::Skipped {
                            reason: SkipReason::SourceUnavailable,
                        },
                        effects: Vec::new(),
                        warnings: vec![ReminderError::Source(e)],
                    });
                }
            }
        }
        reports
    }

    /// Full reset: clear every pending reminder, then forget applied
    /// decisions. On failure the ledger is left as it was.
    pub async fn remove_all(&self) -> Result<(), DeliveryError> {
        let _reset = self.reset.write().await;
        self.delivery.cancel_all().await.inspect_err(|e| {
            tracing::warn!(error = %e, "failed to clear pending reminders");
        })?;
        self.applied.lock().await.clear();
        Ok(())
    }

    /// Reminders still waiting to fire, as last applied by the engine.
    pub async fn status(&self) -> EngineStatus {
        let now = self.clock.now();
        let authorization = self.gate.state().await;
        let mut applied = self.applied.lock().await;
        prune_fired(&mut applied, now);
        EngineStatus {
            authorization,
            skincare_model: self.config.skincare_model,
            reminders: applied.values().cloned().collect(),
        }
    }

    fn today(&self, now: DateTime<FixedOffset>) -> NaiveDate {
        self.clock.zone().at(now.with_timezone(&Utc)).date_naive()
    }

    fn evaluate(&self, event: &SubjectEvent, now: DateTime<FixedOffset>) -> Evaluation {
        let key = event.key();
        // Every day's slot record shares the slot's delivery id; only
        // today's record may touch it, whether upserted or deleted.
        if let SubjectKey::FixedSlot { day, .. } = key {
            if day != self.today(now) {
                return Evaluation::Skip(SkipReason::OtherDay { day });
            }
        }

        let model_active = match key.kind() {
            SubjectKind::Task => true,
            SubjectKind::Product => self.config.skincare_model == SkincareModel::PerProduct,
            SubjectKind::FixedSlot => self.config.skincare_model == SkincareModel::FixedSlots,
        };
        let subject = match event {
            // Deleting always clears, even for the inactive model, so
            // leftovers from the other scheme get cleaned up.
            SubjectEvent::Deleted { .. } => return Evaluation::Clear(ClearReason::Deleted),
            SubjectEvent::Upserted { .. } if !model_active => {
                return Evaluation::Skip(SkipReason::InactiveModel);
            }
            SubjectEvent::Upserted { subject } => subject,
        };

        let normalized;
        let subject = match subject {
            ReminderSubject::FixedSlot(slot) => {
                let hour = self.config.slot_hour(slot.slot);
                normalized = ReminderSubject::FixedSlot(slot.clone().with_reminder_hour(hour));
                &normalized
            }
            other => other,
        };

        match self.policy.decide(subject, now, self.clock.zone()) {
            TriggerDecision::Suppressed(reason) => {
                Evaluation::Clear(ClearReason::Suppressed(reason))
            }
            TriggerDecision::Armed { at } => Evaluation::Arm {
                at,
                payload: ReminderPayload::for_subject(subject),
            },
        }
    }

    /// Issue effects in order; stop at the first adapter failure so a
    /// schedule never follows a cancel that did not go through.
    async fn apply(
        &self,
        effects: &[Effect],
    ) -> (Vec<Effect>, Option<(DeliveryId, DeliveryError)>) {
        let mut issued = Vec::with_capacity(effects.len());
        for effect in effects {
            let result = match effect {
                Effect::Cancel { id } => self.delivery.cancel(id).await,
                Effect::Schedule {
                    id,
                    trigger_at,
                    payload,
                } => self.delivery.schedule(id, *trigger_at, payload).await,
            };
            issued.push(effect.clone());
            match (result, effect) {
                (Ok(()), Effect::Schedule { id, trigger_at, .. }) => {
                    tracing::info!(
                        delivery_id = %id,
                        trigger_at = %trigger_at,
                        "reminder scheduled"
                    );
                }
                (Ok(()), Effect::Cancel { .. }) => {}
                (Err(e), Effect::Cancel { id } | Effect::Schedule { id, .. }) => {
                    tracing::warn!(
                        delivery_id = %id,
                        error = %e,
                        "delivery adapter call failed"
                    );
                    return (issued, Some((id.clone(), e)));
                }
            }
        }
        (issued, None)
    }

    async fn record(
        &self,
        plan: &Plan,
        kind: SubjectKind,
        failed: bool,
        now: DateTime<FixedOffset>,
    ) {
        let mut applied = self.applied.lock().await;
        match plan.outcome {
            ReconcileOutcome::Skipped { .. } => {}
            ReconcileOutcome::Armed { at } if !failed => {
                applied.insert(
                    plan.id.clone(),
                    AppliedReminder {
                        id: plan.id.clone(),
                        kind,
                        trigger_at: at,
                    },
                );
            }
            // cleared, or adapter state unknown after a failure
            _ => {
                applied.remove(&plan.id);
            }
        }
        prune_fired(&mut applied, now);
    }
}

/// Drop reminders whose trigger instant has passed: the delivery service
/// consumed them, and no later reconcile is guaranteed to come by.
fn prune_fired(applied: &mut BTreeMap<DeliveryId, AppliedReminder>, now: DateTime<FixedOffset>) {
    applied.retain(|_, reminder| reminder.trigger_at > now);
}

fn cleared(reason: ClearReason) -> ReconcileOutcome {
    ReconcileOutcome::Cleared { reason }
}

fn plan_for(id: DeliveryId, evaluation: Evaluation, authorized: bool) -> Plan {
    let cancel = Effect::Cancel { id: id.clone() };
    let (outcome, effects) = match evaluation {
        Evaluation::Skip(reason) => (ReconcileOutcome::Skipped { reason }, Vec::new()),
        Evaluation::Clear(reason) => (ReconcileOutcome::Cleared { reason }, vec![cancel]),
        Evaluation::Arm { .. } if !authorized => (
            ReconcileOutcome::Cleared {
                reason: ClearReason::NotAuthorized,
            },
            vec![cancel],
        ),
        Evaluation::Arm { at, payload } => (
            ReconcileOutcome::Armed { at },
            vec![
                cancel,
                Effect::Schedule {
                    id: id.clone(),
                    trigger_at: at,
                    payload,
                },
            ],
        ),
    };
    Plan {
        id,
        outcome,
        effects,
    }
}

/// Per-delivery-id async locks. Entries are dropped once nobody holds or
/// waits on them.
#[derive(Default)]
struct KeyedLocks {
    cells: std::sync::Mutex<HashMap<DeliveryId, Arc<Mutex<()>>>>,
}

struct KeyedGuard<'a> {
    locks: &'a KeyedLocks,
    id: DeliveryId,
    cell: Arc<Mutex<()>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl KeyedLocks {
    async fn lock(&self, id: &DeliveryId) -> KeyedGuard<'_> {
        let cell = {
            let mut cells = self.cells.lock().unwrap_or_else(|e| e.into_inner());
            cells.entry(id.clone()).or_default().clone()
        };
        // tokio's Mutex is fair: waiters are served in the order they queued.
        let guard = cell.clone().lock_owned().await;
        KeyedGuard {
            locks: self,
            id: id.clone(),
            cell,
            guard: Some(guard),
        }
    }
}

impl Drop for KeyedGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        let mut cells = self.locks.cells.lock().unwrap_or_else(|e| e.into_inner());
        // map + this guard's handle: nobody else is waiting
        if Arc::strong_count(&self.cell) == 2 {
            cells.remove(&self.id);
        }
    }
}
