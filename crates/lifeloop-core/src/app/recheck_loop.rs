//! RecheckLoop - periodic re-check of the fixed skincare slots.
//!
//! Activation alone can leave a stale decision pending if the app is not
//! reopened before the trigger time, so the slots are also re-checked on a
//! timer while the process lives.
//!
//! # Flow
//! 1. Wait for the next tick (the first tick fires after one full period)
//! 2. `ReminderEngine::recheck_fixed_slots()`
//! 3. Log warnings; never stop on a failed pass

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::engine::ReminderEngine;

/// Background task re-running `recheck_fixed_slots` on a fixed period.
///
/// # Thread Safety
/// - the loop shares the engine through `Arc`; its passes serialize with
///   caller-driven reconciles on the engine's per-id locks
pub struct RecheckLoop {
    engine: Arc<ReminderEngine>,
    period: Duration,
}

/// Handle to a running loop. Dropping the handle also stops the loop.
pub struct RecheckHandle {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<usize>,
}

impl RecheckHandle {
    /// Stop the loop and wait for it. Returns the number of passes run.
    pub async fn shutdown(self) -> usize {
        let _ = self.shutdown.send(());
        self.task.await.unwrap_or(0)
    }
}

impl RecheckLoop {
    pub fn new(engine: Arc<ReminderEngine>, period: Duration) -> Self {
        Self { engine, period }
    }

    /// Loop with the period from the engine's config, if one is set.
    pub fn from_config(engine: Arc<ReminderEngine>) -> Option<Self> {
        let period = engine.config().recheck_interval()?;
        Some(Self::new(engine, period))
    }

    pub fn spawn(self) -> RecheckHandle {
        let (shutdown, stop) = oneshot::channel();
        let task = tokio::spawn(self.run(stop));
        RecheckHandle { shutdown, task }
    }

    async fn run(self, mut stop: oneshot::Receiver<()>) -> usize {
        let mut ticks = tokio::time::interval_at(Instant::now() + self.period, self.period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut passes = 0;
        loop {
            tokio::select! {
                _ = &mut stop => break,
                _ = ticks.tick() => {
                    passes += 1;
                    for report in self.engine.recheck_fixed_slots().await {
                        for warning in &report.warnings {
                            tracing::warn!(
                                delivery_id = %report.id,
                                warning = %warning,
                                "periodic re-check"
                            );
                        }
                    }
                }
            }
        }
        tracing::debug!(passes, "slot re-check loop stopped");
        passes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::EngineBuilder;
    use crate::domain::{DeliveryId, SlotOfDay, SlotStatus};
    use crate::impls::{InMemoryDeliveryAdapter, InMemorySlotLog, ScriptedPermissions};
    use crate::ports::FixedClock;
    use chrono::{FixedOffset, NaiveDate, TimeZone};

    #[tokio::test]
    async fn loop_rechecks_until_shut_down() {
        let now = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 1, 17, 7, 0, 0)
            .unwrap();
        let delivery = Arc::new(InMemoryDeliveryAdapter::new());
        let slots = Arc::new(InMemorySlotLog::new());
        let engine = Arc::new(
            EngineBuilder::new()
                .delivery(delivery.clone())
                .permissions(Arc::new(ScriptedPermissions::granting()))
                .slot_source(slots.clone())
                .clock(Arc::new(FixedClock::new(now)))
                .build()
                .unwrap(),
        );

        let handle = RecheckLoop::new(engine, Duration::from_millis(20)).spawn();
        tokio::time::sleep(Duration::from_millis(70)).await;
        assert_eq!(delivery.pending().await.len(), 2);

        // the user logs the morning routine; the next pass withdraws it
        let today = NaiveDate::from_ymd_opt(2026, 1, 17).unwrap();
        slots.set(today, SlotOfDay::Am, SlotStatus::Completed).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        let am = delivery.pending_for(&DeliveryId::fixed_slot(SlotOfDay::Am)).await;
        assert!(am.is_none());

        let passes = handle.shutdown().await;
        assert!(passes >= 2);
    }

    #[test]
    fn zero_interval_disables_the_loop() {
        let engine = Arc::new(
            EngineBuilder::new()
                .config(crate::config::ReminderConfig {
                    recheck_interval_secs: Some(0),
                    ..Default::default()
                })
                .delivery(Arc::new(InMemoryDeliveryAdapter::new()))
                .permissions(Arc::new(ScriptedPermissions::granting()))
                .slot_source(Arc::new(InMemorySlotLog::new()))
                .build()
                .unwrap(),
        );
        assert!(RecheckLoop::from_config(engine).is_none());
    }
}
