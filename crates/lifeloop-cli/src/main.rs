use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use std::sync::Arc;

use lifeloop_core::app::{EngineBuilder, RecheckLoop, ReconcileReport};
use lifeloop_core::config::ReminderConfig;
use lifeloop_core::domain::{
    DeliveryId, ReminderPayload, SlotOfDay, SlotStatus, SubjectEvent, SubjectKey, TaskSubject,
};
use lifeloop_core::impls::{InMemoryDeliveryAdapter, InMemorySlotLog, ScriptedPermissions};
use lifeloop_core::ports::{
    Clock, DeliveryAdapter, DeliveryError, FixedClock, IdGenerator, UlidGenerator,
};

/// Delivery adapter that prints every request and keeps the pending set
/// in memory, standing in for the platform notification center.
struct ConsoleDelivery {
    inner: InMemoryDeliveryAdapter,
}

#[async_trait]
impl DeliveryAdapter for ConsoleDelivery {
    async fn schedule(
        &self,
        id: &DeliveryId,
        trigger_at: DateTime<Utc>,
        payload: &ReminderPayload,
    ) -> Result<(), DeliveryError> {
        println!(
            "  schedule {id} at {} | {}: {}",
            trigger_at.with_timezone(&Local).format("%a %H:%M"),
            payload.title,
            payload.body
        );
        self.inner.schedule(id, trigger_at, payload).await
    }

    async fn cancel(&self, id: &DeliveryId) -> Result<(), DeliveryError> {
        println!("  cancel   {id}");
        self.inner.cancel(id).await
    }

    async fn cancel_all(&self) -> Result<(), DeliveryError> {
        println!("  cancel all");
        self.inner.cancel_all().await
    }
}

fn print_reports(step: &str, reports: &[ReconcileReport]) {
    for report in reports {
        println!("  -> {}: {:?}", report.id, report.outcome);
        for warning in &report.warnings {
            tracing::warn!(step, warning = %warning, "reminder not applied");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // (A) config: optional path as the first argument
    let config = match std::env::args().nth(1) {
        Some(path) => ReminderConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => ReminderConfig::default(),
    };

    // (B) simulated day starting at 07:00 local time
    let today = Local::now().date_naive();
    let start = Local
        .from_local_datetime(&today.and_hms_opt(7, 0, 0).context("invalid start time")?)
        .earliest()
        .context("07:00 does not exist today")?
        .fixed_offset();
    let clock = Arc::new(FixedClock::new(start));
    let ids = UlidGenerator::new(clock.clone());

    let delivery = Arc::new(ConsoleDelivery {
        inner: InMemoryDeliveryAdapter::new(),
    });
    let slots = Arc::new(InMemorySlotLog::new());
    let engine = Arc::new(
        EngineBuilder::new()
            .config(config)
            .delivery(delivery.clone())
            .permissions(Arc::new(ScriptedPermissions::granting()))
            .slot_source(slots.clone())
            .clock(clock.clone())
            .build()?,
    );
    let recheck = RecheckLoop::from_config(engine.clone()).map(RecheckLoop::spawn);

    // (C) app comes to the foreground
    println!("07:00 activation");
    print_reports("activation", &engine.on_activation().await);

    // (D) a task with a reminder at 18:00
    let task = TaskSubject {
        id: ids.task_entry_id(),
        title: "Evening walk".to_string(),
        due_on: today,
        remind_at: Some((start + Duration::hours(11)).with_timezone(&Utc)),
        completed: false,
    };
    let task_key = SubjectKey::Task(task.id);
    println!("07:05 task saved");
    clock.advance(Duration::minutes(5));
    print_reports("task saved", &[engine.reconcile(SubjectEvent::upserted(task)).await]);

    // (E) morning routine logged; the AM reminder is withdrawn
    println!("07:30 morning routine completed");
    clock.advance(Duration::minutes(25));
    slots.set(today, SlotOfDay::Am, SlotStatus::Completed).await;
    print_reports("slot logged", &engine.recheck_fixed_slots().await);

    // (F) the task is deleted before it is due
    println!("12:00 task deleted");
    clock.advance(Duration::minutes(270));
    print_reports("task deleted", &[engine.reconcile(SubjectEvent::deleted(task_key)).await]);

    println!("pending at {}:", clock.now().format("%H:%M"));
    println!("{}", serde_json::to_string_pretty(&engine.status().await)?);

    if let Some(handle) = recheck {
        handle.shutdown().await;
    }
    Ok(())
}
