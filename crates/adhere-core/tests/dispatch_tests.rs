mod common;

use std::sync::{atomic::Ordering, Arc};

use adhere_core::{
    models::Frequency,
    params::{CheckIn, CreatePlan},
    Dispatcher, Sweeper,
};
use jiff::Timestamp;

use common::{create_test_scheduler, FixedClock, RecordingTimer, RecordingTransport};

fn daily_plan(patient_id: u64, start_date: &str) -> CreatePlan {
    CreatePlan {
        patient_id,
        note_id: None,
        action: "Walk 30 minutes".to_string(),
        frequency: Frequency::Daily,
        custom_schedule: None,
        start_date: start_date.parse().expect("valid date"),
        duration_days: 3,
    }
}

fn ts(instant: &str) -> Timestamp {
    instant.parse().expect("valid timestamp")
}

#[tokio::test]
async fn test_sweep_before_anything_is_due_dispatches_nothing() {
    let clock = FixedClock::at("2024-01-01T09:00:00Z");
    let timer = Arc::new(RecordingTimer::default());
    let transport = Arc::new(RecordingTransport::default());
    let (_temp, db_path, scheduler) =
        create_test_scheduler(Arc::clone(&clock), Arc::clone(&timer)).await;

    // Plan starts tomorrow; nothing is due yet.
    scheduler
        .create_plan(&daily_plan(1, "2024-01-02"))
        .await
        .unwrap();

    let dispatcher = Dispatcher::new(
        db_path.clone(),
        Arc::clone(&transport) as _,
        Arc::clone(&timer) as _,
        Arc::clone(&clock) as _,
    );
    let sweeper = Sweeper::new(db_path, dispatcher, Arc::clone(&clock) as _);

    let count = sweeper.sweep(None).await.unwrap();
    assert_eq!(count, 0);
    assert!(transport.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_sweep_dispatches_overdue_and_rearms_escalation() {
    let clock = FixedClock::at("2024-01-01T09:00:00Z");
    let timer = Arc::new(RecordingTimer::default());
    let transport = Arc::new(RecordingTransport::default());
    let (_temp, db_path, scheduler) =
        create_test_scheduler(Arc::clone(&clock), Arc::clone(&timer)).await;

    let plan = scheduler
        .create_plan(&daily_plan(1, "2024-01-01"))
        .await
        .unwrap();

    let dispatcher = Dispatcher::new(
        db_path.clone(),
        Arc::clone(&transport) as _,
        Arc::clone(&timer) as _,
        Arc::clone(&clock) as _,
    );
    let sweeper = Sweeper::new(db_path, dispatcher, Arc::clone(&clock) as _);

    // An hour past the first reminder; the second is still tomorrow.
    clock.set("2024-01-01T10:00:00Z");
    let count = sweeper.sweep(None).await.unwrap();
    assert_eq!(count, 1);

    let sent = transport.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, 1);
    assert_eq!(sent[0].1, "Reminder: Walk 30 minutes - Day 1");

    // Escalation re-armed one hour out, after the materialization arming.
    let armed = timer.armed.lock().unwrap();
    assert_eq!(
        armed.last(),
        Some(&(plan.reminders[0].id, ts("2024-01-01T11:00:00Z")))
    );
}

#[tokio::test]
async fn test_sweep_counts_every_overdue_reminder() {
    let clock = FixedClock::at("2024-01-01T09:00:00Z");
    let timer = Arc::new(RecordingTimer::default());
    let transport = Arc::new(RecordingTransport::default());
    let (_temp, db_path, scheduler) =
        create_test_scheduler(Arc::clone(&clock), Arc::clone(&timer)).await;

    scheduler
        .create_plan(&daily_plan(1, "2024-01-01"))
        .await
        .unwrap();

    let dispatcher = Dispatcher::new(
        db_path.clone(),
        Arc::clone(&transport) as _,
        Arc::clone(&timer) as _,
        Arc::clone(&clock) as _,
    );
    let sweeper = Sweeper::new(db_path, dispatcher, Arc::clone(&clock) as _);

    clock.set("2024-01-05T00:00:00Z");
    let count = sweeper.sweep(None).await.unwrap();
    assert_eq!(count, 3);

    let sent = transport.sent.lock().unwrap();
    let subjects: Vec<&str> = sent.iter().map(|(_, subject)| subject.as_str()).collect();
    assert_eq!(
        subjects,
        vec![
            "Reminder: Walk 30 minutes - Day 1",
            "Reminder: Walk 30 minutes - Day 2",
            "Reminder: Walk 30 minutes - Day 3",
        ]
    );
}

#[tokio::test]
async fn test_sweep_skips_superseded_reminders() {
    let clock = FixedClock::at("2024-01-01T09:00:00Z");
    let timer = Arc::new(RecordingTimer::default());
    let transport = Arc::new(RecordingTransport::default());
    let (_temp, db_path, scheduler) =
        create_test_scheduler(Arc::clone(&clock), Arc::clone(&timer)).await;

    scheduler
        .create_plan(&daily_plan(1, "2024-01-01"))
        .await
        .unwrap();

    // A replacement plan starting in the future deactivates the old one;
    // its overdue reminders must never resurface.
    clock.set("2024-01-02T09:00:00Z");
    scheduler
        .create_plan(&daily_plan(1, "2024-01-10"))
        .await
        .unwrap();

    let dispatcher = Dispatcher::new(
        db_path.clone(),
        Arc::clone(&transport) as _,
        Arc::clone(&timer) as _,
        Arc::clone(&clock) as _,
    );
    let sweeper = Sweeper::new(db_path, dispatcher, Arc::clone(&clock) as _);

    let count = sweeper.sweep(None).await.unwrap();
    assert_eq!(count, 0);
    assert!(transport.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_notify_completed_reminder_is_a_noop() {
    let clock = FixedClock::at("2024-01-01T09:00:00Z");
    let timer = Arc::new(RecordingTimer::default());
    let transport = Arc::new(RecordingTransport::default());
    let (_temp, db_path, scheduler) =
        create_test_scheduler(Arc::clone(&clock), Arc::clone(&timer)).await;

    let plan = scheduler
        .create_plan(&daily_plan(1, "2024-01-01"))
        .await
        .unwrap();
    scheduler
        .check_in(&CheckIn {
            reminder_id: plan.reminders[0].id,
            at: None,
        })
        .await
        .unwrap();

    let dispatcher = Dispatcher::new(
        db_path,
        Arc::clone(&transport) as _,
        Arc::clone(&timer) as _,
        Arc::clone(&clock) as _,
    );

    let armed_before = timer.armed.lock().unwrap().len();
    dispatcher.notify(plan.reminders[0].id).await.unwrap();

    assert!(transport.sent.lock().unwrap().is_empty());
    assert_eq!(timer.armed.lock().unwrap().len(), armed_before);
}

#[tokio::test]
async fn test_notify_unknown_reminder_is_a_noop() {
    let clock = FixedClock::at("2024-01-01T09:00:00Z");
    let timer = Arc::new(RecordingTimer::default());
    let transport = Arc::new(RecordingTransport::default());
    let (_temp, db_path, _scheduler) =
        create_test_scheduler(Arc::clone(&clock), Arc::clone(&timer)).await;

    let dispatcher = Dispatcher::new(
        db_path,
        Arc::clone(&transport) as _,
        Arc::clone(&timer) as _,
        Arc::clone(&clock) as _,
    );

    dispatcher.notify(999).await.unwrap();
    assert!(transport.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_notify_rearms_even_when_transport_fails() {
    let clock = FixedClock::at("2024-01-01T09:00:00Z");
    let timer = Arc::new(RecordingTimer::default());
    let transport = Arc::new(RecordingTransport::default());
    let (_temp, db_path, scheduler) =
        create_test_scheduler(Arc::clone(&clock), Arc::clone(&timer)).await;

    let plan = scheduler
        .create_plan(&daily_plan(1, "2024-01-01"))
        .await
        .unwrap();

    let dispatcher = Dispatcher::new(
        db_path,
        Arc::clone(&transport) as _,
        Arc::clone(&timer) as _,
        Arc::clone(&clock) as _,
    );

    transport.fail.store(true, Ordering::SeqCst);
    dispatcher.notify(plan.reminders[0].id).await.unwrap();

    // The send was dropped, but the hourly escalation stays alive so the
    // next attempt happens once the transport recovers.
    assert!(transport.sent.lock().unwrap().is_empty());
    let armed = timer.armed.lock().unwrap();
    assert_eq!(
        armed.last(),
        Some(&(plan.reminders[0].id, ts("2024-01-01T10:00:00Z")))
    );
}
