//! Tests for the data models.

use jiff::{SignedDuration, Timestamp};

use super::*;

fn sample_reminder() -> Reminder {
    Reminder {
        id: 1,
        plan_id: 1,
        patient_id: 9,
        title: "Take amoxicillin".into(),
        description: Some("Take amoxicillin".into()),
        scheduled_for: "2024-01-01T09:00:00Z".parse().unwrap(),
        sequence_number: 1,
        completed: false,
        completed_at: None,
        is_active: true,
        created_at: Timestamp::now(),
        updated_at: Timestamp::now(),
    }
}

#[test]
fn frequency_parses_case_insensitively() {
    assert_eq!("DAILY".parse::<Frequency>().unwrap(), Frequency::Daily);
    assert_eq!("weekly".parse::<Frequency>().unwrap(), Frequency::Weekly);
    assert_eq!("Monthly".parse::<Frequency>().unwrap(), Frequency::Monthly);
    assert_eq!("custom".parse::<Frequency>().unwrap(), Frequency::Custom);
    assert!("hourly".parse::<Frequency>().is_err());
}

#[test]
fn frequency_round_trips_through_as_str() {
    for frequency in [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Custom,
    ] {
        assert_eq!(frequency.as_str().parse::<Frequency>().unwrap(), frequency);
    }
}

#[test]
fn frequency_intervals() {
    assert_eq!(
        Frequency::Daily.interval(),
        Some(SignedDuration::from_hours(24))
    );
    assert_eq!(
        Frequency::Weekly.interval(),
        Some(SignedDuration::from_hours(168))
    );
    // A fixed 30 days, not a calendar month.
    assert_eq!(
        Frequency::Monthly.interval(),
        Some(SignedDuration::from_hours(720))
    );
    assert_eq!(Frequency::Custom.interval(), None);
}

#[test]
fn frequency_serializes_uppercase() {
    let json = serde_json::to_string(&Frequency::Daily).unwrap();
    assert_eq!(json, "\"DAILY\"");
    let parsed: Frequency = serde_json::from_str("\"WEEKLY\"").unwrap();
    assert_eq!(parsed, Frequency::Weekly);
}

#[test]
fn reminder_pending_states() {
    let mut reminder = sample_reminder();
    assert!(reminder.is_pending());

    reminder.completed = true;
    assert!(!reminder.is_pending());

    reminder.completed = false;
    reminder.is_active = false;
    assert!(!reminder.is_pending());
}

#[test]
fn check_in_outcome_serializes_with_status_tag() {
    let json = serde_json::to_string(&CheckInOutcome::AlreadyCompleted).unwrap();
    assert_eq!(json, "{\"status\":\"already_completed\"}");

    let json = serde_json::to_string(&CheckInOutcome::Superseded).unwrap();
    assert_eq!(json, "{\"status\":\"superseded\"}");

    let outcome = CheckInOutcome::CheckedIn {
        reminder: sample_reminder(),
        next: None,
        extended: None,
    };
    let json = serde_json::to_string(&outcome).unwrap();
    assert!(json.contains("\"status\":\"checked_in\""));
}
