//! Contract for the external note-extraction service.
//!
//! Turning free-text clinical notes into structured actions is out of scope
//! (it lives behind an LLM elsewhere), but the shape of its output is not:
//! this module parses that output and converts extracted actions into plan
//! creation requests. Extraction payloads tend to arrive wrapped in prose,
//! so [`parse_extraction`] trims to the outermost JSON object before
//! deserializing.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, ScheduleError},
    models::Frequency,
    params::CreatePlan,
};

/// Fallback occurrence count when extraction omits or mangles the duration.
pub const DEFAULT_DURATION_DAYS: i64 = 7;

/// One immediate, non-recurring task extracted from a note.
///
/// Checklist items are carried through for the caller; the scheduling core
/// itself only consumes action plans.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChecklistItem {
    /// Task description
    pub task: String,
}

/// One recurring action extracted from a note.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractedAction {
    /// Action description
    pub action: String,
    /// Recurrence cadence
    #[serde(default)]
    pub frequency: Frequency,
    /// Number of occurrences; anything absent or non-integer becomes
    /// [`DEFAULT_DURATION_DAYS`]
    #[serde(default = "default_duration", deserialize_with = "deserialize_duration")]
    pub duration_days: i64,
}

impl ExtractedAction {
    /// Builds a plan creation request from this action, anchored at
    /// `start_date` for the given patient and note.
    pub fn into_create_plan(
        self,
        patient_id: u64,
        note_id: Option<u64>,
        start_date: Date,
    ) -> CreatePlan {
        CreatePlan {
            patient_id,
            note_id,
            action: self.action,
            frequency: self.frequency,
            custom_schedule: None,
            start_date,
            duration_days: self.duration_days,
        }
    }
}

impl Default for ExtractedAction {
    fn default() -> Self {
        Self {
            action: String::new(),
            frequency: Frequency::default(),
            duration_days: DEFAULT_DURATION_DAYS,
        }
    }
}

/// Structured output of the extraction service for one note.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExtractedNote {
    /// Immediate one-time tasks
    #[serde(default)]
    pub checklist_items: Vec<ChecklistItem>,
    /// Scheduled recurring actions
    #[serde(default)]
    pub action_plans: Vec<ExtractedAction>,
}

/// Parses an extraction payload, tolerating prose around the JSON object.
pub fn parse_extraction(raw: &str) -> Result<ExtractedNote> {
    let start = raw.find('{');
    let end = raw.rfind('}');
    let json = match (start, end) {
        (Some(start), Some(end)) if start < end => &raw[start..=end],
        _ => {
            return Err(ScheduleError::InvalidInput {
                field: "extraction".into(),
                reason: "No JSON object found in extraction payload".into(),
            })
        }
    };

    Ok(serde_json::from_str(json)?)
}

fn default_duration() -> i64 {
    DEFAULT_DURATION_DAYS
}

fn deserialize_duration<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value.as_ref().and_then(serde_json::Value::as_i64) {
        Some(days) => days,
        None => DEFAULT_DURATION_DAYS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_payload_wrapped_in_prose() {
        let raw = r#"Here is the extraction you asked for:
        {"checklist_items": [{"task": "Book follow-up"}],
         "action_plans": [{"action": "Take amoxicillin", "frequency": "DAILY", "duration_days": 10}]}
        Let me know if you need anything else."#;

        let note = parse_extraction(raw).expect("should parse");
        assert_eq!(note.checklist_items.len(), 1);
        assert_eq!(note.action_plans[0].action, "Take amoxicillin");
        assert_eq!(note.action_plans[0].frequency, Frequency::Daily);
        assert_eq!(note.action_plans[0].duration_days, 10);
    }

    #[test]
    fn duration_defaults_when_missing_or_non_integer() {
        let missing = r#"{"action_plans": [{"action": "Walk", "frequency": "WEEKLY"}]}"#;
        let note = parse_extraction(missing).unwrap();
        assert_eq!(note.action_plans[0].duration_days, DEFAULT_DURATION_DAYS);

        let mangled = r#"{"action_plans": [{"action": "Walk", "duration_days": "ten"}]}"#;
        let note = parse_extraction(mangled).unwrap();
        assert_eq!(note.action_plans[0].duration_days, DEFAULT_DURATION_DAYS);
    }

    #[test]
    fn rejects_payload_without_json() {
        assert!(parse_extraction("no structure here").is_err());
    }

    #[test]
    fn converts_into_create_plan() {
        let action = ExtractedAction {
            action: "Take amoxicillin".into(),
            frequency: Frequency::Daily,
            duration_days: 10,
        };
        let params = action.into_create_plan(7, Some(3), "2024-01-01".parse().unwrap());
        assert_eq!(params.patient_id, 7);
        assert_eq!(params.note_id, Some(3));
        assert_eq!(params.duration_days, 10);
        assert!(params.custom_schedule.is_none());
    }
}
