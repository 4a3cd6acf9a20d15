//! Cadence enumeration for action plans.

use std::str::FromStr;

use jiff::SignedDuration;
use serde::{Deserialize, Serialize};

/// How often an action plan's task recurs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frequency {
    /// Once per day
    #[default]
    Daily,

    /// Once per week
    Weekly,

    /// Once per month, approximated as a fixed 30 days
    Monthly,

    /// Opaque custom schedule. Accepted but materializes zero reminders;
    /// there is no generic schedule-expression evaluator.
    Custom,
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "custom" => Ok(Frequency::Custom),
            _ => Err(format!("Invalid frequency: {s}")),
        }
    }
}

impl Frequency {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Custom => "custom",
        }
    }

    /// Spacing between consecutive reminders, or `None` for [`Custom`].
    ///
    /// Monthly is a calendar-approximate 30 days, not a true month.
    ///
    /// [`Custom`]: Frequency::Custom
    pub fn interval(&self) -> Option<SignedDuration> {
        match self {
            Frequency::Daily => Some(SignedDuration::from_hours(24)),
            Frequency::Weekly => Some(SignedDuration::from_hours(7 * 24)),
            Frequency::Monthly => Some(SignedDuration::from_hours(30 * 24)),
            Frequency::Custom => None,
        }
    }
}
