//! Encounter input model
//!
//! Encounters are read-only inputs ordered by start time. Each one bounds
//! the slice of the timeline whose events it claims: the scheduler drains
//! every stream up to the encounter's closing boundary before moving on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Discharge disposition attached to an inpatient encounter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DischargeDisposition {
    pub code: String,
    pub display: String,
}

impl DischargeDisposition {
    /// Creates a discharge disposition
    pub fn new(code: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            display: display.into(),
        }
    }
}

/// One bounded clinical visit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterData {
    /// Visit start instant
    pub time: DateTime<Utc>,
    /// Visit end instant; still-open visits (or visits the patient died
    /// during) have none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Type code into the encounter terminology table
    pub kind: String,
    /// Condition type code that motivated the visit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discharge: Option<DischargeDisposition>,
}

impl EncounterData {
    /// Creates an open encounter
    pub fn new(time: DateTime<Utc>, kind: impl Into<String>) -> Self {
        Self {
            time,
            end_time: None,
            kind: kind.into(),
            reason: None,
            discharge: None,
        }
    }

    /// Closes the encounter at the given instant
    pub fn with_end_time(mut self, end_time: DateTime<Utc>) -> Self {
        self.end_time = Some(end_time);
        self
    }

    /// Names the condition that motivated the visit
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a discharge disposition
    pub fn with_discharge(mut self, discharge: DischargeDisposition) -> Self {
        self.discharge = Some(discharge);
        self
    }
}
