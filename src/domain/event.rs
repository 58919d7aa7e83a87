//! Clinical timeline event model
//!
//! One struct per event category, mirroring the per-category sorted streams
//! of the source record. Each stream is pre-sorted ascending by `time` and
//! immutable for the duration of an export run.
//!
//! Dispatch from an event to its synthesizer is driven by the category plus
//! an optional typed handler override: a condition event may route to the
//! allergy synthesizer, an observation event to the composite-observation or
//! diagnostic-report synthesizer. Unknown handler names fail at record
//! construction time, not at first dispatch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The six per-category event streams of a patient record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventCategory {
    Condition,
    Observation,
    Procedure,
    Immunization,
    CarePlan,
    Medication,
}

impl EventCategory {
    /// Fixed category order the scheduler drains within each encounter
    pub const DISPATCH_ORDER: [EventCategory; 6] = [
        EventCategory::Condition,
        EventCategory::Observation,
        EventCategory::Procedure,
        EventCategory::Immunization,
        EventCategory::CarePlan,
        EventCategory::Medication,
    ];

    /// Category name as it appears in logs and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Condition => "condition",
            EventCategory::Observation => "observation",
            EventCategory::Procedure => "procedure",
            EventCategory::Immunization => "immunization",
            EventCategory::CarePlan => "care-plan",
            EventCategory::Medication => "medication",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handler override for condition-stream events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionHandler {
    /// Synthesize an AllergyIntolerance instead of a Condition
    Allergy,
}

impl FromStr for ConditionHandler {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "allergy" => Ok(ConditionHandler::Allergy),
            other => Err(format!("unknown condition handler '{other}'")),
        }
    }
}

/// Handler override for observation-stream events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationHandler {
    /// Consume the trailing `members` observation entries into one composite
    MultiObservation { members: usize },
    /// Reference the trailing `results` entries from a diagnostic report
    DiagnosticReport { results: usize },
}

/// A condition onset in the condition stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionEvent {
    /// Onset instant
    pub time: DateTime<Utc>,
    /// Type code into the condition terminology table
    pub kind: String,
    /// Abatement instant, when the condition has resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Optional synthesizer override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handler: Option<ConditionHandler>,
}

impl ConditionEvent {
    /// Creates an active condition event
    pub fn new(time: DateTime<Utc>, kind: impl Into<String>) -> Self {
        Self {
            time,
            kind: kind.into(),
            end_time: None,
            handler: None,
        }
    }

    /// Sets the abatement instant
    pub fn with_end_time(mut self, end_time: DateTime<Utc>) -> Self {
        self.end_time = Some(end_time);
        self
    }

    /// Routes the event to an overriding synthesizer
    pub fn with_handler(mut self, handler: ConditionHandler) -> Self {
        self.handler = Some(handler);
        self
    }
}

/// The recorded value of a single-valued observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationValue {
    /// A numeric reading, carrying the unit declared by the terminology entry
    Quantity(f64),
    /// A condition type code; the terminology entry declares the value is itself a coded concept
    Concept(String),
}

/// A reading in the observation stream
///
/// Plain observations carry a value. Composite and report events instead
/// carry a handler override naming how many trailing entries they group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationEvent {
    pub time: DateTime<Utc>,
    /// Type code into the observation terminology table
    pub kind: String,
    /// Observation category on the wire (`vital-signs`, `laboratory`, ...)
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<ObservationValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handler: Option<ObservationHandler>,
}

impl ObservationEvent {
    /// Creates a plain quantity observation
    pub fn quantity(
        time: DateTime<Utc>,
        kind: impl Into<String>,
        category: impl Into<String>,
        value: f64,
    ) -> Self {
        Self {
            time,
            kind: kind.into(),
            category: category.into(),
            value: Some(ObservationValue::Quantity(value)),
            handler: None,
        }
    }

    /// Creates a coded-concept observation
    pub fn concept(
        time: DateTime<Utc>,
        kind: impl Into<String>,
        category: impl Into<String>,
        condition_kind: impl Into<String>,
    ) -> Self {
        Self {
            time,
            kind: kind.into(),
            category: category.into(),
            value: Some(ObservationValue::Concept(condition_kind.into())),
            handler: None,
        }
    }

    /// Creates a composite event grouping the trailing `members` entries
    pub fn composite(
        time: DateTime<Utc>,
        kind: impl Into<String>,
        category: impl Into<String>,
        members: usize,
    ) -> Self {
        Self {
            time,
            kind: kind.into(),
            category: category.into(),
            value: None,
            handler: Some(ObservationHandler::MultiObservation { members }),
        }
    }

    /// Creates a diagnostic-report event referencing the trailing `results` entries
    pub fn report(time: DateTime<Utc>, kind: impl Into<String>, results: usize) -> Self {
        Self {
            time,
            kind: kind.into(),
            category: "laboratory".to_string(),
            value: None,
            handler: Some(ObservationHandler::DiagnosticReport { results }),
        }
    }
}

/// A completed procedure in the procedure stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcedureEvent {
    pub time: DateTime<Utc>,
    /// Type code into the procedure terminology table
    pub kind: String,
    /// Condition type code that motivated the procedure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Elapsed time of the procedure; absent for instantaneous procedures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<i64>,
}

impl ProcedureEvent {
    /// Creates an instantaneous procedure event
    pub fn new(time: DateTime<Utc>, kind: impl Into<String>) -> Self {
        Self {
            time,
            kind: kind.into(),
            reason: None,
            duration_seconds: None,
        }
    }

    /// Names the condition that motivated the procedure
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Sets the procedure duration in seconds
    pub fn with_duration_seconds(mut self, seconds: i64) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }
}

/// An administered vaccine in the immunization stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImmunizationEvent {
    pub time: DateTime<Utc>,
    /// Type code into the immunization terminology table
    pub kind: String,
}

impl ImmunizationEvent {
    /// Creates an immunization event
    pub fn new(time: DateTime<Utc>, kind: impl Into<String>) -> Self {
        Self {
            time,
            kind: kind.into(),
        }
    }
}

/// A care plan opened (and possibly closed) in the care-plan stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarePlanEvent {
    /// Plan start instant
    pub time: DateTime<Utc>,
    /// Type code into the care-plan terminology table
    pub kind: String,
    /// Condition type codes the plan addresses
    #[serde(default)]
    pub reasons: Vec<String>,
    /// Care-plan activity type codes
    #[serde(default)]
    pub activities: Vec<String>,
    /// Plan stop instant; an open-ended plan has none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

impl CarePlanEvent {
    /// Creates an open-ended care plan event
    pub fn new(time: DateTime<Utc>, kind: impl Into<String>) -> Self {
        Self {
            time,
            kind: kind.into(),
            reasons: Vec::new(),
            activities: Vec::new(),
            end_time: None,
        }
    }

    /// Adds an addressed condition type code
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reasons.push(reason.into());
        self
    }

    /// Adds an activity type code
    pub fn with_activity(mut self, activity: impl Into<String>) -> Self {
        self.activities.push(activity.into());
        self
    }

    /// Closes the plan at the given instant
    pub fn with_end_time(mut self, end_time: DateTime<Utc>) -> Self {
        self.end_time = Some(end_time);
        self
    }
}

/// Per-dose schedule of a prescription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dosage {
    /// Doses per period
    pub frequency: u32,
    /// Length of one period, in `unit`s
    pub period: u32,
    /// Period unit (`seconds` ... `years`), normalized to UCUM on the wire
    pub unit: String,
    /// Amount per dose
    pub amount: u32,
}

/// Expected supply duration of a dispense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyDuration {
    pub quantity: u32,
    /// Duration unit (`seconds` ... `years`), normalized to UCUM on the wire
    pub unit: String,
}

/// Dosage information attached to a medication order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prescription {
    /// Taken as needed; no timing or dispense details
    AsNeeded,
    /// Taken on a fixed schedule
    Scheduled {
        dosage: Dosage,
        /// Additional instruction type codes
        #[serde(default)]
        instructions: Vec<String>,
        refills: u32,
        total_doses: u32,
        supply_duration: SupplyDuration,
    },
}

/// A prescription written in the medication stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationEvent {
    /// Instant the order was written
    pub time: DateTime<Utc>,
    /// Type code into the medication terminology table
    pub kind: String,
    /// Condition type codes that motivated the order
    #[serde(default)]
    pub reasons: Vec<String>,
    /// Stop instant; an absent stop means the order is still active
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prescription: Option<Prescription>,
}

impl MedicationEvent {
    /// Creates an active medication order without dosage details
    pub fn new(time: DateTime<Utc>, kind: impl Into<String>) -> Self {
        Self {
            time,
            kind: kind.into(),
            reasons: Vec::new(),
            end_time: None,
            prescription: None,
        }
    }

    /// Adds a motivating condition type code
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reasons.push(reason.into());
        self
    }

    /// Stops the order at the given instant
    pub fn with_end_time(mut self, end_time: DateTime<Utc>) -> Self {
        self.end_time = Some(end_time);
        self
    }

    /// Attaches dosage information
    pub fn with_prescription(mut self, prescription: Prescription) -> Self {
        self.prescription = Some(prescription);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2015, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_dispatch_order_covers_every_category() {
        assert_eq!(EventCategory::DISPATCH_ORDER.len(), 6);
        assert_eq!(EventCategory::DISPATCH_ORDER[0], EventCategory::Condition);
        assert_eq!(EventCategory::DISPATCH_ORDER[5], EventCategory::Medication);
    }

    #[test]
    fn test_condition_handler_from_str() {
        assert_eq!(
            "allergy".parse::<ConditionHandler>().unwrap(),
            ConditionHandler::Allergy
        );
        assert!("allergies".parse::<ConditionHandler>().is_err());
    }

    #[test]
    fn test_condition_event_builder() {
        let event = ConditionEvent::new(t0(), "bronchitis")
            .with_handler(ConditionHandler::Allergy);
        assert_eq!(event.kind, "bronchitis");
        assert_eq!(event.handler, Some(ConditionHandler::Allergy));
        assert!(event.end_time.is_none());
    }

    #[test]
    fn test_observation_constructors() {
        let plain = ObservationEvent::quantity(t0(), "height", "vital-signs", 172.5);
        assert_eq!(plain.value, Some(ObservationValue::Quantity(172.5)));
        assert!(plain.handler.is_none());

        let composite = ObservationEvent::composite(t0(), "blood_pressure", "vital-signs", 2);
        assert!(composite.value.is_none());
        assert_eq!(
            composite.handler,
            Some(ObservationHandler::MultiObservation { members: 2 })
        );

        let report = ObservationEvent::report(t0(), "lipid_panel", 3);
        assert_eq!(
            report.handler,
            Some(ObservationHandler::DiagnosticReport { results: 3 })
        );
    }

    #[test]
    fn test_medication_event_builder() {
        let event = MedicationEvent::new(t0(), "amoxicillin")
            .with_reason("otitis_media")
            .with_end_time(t0() + chrono::Duration::days(10));
        assert_eq!(event.reasons, vec!["otitis_media"]);
        assert!(event.end_time.is_some());
    }

    #[test]
    fn test_event_serde_round_trip() {
        let event = CarePlanEvent::new(t0(), "diabetes_plan")
            .with_reason("diabetes")
            .with_activity("diabetic_diet");
        let json = serde_json::to_string(&event).unwrap();
        let back: CarePlanEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
