//! Patient record input model
//!
//! The patient record is the accessor-style view of one normalized source
//! record: demographics, vital status, the ordered encounter list, and one
//! pre-sorted event stream per category. The record is read-only input; one
//! export run converts exactly one record.

use super::encounter::EncounterData;
use super::event::{
    CarePlanEvent, ConditionEvent, ImmunizationEvent, MedicationEvent, ObservationEvent,
    ProcedureEvent,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Administrative gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Wire form of the administrative gender
    pub fn as_wire(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    /// Single-letter birth-sex code
    pub fn birth_sex_code(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }
}

/// A coded demographic value (race, ethnicity) already normalized by the
/// record accessor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodedText {
    pub code: String,
    pub display: String,
}

impl CodedText {
    /// Creates a coded demographic value
    pub fn new(code: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            display: display.into(),
        }
    }
}

/// Preferred-language coding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageCode {
    pub system: String,
    pub code: String,
    pub display: String,
}

/// Geographic point attached to the home address
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// A postal address from the source record
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PostalAddress {
    #[serde(default)]
    pub line: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

/// Patient demographics
///
/// Everything the patient synthesizer needs to emit the demographic half of
/// the Patient resource. Coded values (race, ethnicity, language) arrive
/// pre-normalized from the record accessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_suffix: Option<String>,
    /// Maiden surname; emits a second, maiden-use name on the wire
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maiden_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mothers_maiden_name: Option<String>,
    pub gender: Gender,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub address: PostalAddress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<GeoPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_place: Option<PostalAddress>,
    pub race: CodedText,
    pub ethnicity: CodedText,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<LanguageCode>,
    /// Marital status wire code; absent means never married on the wire
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<String>,
    /// Birth order for twins/triplets; absent for single births
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_birth: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drivers_license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passport: Option<String>,
}

impl Demographics {
    /// Creates minimal demographics; optional fields start empty
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        gender: Gender,
        race: CodedText,
        ethnicity: CodedText,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            name_prefix: None,
            name_suffix: None,
            maiden_name: None,
            mothers_maiden_name: None,
            gender,
            phone: None,
            address: PostalAddress::default(),
            coordinates: None,
            birth_place: None,
            race,
            ethnicity,
            language: None,
            marital_status: None,
            multiple_birth: None,
            ssn: None,
            drivers_license: None,
            passport: None,
        }
    }
}

/// One patient's complete in-memory clinical timeline
///
/// Event streams are pre-sorted ascending by time; the exporter never
/// rewinds a stream cursor. Events past the final encounter boundary are
/// accepted input shape and simply never exported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Stable source-record identifier, emitted as the Patient identifier
    pub uuid: String,
    pub demographics: Demographics,
    pub birth_time: DateTime<Utc>,
    /// Death instant; alive patients have none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub death_time: Option<DateTime<Utc>>,
    /// Clinical visits ordered by start time
    #[serde(default)]
    pub encounters: Vec<EncounterData>,
    #[serde(default)]
    pub conditions: Vec<ConditionEvent>,
    #[serde(default)]
    pub observations: Vec<ObservationEvent>,
    #[serde(default)]
    pub procedures: Vec<ProcedureEvent>,
    #[serde(default)]
    pub immunizations: Vec<ImmunizationEvent>,
    #[serde(default)]
    pub careplans: Vec<CarePlanEvent>,
    #[serde(default)]
    pub medications: Vec<MedicationEvent>,
}

impl PatientRecord {
    /// Creates a record with empty streams
    pub fn new(uuid: impl Into<String>, demographics: Demographics, birth_time: DateTime<Utc>) -> Self {
        Self {
            uuid: uuid.into(),
            demographics,
            birth_time,
            death_time: None,
            encounters: Vec::new(),
            conditions: Vec::new(),
            observations: Vec::new(),
            procedures: Vec::new(),
            immunizations: Vec::new(),
            careplans: Vec::new(),
            medications: Vec::new(),
        }
    }

    /// True when the patient has not died on or before `instant`
    pub fn alive_at(&self, instant: DateTime<Utc>) -> bool {
        match self.death_time {
            Some(death) => death > instant,
            None => true,
        }
    }
}
