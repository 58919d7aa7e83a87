//! Typed FHIR resources
//!
//! One struct per emitted resource kind, gathered under the [`Resource`]
//! enum so a bundle entry can hold any of them. Serialization tags each
//! resource with its `resourceType`; deserialization routes on the same
//! tag.

use super::datatypes::{
    Address, CodeableConcept, Coding, ContactPoint, Extension, HumanName, Identifier, Narrative,
    Period, Quantity, Reference,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kinds of resource an export run can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Patient,
    Encounter,
    Organization,
    Condition,
    Observation,
    DiagnosticReport,
    Procedure,
    Immunization,
    CarePlan,
    MedicationRequest,
    AllergyIntolerance,
}

impl ResourceKind {
    /// The `resourceType` tag on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Patient => "Patient",
            ResourceKind::Encounter => "Encounter",
            ResourceKind::Organization => "Organization",
            ResourceKind::Condition => "Condition",
            ResourceKind::Observation => "Observation",
            ResourceKind::DiagnosticReport => "DiagnosticReport",
            ResourceKind::Procedure => "Procedure",
            ResourceKind::Immunization => "Immunization",
            ResourceKind::CarePlan => "CarePlan",
            ResourceKind::MedicationRequest => "MedicationRequest",
            ResourceKind::AllergyIntolerance => "AllergyIntolerance",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The demographic anchor of the document; always the first entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifier: Vec<Identifier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<HumanName>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub telecom: Vec<ContactPoint>,
    pub gender: String,
    pub birth_date: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub address: Vec<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub communication: Option<Communication>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Narrative>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<CodeableConcept>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_birth_integer: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_birth_boolean: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deceased_date_time: Option<String>,
}

/// Language ability of a patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Communication {
    pub language: CodeableConcept,
}

/// One bounded clinical visit on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Encounter {
    pub id: String,
    pub status: String,
    #[serde(rename = "class")]
    pub class_code: Coding,
    #[serde(rename = "type", default, skip_serializing_if = "Vec::is_empty")]
    pub kind: Vec<CodeableConcept>,
    pub patient: Reference,
    pub service_provider: Reference,
    pub period: Period,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<CodeableConcept>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospitalization: Option<Hospitalization>,
}

/// Admission/discharge details of an encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hospitalization {
    pub discharge_disposition: CodeableConcept,
}

/// The provider organization synthesized fresh for each encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<CodeableConcept>,
}

/// A diagnosed condition with onset (and possibly abatement)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub id: String,
    pub subject: Reference,
    pub code: CodeableConcept,
    pub verification_status: String,
    pub clinical_status: String,
    pub onset_date_time: String,
    pub asserted_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abatement_date_time: Option<String>,
    pub context: Reference,
}

/// A single- or multi-component measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub id: String,
    pub status: String,
    pub code: CodeableConcept,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CodeableConcept>,
    pub subject: Reference,
    pub encounter: Reference,
    pub effective_date_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_quantity: Option<Quantity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_codeable_concept: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub component: Vec<ObservationComponent>,
}

/// One code/value pair inside a composite observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationComponent {
    pub code: CodeableConcept,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_quantity: Option<Quantity>,
}

/// A report grouping previously emitted results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticReport {
    pub id: String,
    pub status: String,
    pub code: CodeableConcept,
    pub subject: Reference,
    pub encounter: Reference,
    pub effective_date_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub performer: Vec<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub result: Vec<Reference>,
}

/// A completed procedure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Procedure {
    pub id: String,
    pub subject: Reference,
    pub status: String,
    pub code: CodeableConcept,
    pub encounter: Reference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason_reference: Option<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performed_date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performed_period: Option<Period>,
}

/// An administered vaccine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Immunization {
    pub id: String,
    pub status: String,
    pub date: String,
    pub vaccine_code: CodeableConcept,
    pub patient: Reference,
    pub was_not_given: bool,
    pub primary_source: bool,
    pub encounter: Reference,
}

/// A plan of care addressing one or more conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarePlan {
    pub id: String,
    pub subject: Reference,
    pub context: Reference,
    pub status: String,
    pub period: Period,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub category: Vec<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub activity: Vec<CarePlanActivity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<Reference>,
}

/// One planned activity inside a care plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarePlanActivity {
    pub detail: CarePlanActivityDetail,
}

/// Status and coding of a planned activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarePlanActivityDetail {
    pub status: String,
    pub code: CodeableConcept,
}

/// A written prescription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationRequest {
    pub id: String,
    pub medication_codeable_concept: CodeableConcept,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<CodeableConcept>,
    pub patient: Reference,
    pub context: Reference,
    pub date_written: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reason_reference: Vec<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dosage_instruction: Vec<DosageInstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispense_request: Option<DispenseRequest>,
}

/// How the medication should be taken
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DosageInstruction {
    pub sequence: u32,
    pub as_needed_boolean: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<Timing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dose_quantity: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_instructions: Vec<CodeableConcept>,
}

/// Repetition schedule of a dose
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timing {
    pub repeat: TimingRepeat,
}

/// Frequency per period, with a UCUM period unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingRepeat {
    pub frequency: u32,
    pub period: u32,
    pub period_unit: String,
}

/// Dispense authorization attached to a prescription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispenseRequest {
    pub number_of_repeats_allowed: u32,
    pub quantity: Quantity,
    pub expected_supply_duration: Quantity,
}

/// A recorded allergy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllergyIntolerance {
    pub id: String,
    pub asserted_date: String,
    pub clinical_status: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub criticality: String,
    pub verification_status: String,
    pub patient: Reference,
    pub code: CodeableConcept,
}

/// Any resource an export run can emit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "resourceType")]
pub enum Resource {
    Patient(Patient),
    Encounter(Encounter),
    Organization(Organization),
    Condition(Condition),
    Observation(Observation),
    DiagnosticReport(DiagnosticReport),
    Procedure(Procedure),
    Immunization(Immunization),
    CarePlan(CarePlan),
    MedicationRequest(MedicationRequest),
    AllergyIntolerance(AllergyIntolerance),
}

impl Resource {
    /// The kind tag of this resource
    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::Patient(_) => ResourceKind::Patient,
            Resource::Encounter(_) => ResourceKind::Encounter,
            Resource::Organization(_) => ResourceKind::Organization,
            Resource::Condition(_) => ResourceKind::Condition,
            Resource::Observation(_) => ResourceKind::Observation,
            Resource::DiagnosticReport(_) => ResourceKind::DiagnosticReport,
            Resource::Procedure(_) => ResourceKind::Procedure,
            Resource::Immunization(_) => ResourceKind::Immunization,
            Resource::CarePlan(_) => ResourceKind::CarePlan,
            Resource::MedicationRequest(_) => ResourceKind::MedicationRequest,
            Resource::AllergyIntolerance(_) => ResourceKind::AllergyIntolerance,
        }
    }

    /// The concept this resource is primarily coded as, if it has one
    ///
    /// Patients and organizations carry no primary concept; everything else
    /// exposes the coding the resolver scans against.
    pub fn code_concept(&self) -> Option<&CodeableConcept> {
        match self {
            Resource::Patient(_) | Resource::Organization(_) => None,
            Resource::Encounter(e) => e.kind.first(),
            Resource::Condition(c) => Some(&c.code),
            Resource::Observation(o) => Some(&o.code),
            Resource::DiagnosticReport(r) => Some(&r.code),
            Resource::Procedure(p) => Some(&p.code),
            Resource::Immunization(i) => Some(&i.vaccine_code),
            Resource::CarePlan(c) => c.category.first(),
            Resource::MedicationRequest(m) => Some(&m.medication_codeable_concept),
            Resource::AllergyIntolerance(a) => Some(&a.code),
        }
    }

    /// Code of the primary coding, if any
    pub fn primary_code(&self) -> Option<&str> {
        self.code_concept().and_then(|c| c.primary_code())
    }
}
