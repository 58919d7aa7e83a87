//! FHIR wire model
//!
//! Strict serde models for the emitted document: shared data types, the
//! typed resources, and the code-system URIs they are coded against. The
//! models cover exactly the field sets this exporter produces.

pub mod datatypes;
pub mod resources;

pub use datatypes::{
    Address, CodeableConcept, Coding, ContactPoint, Extension, HumanName, Identifier, Narrative,
    Period, Quantity, Reference,
};
pub use resources::{
    AllergyIntolerance, CarePlan, CarePlanActivity, CarePlanActivityDetail, Communication,
    Condition, DiagnosticReport, DispenseRequest, DosageInstruction, Encounter, Hospitalization,
    Immunization, MedicationRequest, Observation, ObservationComponent, Organization, Patient,
    Procedure, Resource, ResourceKind, Timing, TimingRepeat,
};

/// Code-system and extension URIs used on the wire
pub mod systems {
    /// SNOMED CT
    pub const SNOMED: &str = "http://snomed.info/sct";
    /// LOINC
    pub const LOINC: &str = "http://loinc.org";
    /// RxNorm
    pub const RXNORM: &str = "http://www.nlm.nih.gov/research/umls/rxnorm";
    /// CVX vaccine codes
    pub const CVX: &str = "http://hl7.org/fhir/sid/cvx";
    /// UCUM units of measure
    pub const UCUM: &str = "http://unitsofmeasure.org/";
    /// Units-of-time value set for dosage timing
    pub const UNITS_OF_TIME: &str = "http://hl7.org/fhir/ValueSet/units-of-time";
    /// Observation category value set
    pub const OBSERVATION_CATEGORY: &str = "http://hl7.org/fhir/ValueSet/observation-category";
    /// Organization type value set
    pub const ORGANIZATION_TYPE: &str = "http://hl7.org/fhir/ValueSet/organization-type";
    /// Marital status code system
    pub const MARITAL_STATUS: &str = "http://hl7.org/fhir/v3/MaritalStatus";
    /// Race code system
    pub const RACE: &str = "http://hl7.org/fhir/v3/Race";
    /// Ethnicity code system
    pub const ETHNICITY: &str = "http://hl7.org/fhir/v3/Ethnicity";
    /// Patient discharge disposition codes
    pub const DISCHARGE_DISPOSITION: &str = "http://www.nubc.org/patient-discharge";
    /// Medication request stage codes
    pub const REQUEST_STAGE: &str = "http://hl7.org/fhir/request-stage";
    /// United States Social Security Number
    pub const US_SSN: &str = "http://hl7.org/fhir/sid/us-ssn";
    /// Identifier type codes
    pub const IDENTIFIER_TYPE: &str = "http://hl7.org/fhir/identifier-type";
    /// HL7 v2 identifier type table
    pub const V2_IDENTIFIER_TYPE: &str = "http://hl7.org/fhir/v2/0203";
    /// United States driver's license numbers
    pub const US_DRIVERS_LICENSE: &str = "urn:oid:2.16.840.1.113883.4.3.25";
    /// United States passport numbers
    pub const US_PASSPORT: &str = "urn:oid:2.16.840.1.113883.4.330";
    /// Source-record identifier namespace
    pub const SOURCE_RECORD: &str = "https://github.com/caduceus-hq/caduceus";

    /// US Core race extension
    pub const EXT_RACE: &str = "http://hl7.org/fhir/StructureDefinition/us-core-race";
    /// US Core ethnicity extension
    pub const EXT_ETHNICITY: &str = "http://hl7.org/fhir/StructureDefinition/us-core-ethnicity";
    /// Birth place extension
    pub const EXT_BIRTH_PLACE: &str = "http://hl7.org/fhir/StructureDefinition/birthPlace";
    /// Mother's maiden name extension
    pub const EXT_MOTHERS_MAIDEN_NAME: &str =
        "http://hl7.org/fhir/StructureDefinition/patient-mothersMaidenName";
    /// US Core birth sex extension
    pub const EXT_BIRTH_SEX: &str =
        "http://hl7.org/fhir/us/core/StructureDefinition/us-core-birthsex";
    /// Interpreter required extension
    pub const EXT_INTERPRETER_REQUIRED: &str =
        "http://hl7.org/fhir/StructureDefinition/patient-interpreterRequired";
    /// Geolocation extension on addresses
    pub const EXT_GEOLOCATION: &str = "http://hl7.org/fhir/StructureDefinition/geolocation";
}
