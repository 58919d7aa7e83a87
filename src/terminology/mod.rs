//! Injected code-dictionary tables
//!
//! Maps internal event type codes to coded descriptions (SNOMED, LOINC,
//! RxNorm, CVX). The tables are read-only configuration injected into the
//! exporter at construction time; a lookup miss aborts the run.

pub mod loader;
pub mod tables;

pub use loader::load_terminology;
pub use tables::{
    CarePlanEntry, ConditionEntry, EncounterEntry, ImmunizationEntry, InstructionEntry,
    MedicationEntry, ObservationEntry, ObservationValueType, ProcedureEntry, Terminology,
};
