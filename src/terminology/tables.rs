//! Terminology table types
//!
//! One read-only table per concept family, keyed by the internal event type
//! code. Tables are injected into the exporter at construction time rather
//! than read from ambient global state, so parallel runs can share one
//! immutable set and tests can substitute their own.
//!
//! A lookup miss is fatal for the export run: the output document would be
//! structurally invalid without the coded description.

use crate::domain::{CaduceusError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a single-valued observation's recorded value is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationValueType {
    /// A numeric quantity in the entry's unit
    #[default]
    Quantity,
    /// A condition type code resolved through the condition table
    Condition,
}

/// A condition concept (SNOMED)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionEntry {
    pub code: String,
    pub display: String,
}

/// An observation concept (LOINC) with its measurement unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationEntry {
    pub code: String,
    pub display: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub value_type: ObservationValueType,
}

/// An encounter concept (SNOMED) with its encounter class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterEntry {
    pub code: String,
    pub display: String,
    pub class: String,
}

/// A procedure concept (SNOMED)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureEntry {
    pub code: String,
    pub display: String,
}

/// A vaccine concept (CVX)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImmunizationEntry {
    pub code: String,
    pub display: String,
}

/// A care-plan or care-plan-activity concept (SNOMED)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarePlanEntry {
    pub code: String,
    pub display: String,
}

/// A medication concept (RxNorm)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationEntry {
    pub code: String,
    pub display: String,
}

/// A dosage-instruction concept (SNOMED)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionEntry {
    pub code: String,
    pub display: String,
}

/// The complete injected code-dictionary set
///
/// Immutable for the duration of all runs that share it. Built either from
/// a TOML data file (see [`crate::terminology::loader`]) or in code via the
/// `insert_*` methods, which tests use to assemble minimal tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Terminology {
    #[serde(default)]
    pub conditions: HashMap<String, ConditionEntry>,
    #[serde(default)]
    pub observations: HashMap<String, ObservationEntry>,
    #[serde(default)]
    pub encounters: HashMap<String, EncounterEntry>,
    #[serde(default)]
    pub procedures: HashMap<String, ProcedureEntry>,
    #[serde(default)]
    pub immunizations: HashMap<String, ImmunizationEntry>,
    #[serde(default)]
    pub careplans: HashMap<String, CarePlanEntry>,
    #[serde(default)]
    pub medications: HashMap<String, MedicationEntry>,
    #[serde(default)]
    pub instructions: HashMap<String, InstructionEntry>,
}

impl Terminology {
    /// Creates an empty terminology set
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a condition concept; a miss is fatal
    pub fn condition(&self, key: &str) -> Result<&ConditionEntry> {
        self.conditions.get(key).ok_or_else(|| missing("condition", key))
    }

    /// Looks up an observation concept; a miss is fatal
    pub fn observation(&self, key: &str) -> Result<&ObservationEntry> {
        self.observations
            .get(key)
            .ok_or_else(|| missing("observation", key))
    }

    /// Looks up an encounter concept; a miss is fatal
    pub fn encounter(&self, key: &str) -> Result<&EncounterEntry> {
        self.encounters.get(key).ok_or_else(|| missing("encounter", key))
    }

    /// Looks up a procedure concept; a miss is fatal
    pub fn procedure(&self, key: &str) -> Result<&ProcedureEntry> {
        self.procedures.get(key).ok_or_else(|| missing("procedure", key))
    }

    /// Looks up a vaccine concept; a miss is fatal
    pub fn immunization(&self, key: &str) -> Result<&ImmunizationEntry> {
        self.immunizations
            .get(key)
            .ok_or_else(|| missing("immunization", key))
    }

    /// Looks up a care-plan concept; a miss is fatal
    pub fn careplan(&self, key: &str) -> Result<&CarePlanEntry> {
        self.careplans.get(key).ok_or_else(|| missing("care-plan", key))
    }

    /// Looks up a medication concept; a miss is fatal
    pub fn medication(&self, key: &str) -> Result<&MedicationEntry> {
        self.medications
            .get(key)
            .ok_or_else(|| missing("medication", key))
    }

    /// Looks up a dosage-instruction concept; a miss is fatal
    pub fn instruction(&self, key: &str) -> Result<&InstructionEntry> {
        self.instructions
            .get(key)
            .ok_or_else(|| missing("instruction", key))
    }

    /// Inserts a condition concept
    pub fn insert_condition(
        mut self,
        key: impl Into<String>,
        code: impl Into<String>,
        display: impl Into<String>,
    ) -> Self {
        self.conditions.insert(
            key.into(),
            ConditionEntry {
                code: code.into(),
                display: display.into(),
            },
        );
        self
    }

    /// Inserts a quantity-valued observation concept
    pub fn insert_observation(
        mut self,
        key: impl Into<String>,
        code: impl Into<String>,
        display: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        self.observations.insert(
            key.into(),
            ObservationEntry {
                code: code.into(),
                display: display.into(),
                unit: unit.into(),
                value_type: ObservationValueType::Quantity,
            },
        );
        self
    }

    /// Inserts a condition-valued observation concept
    pub fn insert_coded_observation(
        mut self,
        key: impl Into<String>,
        code: impl Into<String>,
        display: impl Into<String>,
    ) -> Self {
        self.observations.insert(
            key.into(),
            ObservationEntry {
                code: code.into(),
                display: display.into(),
                unit: String::new(),
                value_type: ObservationValueType::Condition,
            },
        );
        self
    }

    /// Inserts an encounter concept
    pub fn insert_encounter(
        mut self,
        key: impl Into<String>,
        code: impl Into<String>,
        display: impl Into<String>,
        class: impl Into<String>,
    ) -> Self {
        self.encounters.insert(
            key.into(),
            EncounterEntry {
                code: code.into(),
                display: display.into(),
                class: class.into(),
            },
        );
        self
    }

    /// Inserts a procedure concept
    pub fn insert_procedure(
        mut self,
        key: impl Into<String>,
        code: impl Into<String>,
        display: impl Into<String>,
    ) -> Self {
        self.procedures.insert(
            key.into(),
            ProcedureEntry {
                code: code.into(),
                display: display.into(),
            },
        );
        self
    }

    /// Inserts a vaccine concept
    pub fn insert_immunization(
        mut self,
        key: impl Into<String>,
        code: impl Into<String>,
        display: impl Into<String>,
    ) -> Self {
        self.immunizations.insert(
            key.into(),
            ImmunizationEntry {
                code: code.into(),
                display: display.into(),
            },
        );
        self
    }

    /// Inserts a care-plan concept
    pub fn insert_careplan(
        mut self,
        key: impl Into<String>,
        code: impl Into<String>,
        display: impl Into<String>,
    ) -> Self {
        self.careplans.insert(
            key.into(),
            CarePlanEntry {
                code: code.into(),
                display: display.into(),
            },
        );
        self
    }

    /// Inserts a medication concept
    pub fn insert_medication(
        mut self,
        key: impl Into<String>,
        code: impl Into<String>,
        display: impl Into<String>,
    ) -> Self {
        self.medications.insert(
            key.into(),
            MedicationEntry {
                code: code.into(),
                display: display.into(),
            },
        );
        self
    }

    /// Inserts a dosage-instruction concept
    pub fn insert_instruction(
        mut self,
        key: impl Into<String>,
        code: impl Into<String>,
        display: impl Into<String>,
    ) -> Self {
        self.instructions.insert(
            key.into(),
            InstructionEntry {
                code: code.into(),
                display: display.into(),
            },
        );
        self
    }
}

fn missing(table: &'static str, key: &str) -> CaduceusError {
    CaduceusError::MissingLookup {
        table,
        key: key.to_string(),
    }
}
