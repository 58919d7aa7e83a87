//! Resource synthesizers
//!
//! One pure function per clinical concept. Every synthesizer builds one
//! typed resource from one event plus previously emitted context, appends
//! exactly one entry to the bundle, and mutates nothing else (the composite
//! observation additionally consumes its panel members from the tail
//! first).
//!
//! Dispatch resolves an event's category plus its optional typed handler
//! override to a synthesizer, so one category's events can produce
//! different resource kinds: a condition event tagged for allergy handling
//! becomes an AllergyIntolerance, an observation event tagged as composite
//! or report becomes a panel or a DiagnosticReport.

pub mod careplan;
pub mod condition;
pub mod encounter;
pub mod immunization;
pub mod medication;
pub mod observation;
pub mod patient;
pub mod procedure;

use crate::core::bundle::Bundle;
use crate::domain::event::{ConditionEvent, ConditionHandler, ObservationEvent, ObservationHandler};
use crate::domain::ids::IdGenerator;
use crate::domain::result::Result;
use crate::fhir::{CodeableConcept, Coding};
use crate::terminology::Terminology;

pub use encounter::synthesize_encounter;
pub use patient::synthesize_patient;

/// Previously emitted context every event synthesizer links against
#[derive(Debug, Clone, Copy)]
pub struct SynthContext<'a> {
    /// Injected read-only code dictionaries
    pub terminology: &'a Terminology,
    /// `fullUrl` of the patient entry (always the first entry)
    pub patient_ref: &'a str,
    /// `fullUrl` of the encounter entry the event was dispatched under
    pub encounter_ref: &'a str,
}

/// Routes a condition-stream event to its synthesizer
pub fn dispatch_condition(
    event: &ConditionEvent,
    bundle: &mut Bundle,
    ctx: &SynthContext<'_>,
    ids: &mut dyn IdGenerator,
) -> Result<()> {
    match event.handler {
        Some(ConditionHandler::Allergy) => condition::synthesize_allergy(event, bundle, ctx, ids),
        None => condition::synthesize_condition(event, bundle, ctx, ids),
    }
}

/// Routes an observation-stream event to its synthesizer
pub fn dispatch_observation(
    event: &ObservationEvent,
    bundle: &mut Bundle,
    ctx: &SynthContext<'_>,
    ids: &mut dyn IdGenerator,
) -> Result<()> {
    match event.handler {
        Some(ObservationHandler::MultiObservation { members }) => {
            observation::synthesize_multi_observation(event, members, bundle, ctx, ids)
        }
        Some(ObservationHandler::DiagnosticReport { results }) => {
            observation::synthesize_diagnostic_report(event, results, bundle, ctx, ids)
        }
        None => observation::synthesize_observation(event, bundle, ctx, ids),
    }
}

/// A one-coding concept in the given system
pub(crate) fn concept(
    system: &str,
    code: impl Into<String>,
    display: impl Into<String>,
) -> CodeableConcept {
    CodeableConcept::from_coding(Coding::new(system, code).with_display(display))
}
