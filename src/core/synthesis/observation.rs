//! Observation, composite-observation, and diagnostic-report synthesizers
//!
//! Plain observations carry a single value. The composite synthesizer folds
//! the most recently appended observations into one panel by consuming them
//! from the bundle's tail; the report synthesizer references the trailing
//! entries without removing them, so its results stay independently
//! addressable.

use super::{concept, SynthContext};
use crate::core::bundle::{Bundle, Entry};
use crate::core::datetime::to_wire_timestamp;
use crate::domain::errors::CaduceusError;
use crate::domain::event::{ObservationEvent, ObservationValue};
use crate::domain::ids::IdGenerator;
use crate::domain::result::Result;
use crate::fhir::systems;
use crate::fhir::{
    CodeableConcept, Coding, DiagnosticReport, Observation, ObservationComponent, Quantity,
    Reference, Resource,
};
use crate::terminology::ObservationValueType;

/// Synthesizes a single-valued Observation
///
/// The terminology entry decides how the recorded value is emitted: as a
/// UCUM quantity in the entry's unit, or as a coded concept resolved
/// through the condition table.
pub fn synthesize_observation(
    event: &ObservationEvent,
    bundle: &mut Bundle,
    ctx: &SynthContext<'_>,
    ids: &mut dyn IdGenerator,
) -> Result<()> {
    let obs_data = ctx.terminology.observation(&event.kind)?;

    let (value_quantity, value_codeable_concept) = match (obs_data.value_type, &event.value) {
        (ObservationValueType::Quantity, Some(ObservationValue::Quantity(value))) => {
            (Some(Quantity::ucum(*value, obs_data.unit.clone())), None)
        }
        (ObservationValueType::Condition, Some(ObservationValue::Concept(condition_kind))) => {
            let condition_data = ctx.terminology.condition(condition_kind)?;
            let value = concept(
                systems::SNOMED,
                condition_data.code.clone(),
                condition_data.display.clone(),
            )
            .with_text(condition_data.display.clone());
            (None, Some(value))
        }
        (expected, actual) => {
            return Err(CaduceusError::Validation(format!(
                "observation '{}' declares {expected:?} values but the event carries {actual:?}",
                event.kind
            )))
        }
    };

    let id = ids.next_id();
    let resource = Resource::Observation(Observation {
        id: id.as_str().to_string(),
        status: "final".to_string(),
        code: concept(systems::LOINC, obs_data.code.clone(), obs_data.display.clone())
            .with_text(obs_data.display.clone()),
        category: Some(category_concept(&event.category)),
        subject: Reference::to(ctx.patient_ref),
        encounter: Reference::to(ctx.encounter_ref),
        effective_date_time: to_wire_timestamp(event.time),
        issued: Some(to_wire_timestamp(event.time)),
        value_quantity,
        value_codeable_concept,
        component: Vec::new(),
    });

    bundle.append(Entry::new(id, resource));
    Ok(())
}

/// Synthesizes a composite Observation from the `members` trailing entries
///
/// Consumes the panel members from the bundle's tail and re-parents their
/// code/value pairs as components of one new observation, in their original
/// append order. The consumed entries must be plain quantity observations;
/// the scheduler processes a composite right after its constituents, and a
/// mismatch here means the input stream violated that contract.
pub fn synthesize_multi_observation(
    event: &ObservationEvent,
    members: usize,
    bundle: &mut Bundle,
    ctx: &SynthContext<'_>,
    ids: &mut dyn IdGenerator,
) -> Result<()> {
    let multi_data = ctx.terminology.observation(&event.kind)?;

    for entry in bundle.last_entries(members)? {
        match &entry.resource {
            Resource::Observation(obs)
                if obs.value_quantity.is_some() && obs.component.is_empty() => {}
            other => {
                return Err(CaduceusError::InvalidComposite(format!(
                    "entry {} is a {} where a quantity-valued observation was expected",
                    entry.full_url(),
                    other.kind()
                )))
            }
        }
    }

    let consumed = bundle.consume_last_entries(members)?;
    let component = consumed
        .iter()
        .map(|entry| match &entry.resource {
            Resource::Observation(obs) => ObservationComponent {
                code: obs.code.clone(),
                value_quantity: obs.value_quantity.clone(),
            },
            _ => unreachable!("composite panel validated above"),
        })
        .collect();

    let id = ids.next_id();
    let resource = Resource::Observation(Observation {
        id: id.as_str().to_string(),
        status: "final".to_string(),
        code: concept(systems::LOINC, multi_data.code.clone(), multi_data.display.clone()),
        category: Some(category_concept(&event.category)),
        subject: Reference::to(ctx.patient_ref),
        encounter: Reference::to(ctx.encounter_ref),
        effective_date_time: to_wire_timestamp(event.time),
        issued: None,
        value_quantity: None,
        value_codeable_concept: None,
        component,
    });

    bundle.append(Entry::new(id, resource));
    Ok(())
}

/// Synthesizes a DiagnosticReport over the `results` trailing entries
///
/// Reads without removing: each trailing entry is referenced as a result
/// with its primary display text.
pub fn synthesize_diagnostic_report(
    event: &ObservationEvent,
    results: usize,
    bundle: &mut Bundle,
    ctx: &SynthContext<'_>,
    ids: &mut dyn IdGenerator,
) -> Result<()> {
    let report_data = ctx.terminology.observation(&event.kind)?;

    let result: Vec<Reference> = bundle
        .last_entries(results)?
        .iter()
        .map(result_reference)
        .collect();

    let id = ids.next_id();
    let resource = Resource::DiagnosticReport(DiagnosticReport {
        id: id.as_str().to_string(),
        status: "final".to_string(),
        code: concept(
            systems::LOINC,
            report_data.code.clone(),
            report_data.display.clone(),
        ),
        subject: Reference::to(ctx.patient_ref),
        encounter: Reference::to(ctx.encounter_ref),
        effective_date_time: to_wire_timestamp(event.time),
        issued: Some(to_wire_timestamp(event.time)),
        performer: vec![Reference::display_only("Hospital Lab")],
        result,
    });

    bundle.append(Entry::new(id, resource));
    Ok(())
}

fn result_reference(entry: &Entry) -> Reference {
    let mut reference = entry.as_reference();
    if let Some(display) = entry
        .resource
        .code_concept()
        .and_then(|concept| concept.primary_display())
    {
        reference = reference.with_display(display);
    }
    reference
}

fn category_concept(category: &str) -> CodeableConcept {
    CodeableConcept::from_coding(Coding::new(systems::OBSERVATION_CATEGORY, category))
        .with_text(category)
}
