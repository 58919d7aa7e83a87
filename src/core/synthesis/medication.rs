//! Medication-order synthesizer

use super::{concept, SynthContext};
use crate::core::bundle::{Bundle, Entry};
use crate::core::datetime::{to_ucum, to_wire_date};
use crate::core::resolver::find_first_by_kind_and_code;
use crate::domain::event::{MedicationEvent, Prescription};
use crate::domain::ids::IdGenerator;
use crate::domain::result::Result;
use crate::fhir::systems;
use crate::fhir::{
    CodeableConcept, Coding, DispenseRequest, DosageInstruction, MedicationRequest, Quantity,
    Reference, Resource, ResourceKind, Timing, TimingRepeat,
};

/// Synthesizes a MedicationRequest
///
/// Each motivating reason resolves to the earliest previously appended
/// Condition with that code; reasons with no prior match are silently
/// omitted. Scheduled prescriptions additionally emit dose timing,
/// instructions, and the dispense authorization.
pub fn synthesize_medication(
    event: &MedicationEvent,
    bundle: &mut Bundle,
    ctx: &SynthContext<'_>,
    ids: &mut dyn IdGenerator,
) -> Result<()> {
    let med_data = ctx.terminology.medication(&event.kind)?;

    let mut reason_reference = Vec::new();
    for reason_kind in &event.reasons {
        let reason_data = ctx.terminology.condition(reason_kind)?;
        if let Some(entry) =
            find_first_by_kind_and_code(bundle, ResourceKind::Condition, &reason_data.code)
        {
            reason_reference.push(entry.as_reference());
        }
    }

    let (dosage_instruction, dispense_request) = match &event.prescription {
        Some(prescription) => wire_dosage(prescription, ctx)?,
        None => (Vec::new(), None),
    };

    let status = if event.end_time.is_some() {
        "stopped"
    } else {
        "active"
    };

    let id = ids.next_id();
    let resource = Resource::MedicationRequest(MedicationRequest {
        id: id.as_str().to_string(),
        medication_codeable_concept: concept(
            systems::RXNORM,
            med_data.code.clone(),
            med_data.display.clone(),
        ),
        stage: Some(CodeableConcept::from_coding(Coding::new(
            systems::REQUEST_STAGE,
            "original-order",
        ))),
        patient: Reference::to(ctx.patient_ref),
        context: Reference::to(ctx.encounter_ref),
        date_written: to_wire_date(event.time),
        status: status.to_string(),
        reason_reference,
        dosage_instruction,
        dispense_request,
    });

    bundle.append(Entry::new(id, resource));
    Ok(())
}

fn wire_dosage(
    prescription: &Prescription,
    ctx: &SynthContext<'_>,
) -> Result<(Vec<DosageInstruction>, Option<DispenseRequest>)> {
    match prescription {
        Prescription::AsNeeded => {
            let instruction = DosageInstruction {
                sequence: 1,
                as_needed_boolean: true,
                timing: None,
                dose_quantity: None,
                additional_instructions: Vec::new(),
            };
            Ok((vec![instruction], None))
        }
        Prescription::Scheduled {
            dosage,
            instructions,
            refills,
            total_doses,
            supply_duration,
        } => {
            let mut additional_instructions = Vec::new();
            for instruction_kind in instructions {
                let instruction_data = ctx.terminology.instruction(instruction_kind)?;
                additional_instructions.push(concept(
                    systems::SNOMED,
                    instruction_data.code.clone(),
                    instruction_data.display.clone(),
                ));
            }

            let instruction = DosageInstruction {
                sequence: 1,
                as_needed_boolean: false,
                timing: Some(Timing {
                    repeat: TimingRepeat {
                        frequency: dosage.frequency,
                        period: dosage.period,
                        period_unit: to_ucum(&dosage.unit)?.to_string(),
                    },
                }),
                dose_quantity: Some(Quantity::new(f64::from(dosage.amount))),
                additional_instructions,
            };

            let dispense = DispenseRequest {
                number_of_repeats_allowed: *refills,
                quantity: Quantity::new(f64::from(*total_doses)).with_unit("doses"),
                expected_supply_duration: Quantity {
                    value: f64::from(supply_duration.quantity),
                    unit: Some(supply_duration.unit.clone()),
                    system: Some(systems::UNITS_OF_TIME.to_string()),
                    code: Some(to_ucum(&supply_duration.unit)?.to_string()),
                },
            };

            Ok((vec![instruction], Some(dispense)))
        }
    }
}
