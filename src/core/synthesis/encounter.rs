//! Encounter and provider synthesizers
//!
//! Each encounter gets exactly one fresh provider Organization, appended
//! before the encounter that references it. Providers are intentionally not
//! pooled or deduplicated across encounters.

use super::concept;
use crate::core::bundle::{Bundle, Entry};
use crate::core::datetime::to_wire_timestamp;
use crate::domain::encounter::EncounterData;
use crate::domain::ids::IdGenerator;
use crate::domain::result::Result;
use crate::fhir::systems;
use crate::fhir::{
    CodeableConcept, Coding, Encounter, Hospitalization, Organization, Period, Reference, Resource,
};
use crate::terminology::Terminology;
use chrono::Duration;

/// Display name of the per-encounter provider organization
const PROVIDER_NAME: &str = "Synthetic Provider";

/// Wire period end for encounters the source never closed
const DEFAULT_ENCOUNTER_MINUTES: i64 = 15;

/// Synthesizes one encounter and its provider, appending both
///
/// Returns the encounter entry's `fullUrl` for the events dispatched under
/// it.
pub fn synthesize_encounter(
    data: &EncounterData,
    terminology: &Terminology,
    patient_ref: &str,
    bundle: &mut Bundle,
    ids: &mut dyn IdGenerator,
) -> Result<String> {
    let encounter_data = terminology.encounter(&data.kind)?;
    let reason = match &data.reason {
        Some(reason_kind) => {
            let reason_data = terminology.condition(reason_kind)?;
            Some(concept(
                systems::SNOMED,
                reason_data.code.clone(),
                reason_data.display.clone(),
            ))
        }
        None => None,
    };

    let provider_ref = synthesize_provider(bundle, ids);

    let end_time = data
        .end_time
        .unwrap_or(data.time + Duration::minutes(DEFAULT_ENCOUNTER_MINUTES));

    let id = ids.next_id();
    let resource = Resource::Encounter(Encounter {
        id: id.as_str().to_string(),
        status: "finished".to_string(),
        class_code: Coding::code_only(encounter_data.class.clone()),
        kind: vec![CodeableConcept::from_coding(Coding::new(
            systems::SNOMED,
            encounter_data.code.clone(),
        ))
        .with_text(encounter_data.display.clone())],
        patient: Reference::to(patient_ref),
        service_provider: Reference::to(provider_ref),
        period: Period::starting(to_wire_timestamp(data.time))
            .with_end(to_wire_timestamp(end_time)),
        reason,
        hospitalization: data.discharge.as_ref().map(|discharge| Hospitalization {
            discharge_disposition: concept(
                systems::DISCHARGE_DISPOSITION,
                discharge.code.clone(),
                discharge.display.clone(),
            ),
        }),
    });

    let entry = Entry::new(id, resource);
    let full_url = entry.full_url().to_string();
    bundle.append(entry);
    Ok(full_url)
}

/// Appends a fresh provider Organization and returns its `fullUrl`
fn synthesize_provider(bundle: &mut Bundle, ids: &mut dyn IdGenerator) -> String {
    let id = ids.next_id();
    let resource = Resource::Organization(Organization {
        id: id.as_str().to_string(),
        name: PROVIDER_NAME.to_string(),
        kind: Some(
            concept(
                systems::ORGANIZATION_TYPE,
                "prov",
                "Healthcare Provider",
            )
            .with_text("Healthcare Provider"),
        ),
    });

    let entry = Entry::new(id, resource);
    let full_url = entry.full_url().to_string();
    bundle.append(entry);
    full_url
}
