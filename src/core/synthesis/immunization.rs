//! Immunization synthesizer

use super::{concept, SynthContext};
use crate::core::bundle::{Bundle, Entry};
use crate::core::datetime::to_wire_timestamp;
use crate::domain::event::ImmunizationEvent;
use crate::domain::ids::IdGenerator;
use crate::domain::result::Result;
use crate::fhir::systems;
use crate::fhir::{Immunization, Reference, Resource};

/// Synthesizes a completed Immunization
pub fn synthesize_immunization(
    event: &ImmunizationEvent,
    bundle: &mut Bundle,
    ctx: &SynthContext<'_>,
    ids: &mut dyn IdGenerator,
) -> Result<()> {
    let vaccine_data = ctx.terminology.immunization(&event.kind)?;
    let id = ids.next_id();

    let resource = Resource::Immunization(Immunization {
        id: id.as_str().to_string(),
        status: "completed".to_string(),
        date: to_wire_timestamp(event.time),
        vaccine_code: concept(
            systems::CVX,
            vaccine_data.code.clone(),
            vaccine_data.display.clone(),
        )
        .with_text(vaccine_data.display.clone()),
        patient: Reference::to(ctx.patient_ref),
        was_not_given: false,
        primary_source: true,
        encounter: Reference::to(ctx.encounter_ref),
    });

    bundle.append(Entry::new(id, resource));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::CaduceusError;
    use crate::domain::ids::SequenceGenerator;
    use crate::terminology::Terminology;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_immunization_fields() {
        let terminology =
            Terminology::new().insert_immunization("flu", "140", "Influenza, seasonal");
        let ctx = SynthContext {
            terminology: &terminology,
            patient_ref: "urn:uuid:p",
            encounter_ref: "urn:uuid:e",
        };
        let mut bundle = Bundle::new();
        let mut ids = SequenceGenerator::new("i");
        let time = Utc.with_ymd_and_hms(2016, 10, 1, 10, 0, 0).unwrap();

        synthesize_immunization(&ImmunizationEvent::new(time, "flu"), &mut bundle, &ctx, &mut ids)
            .unwrap();

        let json = bundle.to_json().unwrap();
        let immunization = &json["entry"][0]["resource"];
        assert_eq!(immunization["resourceType"], "Immunization");
        assert_eq!(immunization["status"], "completed");
        assert_eq!(immunization["wasNotGiven"], false);
        assert_eq!(immunization["primarySource"], true);
        assert_eq!(immunization["vaccineCode"]["coding"][0]["code"], "140");
        assert_eq!(immunization["vaccineCode"]["text"], "Influenza, seasonal");
        assert_eq!(immunization["date"], "2016-10-01T10:00:00+00:00");
    }

    #[test]
    fn test_unknown_vaccine_is_fatal() {
        let terminology = Terminology::new();
        let ctx = SynthContext {
            terminology: &terminology,
            patient_ref: "urn:uuid:p",
            encounter_ref: "urn:uuid:e",
        };
        let mut bundle = Bundle::new();
        let mut ids = SequenceGenerator::new("i");
        let time = Utc.with_ymd_and_hms(2016, 10, 1, 10, 0, 0).unwrap();

        let err = synthesize_immunization(
            &ImmunizationEvent::new(time, "flu"),
            &mut bundle,
            &ctx,
            &mut ids,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CaduceusError::MissingLookup {
                table: "immunization",
                ..
            }
        ));
    }
}
