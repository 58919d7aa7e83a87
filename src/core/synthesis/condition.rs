//! Condition and allergy synthesizers
//!
//! Both consume condition-stream events; the allergy synthesizer handles
//! events carrying the allergy override tag.

use super::{concept, SynthContext};
use crate::core::bundle::{Bundle, Entry};
use crate::core::datetime::{to_wire_date, to_wire_timestamp};
use crate::domain::event::ConditionEvent;
use crate::domain::ids::IdGenerator;
use crate::domain::result::Result;
use crate::fhir::systems;
use crate::fhir::{AllergyIntolerance, Condition, Reference, Resource};

/// Synthesizes a confirmed, active Condition
pub fn synthesize_condition(
    event: &ConditionEvent,
    bundle: &mut Bundle,
    ctx: &SynthContext<'_>,
    ids: &mut dyn IdGenerator,
) -> Result<()> {
    let condition_data = ctx.terminology.condition(&event.kind)?;
    let id = ids.next_id();

    let resource = Resource::Condition(Condition {
        id: id.as_str().to_string(),
        subject: Reference::to(ctx.patient_ref),
        code: concept(
            systems::SNOMED,
            condition_data.code.clone(),
            condition_data.display.clone(),
        ),
        verification_status: "confirmed".to_string(),
        clinical_status: "active".to_string(),
        onset_date_time: to_wire_timestamp(event.time),
        asserted_date: to_wire_date(event.time),
        abatement_date_time: event.end_time.map(to_wire_timestamp),
        context: Reference::to(ctx.encounter_ref),
    });

    bundle.append(Entry::new(id, resource));
    Ok(())
}

/// Synthesizes an AllergyIntolerance from an allergy-tagged condition event
///
/// Clinical status tracks the event's end time: a closed event is an
/// inactive allergy. Criticality is fixed to `low`; the output must be
/// reproducible run to run.
pub fn synthesize_allergy(
    event: &ConditionEvent,
    bundle: &mut Bundle,
    ctx: &SynthContext<'_>,
    ids: &mut dyn IdGenerator,
) -> Result<()> {
    let condition_data = ctx.terminology.condition(&event.kind)?;
    let id = ids.next_id();

    let clinical_status = if event.end_time.is_some() {
        "inactive"
    } else {
        "active"
    };

    let resource = Resource::AllergyIntolerance(AllergyIntolerance {
        id: id.as_str().to_string(),
        asserted_date: to_wire_timestamp(event.time),
        clinical_status: clinical_status.to_string(),
        kind: "allergy".to_string(),
        category: "food".to_string(),
        criticality: "low".to_string(),
        verification_status: "confirmed".to_string(),
        patient: Reference::to(ctx.patient_ref),
        code: concept(
            systems::SNOMED,
            condition_data.code.clone(),
            condition_data.display.clone(),
        ),
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
    use chrono::{Duration, TimeZone, Utc};

    fn terminology() -> Terminology {
        Terminology::new()
            .insert_condition("bronchitis", "32398004", "Bronchitis")
            .insert_condition("food_allergy_peanuts", "91935009", "Allergy to peanuts")
    }

    #[test]
    fn test_condition_fields() {
        let terminology = terminology();
        let ctx = SynthContext {
            terminology: &terminology,
            patient_ref: "urn:uuid:p",
            encounter_ref: "urn:uuid:e",
        };
        let mut bundle = Bundle::new();
        let mut ids = SequenceGenerator::new("c");
        let onset = Utc.with_ymd_and_hms(2015, 6, 1, 12, 0, 0).unwrap();

        synthesize_condition(
            &ConditionEvent::new(onset, "bronchitis"),
            &mut bundle,
            &ctx,
            &mut ids,
        )
        .unwrap();

        let json = bundle.to_json().unwrap();
        let condition = &json["entry"][0]["resource"];
        assert_eq!(condition["resourceType"], "Condition");
        assert_eq!(condition["verificationStatus"], "confirmed");
        assert_eq!(condition["clinicalStatus"], "active");
        assert_eq!(condition["code"]["coding"][0]["code"], "32398004");
        assert_eq!(condition["onsetDateTime"], "2015-06-01T12:00:00+00:00");
        assert_eq!(condition["assertedDate"], "2015-06-01");
        assert_eq!(condition["subject"]["reference"], "urn:uuid:p");
        assert_eq!(condition["context"]["reference"], "urn:uuid:e");
        assert!(condition.get("abatementDateTime").is_none());
    }

    #[test]
    fn test_condition_with_abatement() {
        let terminology = terminology();
        let ctx = SynthContext {
            terminology: &terminology,
            patient_ref: "urn:uuid:p",
            encounter_ref: "urn:uuid:e",
        };
        let mut bundle = Bundle::new();
        let mut ids = SequenceGenerator::new("c");
        let onset = Utc.with_ymd_and_hms(2015, 6, 1, 12, 0, 0).unwrap();

        synthesize_condition(
            &ConditionEvent::new(onset, "bronchitis").with_end_time(onset + Duration::days(14)),
            &mut bundle,
            &ctx,
            &mut ids,
        )
        .unwrap();

        let json = bundle.to_json().unwrap();
        assert_eq!(
            json["entry"][0]["resource"]["abatementDateTime"],
            "2015-06-15T12:00:00+00:00"
        );
    }

    #[test]
    fn test_allergy_status_tracks_end_time() {
        let terminology = terminology();
        let ctx = SynthContext {
            terminology: &terminology,
            patient_ref: "urn:uuid:p",
            encounter_ref: "urn:uuid:e",
        };
        let mut bundle = Bundle::new();
        let mut ids = SequenceGenerator::new("a");
        let onset = Utc.with_ymd_and_hms(2015, 6, 1, 12, 0, 0).unwrap();

        synthesize_allergy(
            &ConditionEvent::new(onset, "food_allergy_peanuts"),
            &mut bundle,
            &ctx,
            &mut ids,
        )
        .unwrap();
        synthesize_allergy(
            &ConditionEvent::new(onset, "food_allergy_peanuts")
                .with_end_time(onset + Duration::days(365)),
            &mut bundle,
            &ctx,
            &mut ids,
        )
        .unwrap();

        let json = bundle.to_json().unwrap();
        assert_eq!(json["entry"][0]["resource"]["resourceType"], "AllergyIntolerance");
        assert_eq!(json["entry"][0]["resource"]["clinicalStatus"], "active");
        assert_eq!(json["entry"][1]["resource"]["clinicalStatus"], "inactive");
        assert_eq!(json["entry"][0]["resource"]["criticality"], "low");
    }

    #[test]
    fn test_unknown_condition_type_is_fatal() {
        let terminology = terminology();
        let ctx = SynthContext {
            terminology: &terminology,
            patient_ref: "urn:uuid:p",
            encounter_ref: "urn:uuid:e",
        };
        let mut bundle = Bundle::new();
        let mut ids = SequenceGenerator::new("c");
        let onset = Utc.with_ymd_and_hms(2015, 6, 1, 12, 0, 0).unwrap();

        let err = synthesize_condition(
            &ConditionEvent::new(onset, "dragon_pox"),
            &mut bundle,
            &ctx,
            &mut ids,
        )
        .unwrap_err();
        assert!(matches!(err, CaduceusError::MissingLookup { .. }));
        assert!(bundle.is_empty());
    }
}
