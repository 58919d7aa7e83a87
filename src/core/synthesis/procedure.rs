//! Procedure synthesizer

use super::{concept, SynthContext};
use crate::core::bundle::{Bundle, Entry};
use crate::core::datetime::to_wire_timestamp;
use crate::core::resolver::find_first_by_kind_and_code;
use crate::domain::event::ProcedureEvent;
use crate::domain::ids::IdGenerator;
use crate::domain::result::Result;
use crate::fhir::systems;
use crate::fhir::{Period, Procedure, Reference, Resource, ResourceKind};
use chrono::Duration;

/// Synthesizes a completed Procedure
///
/// When the event names a reason, the earliest previously appended
/// Condition with that code is referenced; a reason with no prior match is
/// silently omitted.
pub fn synthesize_procedure(
    event: &ProcedureEvent,
    bundle: &mut Bundle,
    ctx: &SynthContext<'_>,
    ids: &mut dyn IdGenerator,
) -> Result<()> {
    let proc_data = ctx.terminology.procedure(&event.kind)?;

    let reason_reference = match &event.reason {
        Some(reason_kind) => {
            let reason_data = ctx.terminology.condition(reason_kind)?;
            find_first_by_kind_and_code(bundle, ResourceKind::Condition, &reason_data.code).map(
                |entry| {
                    entry
                        .as_reference()
                        .with_display(reason_data.display.clone())
                },
            )
        }
        None => None,
    };

    let (performed_date_time, performed_period) = match event.duration_seconds {
        Some(seconds) => {
            let period = Period::starting(to_wire_timestamp(event.time))
                .with_end(to_wire_timestamp(event.time + Duration::seconds(seconds)));
            (None, Some(period))
        }
        None => (Some(to_wire_timestamp(event.time)), None),
    };

    let id = ids.next_id();
    let resource = Resource::Procedure(Procedure {
        id: id.as_str().to_string(),
        subject: Reference::to(ctx.patient_ref),
        status: "completed".to_string(),
        code: concept(systems::SNOMED, proc_data.code.clone(), proc_data.display.clone())
            .with_text(proc_data.display.clone()),
        encounter: Reference::to(ctx.encounter_ref),
        reason_reference,
        performed_date_time,
        performed_period,
    });

    bundle.append(Entry::new(id, resource));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::synthesis::condition::synthesize_condition;
    use crate::domain::event::ConditionEvent;
    use crate::domain::ids::SequenceGenerator;
    use crate::terminology::Terminology;
    use chrono::{DateTime, TimeZone, Utc};

    fn terminology() -> Terminology {
        Terminology::new()
            .insert_procedure("appendectomy", "80146002", "Appendectomy")
            .insert_condition("appendicitis", "74400008", "Appendicitis")
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2016, 3, 4, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_reason_resolves_to_earliest_condition() {
        let terminology = terminology();
        let ctx = SynthContext {
            terminology: &terminology,
            patient_ref: "urn:uuid:p",
            encounter_ref: "urn:uuid:e",
        };
        let mut bundle = Bundle::new();
        let mut ids = SequenceGenerator::new("x");

        synthesize_condition(
            &ConditionEvent::new(t0(), "appendicitis"),
            &mut bundle,
            &ctx,
            &mut ids,
        )
        .unwrap();

        synthesize_procedure(
            &ProcedureEvent::new(t0(), "appendectomy").with_reason("appendicitis"),
            &mut bundle,
            &ctx,
            &mut ids,
        )
        .unwrap();

        let json = bundle.to_json().unwrap();
        let procedure = &json["entry"][1]["resource"];
        assert_eq!(procedure["resourceType"], "Procedure");
        assert_eq!(procedure["status"], "completed");
        assert_eq!(procedure["reasonReference"]["reference"], "urn:uuid:x-1");
        assert_eq!(procedure["reasonReference"]["display"], "Appendicitis");
        assert_eq!(procedure["performedDateTime"], "2016-03-04T09:00:00+00:00");
    }

    #[test]
    fn test_unmatched_reason_is_omitted() {
        let terminology = terminology();
        let ctx = SynthContext {
            terminology: &terminology,
            patient_ref: "urn:uuid:p",
            encounter_ref: "urn:uuid:e",
        };
        let mut bundle = Bundle::new();
        let mut ids = SequenceGenerator::new("x");

        // no prior Condition entry exists
        synthesize_procedure(
            &ProcedureEvent::new(t0(), "appendectomy").with_reason("appendicitis"),
            &mut bundle,
            &ctx,
            &mut ids,
        )
        .unwrap();

        let json = bundle.to_json().unwrap();
        assert!(json["entry"][0]["resource"].get("reasonReference").is_none());
    }

    #[test]
    fn test_duration_becomes_performed_period() {
        let terminology = terminology();
        let ctx = SynthContext {
            terminology: &terminology,
            patient_ref: "urn:uuid:p",
            encounter_ref: "urn:uuid:e",
        };
        let mut bundle = Bundle::new();
        let mut ids = SequenceGenerator::new("x");

        synthesize_procedure(
            &ProcedureEvent::new(t0(), "appendectomy").with_duration_seconds(3600),
            &mut bundle,
            &ctx,
            &mut ids,
        )
        .unwrap();

        let json = bundle.to_json().unwrap();
        let procedure = &json["entry"][0]["resource"];
        assert!(procedure.get("performedDateTime").is_none());
        assert_eq!(procedure["performedPeriod"]["start"], "2016-03-04T09:00:00+00:00");
        assert_eq!(procedure["performedPeriod"]["end"], "2016-03-04T10:00:00+00:00");
    }
}
