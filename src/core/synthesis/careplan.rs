//! Care-plan synthesizer

use super::{concept, SynthContext};
use crate::core::bundle::{Bundle, Entry};
use crate::core::datetime::to_wire_date;
use crate::core::resolver::find_first_by_kind_and_code;
use crate::domain::event::CarePlanEvent;
use crate::domain::ids::IdGenerator;
use crate::domain::result::Result;
use crate::fhir::systems;
use crate::fhir::{
    CarePlan, CarePlanActivity, CarePlanActivityDetail, Period, Reference, Resource, ResourceKind,
};

/// Synthesizes a CarePlan
///
/// Each addressed reason resolves to the earliest previously appended
/// Condition with that code; reasons with no prior match are silently
/// omitted. Activity statuses track the plan: a stopped plan carries
/// completed activities, an open plan in-progress ones.
pub fn synthesize_careplan(
    event: &CarePlanEvent,
    bundle: &mut Bundle,
    ctx: &SynthContext<'_>,
    ids: &mut dyn IdGenerator,
) -> Result<()> {
    let careplan_data = ctx.terminology.careplan(&event.kind)?;

    let mut addresses = Vec::new();
    for reason_kind in &event.reasons {
        let reason_data = ctx.terminology.condition(reason_kind)?;
        if let Some(entry) =
            find_first_by_kind_and_code(bundle, ResourceKind::Condition, &reason_data.code)
        {
            addresses.push(entry.as_reference());
        }
    }

    let (status, activity_status, period) = match event.end_time {
        Some(end) => (
            "completed",
            "completed",
            Period::starting(to_wire_date(event.time)).with_end(to_wire_date(end)),
        ),
        None => (
            "active",
            "in-progress",
            Period::starting(to_wire_date(event.time)),
        ),
    };

    let mut activity = Vec::new();
    for activity_kind in &event.activities {
        let activity_data = ctx.terminology.careplan(activity_kind)?;
        activity.push(CarePlanActivity {
            detail: CarePlanActivityDetail {
                status: activity_status.to_string(),
                code: concept(
                    systems::SNOMED,
                    activity_data.code.clone(),
                    activity_data.display.clone(),
                ),
            },
        });
    }

    let id = ids.next_id();
    let resource = Resource::CarePlan(CarePlan {
        id: id.as_str().to_string(),
        subject: Reference::to(ctx.patient_ref),
        context: Reference::to(ctx.encounter_ref),
        status: status.to_string(),
        period,
        category: vec![concept(
            systems::SNOMED,
            careplan_data.code.clone(),
            careplan_data.display.clone(),
        )],
        activity,
        addresses,
    });

    bundle.append(Entry::new(id, resource));
    Ok(())
}
