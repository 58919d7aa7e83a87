//! Timeline merge scheduler - main orchestrator for the export run
//!
//! Drives one cursor per event category across the encounter list: the
//! patient resource goes first, then for each encounter in time order the
//! scheduler appends the encounter (and its fresh provider), computes the
//! encounter's closing boundary, and drains every category's stream up to
//! that boundary in a fixed category order. Cursors persist across
//! encounters and never rewind, so each event is dispatched exactly once,
//! in stream order, to exactly one encounter.

use crate::core::bundle::Bundle;
use crate::core::synthesis::{
    careplan, dispatch_condition, dispatch_observation, immunization, medication, procedure,
    synthesize_encounter, synthesize_patient, SynthContext,
};
use crate::domain::event::EventCategory;
use crate::domain::ids::{IdGenerator, UuidGenerator};
use crate::domain::patient::PatientRecord;
use crate::domain::result::Result;
use crate::terminology::Terminology;
use chrono::{DateTime, Utc};

/// One cursor per event category, monotonic for the whole run
#[derive(Debug, Default)]
struct StreamCursors {
    conditions: usize,
    observations: usize,
    procedures: usize,
    immunizations: usize,
    careplans: usize,
    medications: usize,
}

/// Converts patient records into document bundles
///
/// Holds the injected terminology tables and the identity generator; one
/// exporter can run any number of records sequentially. Each run owns its
/// bundle exclusively and either completes or fails atomically.
///
/// # Examples
///
/// ```no_run
/// use caduceus::core::export::Exporter;
/// use caduceus::terminology::load_terminology;
/// # fn example(record: &caduceus::domain::PatientRecord) -> caduceus::domain::Result<()> {
/// let terminology = load_terminology("terminology.toml")?;
/// let mut exporter = Exporter::new(terminology);
/// let bundle = exporter.export(record, chrono::Utc::now())?;
/// println!("{}", bundle.to_json_string()?);
/// # Ok(())
/// # }
/// ```
pub struct Exporter {
    terminology: Terminology,
    ids: Box<dyn IdGenerator>,
}

impl Exporter {
    /// Creates an exporter with the production UUID identity generator
    pub fn new(terminology: Terminology) -> Self {
        Self::with_id_generator(terminology, Box::new(UuidGenerator::new()))
    }

    /// Creates an exporter with an injected identity generator
    pub fn with_id_generator(terminology: Terminology, ids: Box<dyn IdGenerator>) -> Self {
        Self { terminology, ids }
    }

    /// The injected terminology tables
    pub fn terminology(&self) -> &Terminology {
        &self.terminology
    }

    /// Runs one full export
    ///
    /// Produces the complete bundle for `record`, with `horizon` closing
    /// any encounter the source never closed. Events past the final
    /// encounter's boundary are never dispatched.
    ///
    /// # Errors
    ///
    /// Fatal on a missing terminology entry, an unsatisfiable composite or
    /// report, or an unrecognized unit of time. No partial bundle is
    /// returned.
    pub fn export(&mut self, record: &PatientRecord, horizon: DateTime<Utc>) -> Result<Bundle> {
        let Self { terminology, ids } = self;
        let terminology: &Terminology = terminology;

        tracing::info!(
            patient = %record.uuid,
            encounters = record.encounters.len(),
            "Starting export run"
        );

        let mut bundle = Bundle::new();
        let patient_ref = synthesize_patient(record, horizon, &mut bundle, ids.as_mut())?;
        let mut cursors = StreamCursors::default();

        for encounter in &record.encounters {
            let encounter_ref = synthesize_encounter(
                encounter,
                terminology,
                &patient_ref,
                &mut bundle,
                ids.as_mut(),
            )?;

            // closing boundary: encounter end, else death, else the horizon
            let boundary = encounter.end_time.or(record.death_time).unwrap_or(horizon);

            tracing::debug!(
                encounter = %encounter.kind,
                boundary = %boundary,
                "Draining event streams for encounter"
            );

            let ctx = SynthContext {
                terminology,
                patient_ref: &patient_ref,
                encounter_ref: &encounter_ref,
            };

            for category in EventCategory::DISPATCH_ORDER {
                drain_category(
                    category,
                    record,
                    &mut cursors,
                    boundary,
                    &mut bundle,
                    &ctx,
                    ids.as_mut(),
                )?;
            }
        }

        tracing::info!(
            patient = %record.uuid,
            entries = bundle.len(),
            "Export run complete"
        );
        Ok(bundle)
    }
}

/// Advances one category's cursor through every event due at or before the
/// boundary
fn drain_category(
    category: EventCategory,
    record: &PatientRecord,
    cursors: &mut StreamCursors,
    boundary: DateTime<Utc>,
    bundle: &mut Bundle,
    ctx: &SynthContext<'_>,
    ids: &mut dyn IdGenerator,
) -> Result<()> {
    match category {
        EventCategory::Condition => {
            while let Some(event) = record.conditions.get(cursors.conditions) {
                if event.time > boundary {
                    break;
                }
                dispatch_condition(event, bundle, ctx, ids)?;
                cursors.conditions += 1;
            }
        }
        EventCategory::Observation => {
            while let Some(event) = record.observations.get(cursors.observations) {
                if event.time > boundary {
                    break;
                }
                dispatch_observation(event, bundle, ctx, ids)?;
                cursors.observations += 1;
            }
        }
        EventCategory::Procedure => {
            while let Some(event) = record.procedures.get(cursors.procedures) {
                if event.time > boundary {
                    break;
                }
                procedure::synthesize_procedure(event, bundle, ctx, ids)?;
                cursors.procedures += 1;
            }
        }
        EventCategory::Immunization => {
            while let Some(event) = record.immunizations.get(cursors.immunizations) {
                if event.time > boundary {
                    break;
                }
                immunization::synthesize_immunization(event, bundle, ctx, ids)?;
                cursors.immunizations += 1;
            }
        }
        EventCategory::CarePlan => {
            while let Some(event) = record.careplans.get(cursors.careplans) {
                if event.time > boundary {
                    break;
                }
                careplan::synthesize_careplan(event, bundle, ctx, ids)?;
                cursors.careplans += 1;
            }
        }
        EventCategory::Medication => {
            while let Some(event) = record.medications.get(cursors.medications) {
                if event.time > boundary {
                    break;
                }
                medication::synthesize_medication(event, bundle, ctx, ids)?;
                cursors.medications += 1;
            }
        }
    }
    Ok(())
}

/// Converts one patient record with a single call
///
/// Convenience wrapper around [`Exporter`] for callers that export one
/// record at a time with the production identity generator.
pub fn export_patient(
    record: &PatientRecord,
    horizon: DateTime<Utc>,
    terminology: &Terminology,
) -> Result<Bundle> {
    Exporter::new(terminology.clone()).export(record, horizon)
}
