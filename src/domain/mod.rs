//! Domain models and types for Caduceus.
//!
//! This module contains the input-side domain model: the patient record and
//! its per-category event streams, encounter inputs, generated resource
//! identities, and the error hierarchy.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Patient record inputs** ([`PatientRecord`], [`Demographics`],
//!   [`EncounterData`], the event structs in [`event`])
//! - **Identity generation** ([`ResourceId`], [`IdGenerator`] and its two
//!   implementations)
//! - **Error types** ([`CaduceusError`]) and the [`Result`] alias
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T>`]:
//!
//! ```rust
//! use caduceus::domain::{CaduceusError, Result};
//!
//! fn example() -> Result<()> {
//!     Err(CaduceusError::Validation("bad input".to_string()))
//! }
//! ```

pub mod encounter;
pub mod errors;
pub mod event;
pub mod ids;
pub mod patient;
pub mod result;

// Re-export commonly used types for convenience
pub use encounter::{DischargeDisposition, EncounterData};
pub use errors::CaduceusError;
pub use event::{
    CarePlanEvent, ConditionEvent, ConditionHandler, Dosage, EventCategory, ImmunizationEvent,
    MedicationEvent, ObservationEvent, ObservationHandler, ObservationValue, Prescription,
    ProcedureEvent, SupplyDuration,
};
pub use ids::{IdGenerator, ResourceId, SequenceGenerator, UuidGenerator};
pub use patient::{CodedText, Demographics, Gender, GeoPoint, LanguageCode, PatientRecord, PostalAddress};
pub use result::Result;
