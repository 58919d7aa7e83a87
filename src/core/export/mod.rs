//! Export orchestration
//!
//! The timeline merge scheduler that drives a full run: patient first, then
//! encounter by encounter, category by category.

pub mod scheduler;

pub use scheduler::{export_patient, Exporter};
