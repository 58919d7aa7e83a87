// Caduceus - Clinical Timeline to FHIR Bundle Export
// Copyright (c) 2026 Caduceus Contributors
// Licensed under the MIT License

//! # Caduceus - Clinical Timeline to FHIR Bundle Export
//!
//! Caduceus converts an in-memory, per-patient clinical timeline - a set of
//! independently time-ordered event streams plus a list of encounters -
//! into one standardized, cross-referenced FHIR STU3-style document bundle.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Merging** per-category sorted event streams into encounter-scoped
//!   groups with one forward pass per stream
//! - **Synthesizing** one typed resource per clinical event, with stable
//!   generated identities usable for back-references
//! - **Cross-linking** resources (a procedure's reason, a care plan's
//!   addressed conditions, a report's results) purely from the growing
//!   output sequence
//! - **Serializing** the finished bundle into interchange JSON
//!
//! ## Architecture
//!
//! Caduceus follows a layered architecture:
//!
//! - [`domain`] - Patient record inputs, events, identities, and errors
//! - [`terminology`] - Injected read-only code dictionaries and their loader
//! - [`fhir`] - Typed wire models for the emitted resources
//! - [`core`] - Bundle, reference resolver, synthesizers, and the scheduler
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use caduceus::core::export::Exporter;
//! use caduceus::terminology::load_terminology;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Load code dictionaries
//!     let terminology = load_terminology("terminology.toml")?;
//!
//!     // Build the patient record (normally produced by the record loader)
//!     # let record: caduceus::domain::PatientRecord = unimplemented!();
//!
//!     // One call per patient: the full bundle or a fatal error
//!     let mut exporter = Exporter::new(terminology);
//!     let bundle = exporter.export(&record, chrono::Utc::now())?;
//!
//!     println!("{}", bundle.to_json_string()?);
//!     Ok(())
//! }
//! ```
//!
//! ## Determinism
//!
//! Repeated exports of the same record are structurally identical:
//! reference resolution always targets the *earliest* matching entry, and
//! the identity generator is injectable so tests can pin the generated
//! identities ([`domain::SequenceGenerator`]).
//!
//! ```rust
//! use caduceus::core::export::Exporter;
//! use caduceus::domain::SequenceGenerator;
//! use caduceus::terminology::Terminology;
//!
//! let exporter = Exporter::with_id_generator(
//!     Terminology::new(),
//!     Box::new(SequenceGenerator::new("test")),
//! );
//! # let _ = exporter;
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::Result`]. Every fatal condition
//! (missing terminology entry, unsatisfiable composite, unrecognized unit)
//! aborts the run; no partial bundle is ever exposed:
//!
//! ```rust
//! use caduceus::domain::{CaduceusError, Result};
//!
//! fn example() -> Result<()> {
//!     Err(CaduceusError::UnrecognizedUnit("fortnights".to_string()))
//! }
//! ```
//!
//! ## Logging
//!
//! Caduceus emits structured events with the `tracing` crate; embedders can
//! install their own subscriber or call [`logging::init_logging`].

pub mod core;
pub mod domain;
pub mod fhir;
pub mod logging;
pub mod terminology;

// Re-export the run entry points at the crate root
pub use crate::core::export::{export_patient, Exporter};
pub use crate::core::{Bundle, Entry};
