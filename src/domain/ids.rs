//! Resource identity types and generation
//!
//! This module provides the newtype wrapper for generated resource
//! identities and the injectable generator that mints them. Injecting the
//! generator lets tests supply deterministic sequences and verify reference
//! wiring without depending on UUID randomness.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Generated identity of one bundle entry
///
/// Every synthesized resource receives a fresh `ResourceId`; its URN form
/// (`urn:uuid:<id>`) is the entry's `fullUrl` and the target of every
/// cross-reference in the bundle.
///
/// # Examples
///
/// ```
/// use caduceus::domain::ids::ResourceId;
///
/// let id = ResourceId::new("7d44b88c-4199-4bad-97dc-d78268e01398").unwrap();
/// assert_eq!(id.as_urn(), "urn:uuid:7d44b88c-4199-4bad-97dc-d78268e01398");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId(String);

impl ResourceId {
    /// Creates a new ResourceId from a string
    ///
    /// # Errors
    ///
    /// Returns an error if the identity is empty or contains whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Resource ID cannot be empty".to_string());
        }
        if id.contains(char::is_whitespace) {
            return Err(format!("Resource ID cannot contain whitespace: '{id}'"));
        }
        Ok(Self(id))
    }

    /// Returns the identity as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the URN form used as an entry's `fullUrl`
    pub fn as_urn(&self) -> String {
        format!("urn:uuid:{}", self.0)
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResourceId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ResourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Mints one fresh identity per synthesized resource
///
/// The exporter calls this once per appended entry. Production code uses
/// [`UuidGenerator`]; tests use [`SequenceGenerator`] for predictable,
/// assertable identities.
pub trait IdGenerator {
    /// Returns the next unique identity
    fn next_id(&mut self) -> ResourceId;
}

/// Random UUID v4 identity generator (the production default)
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl UuidGenerator {
    /// Creates a new UuidGenerator
    pub fn new() -> Self {
        Self
    }
}

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> ResourceId {
        ResourceId(Uuid::new_v4().to_string())
    }
}

/// Deterministic identity generator for tests
///
/// Produces `<prefix>-1`, `<prefix>-2`, ... in call order.
///
/// # Examples
///
/// ```
/// use caduceus::domain::ids::{IdGenerator, SequenceGenerator};
///
/// let mut ids = SequenceGenerator::new("res");
/// assert_eq!(ids.next_id().as_str(), "res-1");
/// assert_eq!(ids.next_id().as_str(), "res-2");
/// ```
#[derive(Debug, Clone)]
pub struct SequenceGenerator {
    prefix: String,
    counter: u64,
}

impl SequenceGenerator {
    /// Creates a new SequenceGenerator with the given prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: 0,
        }
    }
}

impl IdGenerator for SequenceGenerator {
    fn next_id(&mut self) -> ResourceId {
        self.counter += 1;
        ResourceId(format!("{}-{}", self.prefix, self.counter))
    }
}
