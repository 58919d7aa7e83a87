//! The output bundle
//!
//! An append-only, order-preserving sequence of entries, owned exclusively
//! by one export run. Appending is the only way in; the sole removal
//! operation takes entries from the tail, which composite synthesis uses to
//! fold freshly appended observations into one panel. Positions of
//! surviving entries never change, so a reference to an earlier entry stays
//! valid for the rest of the run.

use crate::domain::errors::CaduceusError;
use crate::domain::ids::ResourceId;
use crate::domain::result::Result;
use crate::fhir::{Reference, Resource};
use serde::Serialize;

/// One (identity, resource) pair inside a bundle
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(skip_serializing)]
    id: ResourceId,
    full_url: String,
    pub resource: Resource,
}

impl Entry {
    /// Creates an entry; the reference string is derived from the identity
    pub fn new(id: ResourceId, resource: Resource) -> Self {
        let full_url = id.as_urn();
        Self {
            id,
            full_url,
            resource,
        }
    }

    /// The generated identity
    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    /// The resolvable reference string (`urn:uuid:<id>`)
    pub fn full_url(&self) -> &str {
        &self.full_url
    }

    /// A wire reference pointing at this entry
    pub fn as_reference(&self) -> Reference {
        Reference::to(self.full_url.clone())
    }
}

/// The ordered output document of one export run
#[derive(Debug, Clone, Serialize)]
pub struct Bundle {
    #[serde(rename = "resourceType")]
    resource_type: &'static str,
    #[serde(rename = "type")]
    bundle_type: &'static str,
    entry: Vec<Entry>,
}

impl Bundle {
    /// Creates an empty collection bundle
    pub fn new() -> Self {
        Self {
            resource_type: "Bundle",
            bundle_type: "collection",
            entry: Vec::new(),
        }
    }

    /// Number of entries currently in the bundle
    pub fn len(&self) -> usize {
        self.entry.len()
    }

    /// True when no entries have been appended (or all were consumed)
    pub fn is_empty(&self) -> bool {
        self.entry.is_empty()
    }

    /// All entries in append order
    pub fn entries(&self) -> &[Entry] {
        &self.entry
    }

    /// Appends an entry to the tail
    pub fn append(&mut self, entry: Entry) {
        self.entry.push(entry);
    }

    /// The `n` most recently appended entries, oldest first
    ///
    /// # Errors
    ///
    /// Fatal when fewer than `n` entries exist.
    pub fn last_entries(&self, n: usize) -> Result<&[Entry]> {
        if self.entry.len() < n {
            return Err(CaduceusError::InsufficientEntries {
                requested: n,
                available: self.entry.len(),
            });
        }
        Ok(&self.entry[self.entry.len() - n..])
    }

    /// Atomically removes and returns the `k` most recently appended
    /// entries, oldest first
    ///
    /// Only composite synthesis consumes entries; everything else treats the
    /// bundle as append-only.
    ///
    /// # Errors
    ///
    /// Fatal when fewer than `k` entries exist; the bundle is unchanged.
    pub fn consume_last_entries(&mut self, k: usize) -> Result<Vec<Entry>> {
        if self.entry.len() < k {
            return Err(CaduceusError::InsufficientEntries {
                requested: k,
                available: self.entry.len(),
            });
        }
        Ok(self.entry.split_off(self.entry.len() - k))
    }

    /// Serializes the bundle into the interchange JSON document
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Serializes the bundle into a pretty-printed JSON string
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for Bundle {
    fn default() -> Self {
        Self::new()
    }
}
