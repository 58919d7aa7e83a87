//! Shared FHIR wire data types
//!
//! Strict serde models for the general-purpose data types the emitted
//! resources are built from. Field names serialize camelCase; absent
//! optionals and empty lists are omitted from the wire document.

use serde::{Deserialize, Serialize};

/// A reference to a code defined by a terminology system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Coding {
    /// Creates a coding with a system and code
    pub fn new(system: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            system: Some(system.into()),
            code: code.into(),
            display: None,
        }
    }

    /// Creates a bare code with no system
    pub fn code_only(code: impl Into<String>) -> Self {
        Self {
            system: None,
            code: code.into(),
            display: None,
        }
    }

    /// Sets the display text
    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }
}

/// A concept, potentially coded in several systems
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeableConcept {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coding: Vec<Coding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl CodeableConcept {
    /// Wraps a single coding
    pub fn from_coding(coding: Coding) -> Self {
        Self {
            coding: vec![coding],
            text: None,
        }
    }

    /// Sets the plain-text rendering
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Code of the first (primary) coding
    pub fn primary_code(&self) -> Option<&str> {
        self.coding.first().map(|c| c.code.as_str())
    }

    /// Display of the first (primary) coding
    pub fn primary_display(&self) -> Option<&str> {
        self.coding.first().and_then(|c| c.display.as_deref())
    }
}

/// A measured amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quantity {
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Quantity {
    /// Creates a bare quantity
    pub fn new(value: f64) -> Self {
        Self {
            value,
            unit: None,
            system: None,
            code: None,
        }
    }

    /// Creates a UCUM-coded quantity where the unit doubles as the code
    pub fn ucum(value: f64, unit: impl Into<String>) -> Self {
        let unit = unit.into();
        Self {
            value,
            code: Some(unit.clone()),
            system: Some(super::systems::UCUM.to_string()),
            unit: Some(unit),
        }
    }

    /// Sets the human-readable unit without a coded system
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

/// A reference from one resource to another, or a display-only actor
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Reference {
    /// References an entry by its `fullUrl`
    pub fn to(url: impl Into<String>) -> Self {
        Self {
            reference: Some(url.into()),
            display: None,
        }
    }

    /// A display-only actor with no resolvable target
    pub fn display_only(display: impl Into<String>) -> Self {
        Self {
            reference: None,
            display: Some(display.into()),
        }
    }

    /// Sets the display text
    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }
}

/// A time range with wire-formatted endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub start: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

impl Period {
    /// Creates an open-ended period
    pub fn starting(start: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: None,
        }
    }

    /// Closes the period
    pub fn with_end(mut self, end: impl Into<String>) -> Self {
        self.end = Some(end.into());
        self
    }
}

/// An identifier assigned by some system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identifier {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<CodeableConcept>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub value: String,
}

impl Identifier {
    /// Creates an identifier within a system
    pub fn new(system: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: None,
            system: Some(system.into()),
            value: value.into(),
        }
    }

    /// Tags the identifier with a type coding
    pub fn with_kind(mut self, kind: CodeableConcept) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// A human name with use context
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanName {
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub name_use: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub given: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prefix: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suffix: Vec<String>,
}

/// A contact detail (phone, email)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPoint {
    pub system: String,
    pub value: String,
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub contact_use: Option<String>,
}

/// A postal address on the wire
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub line: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
}

/// An extension carrying exactly one value (or nested extensions)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extension {
    pub url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_codeable_concept: Option<CodeableConcept>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_boolean: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_decimal: Option<f64>,
}

impl Extension {
    fn bare(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// An extension holding a codeable concept
    pub fn codeable_concept(url: impl Into<String>, value: CodeableConcept) -> Self {
        Self {
            value_codeable_concept: Some(value),
            ..Self::bare(url)
        }
    }

    /// An extension holding an address
    pub fn address(url: impl Into<String>, value: Address) -> Self {
        Self {
            value_address: Some(value),
            ..Self::bare(url)
        }
    }

    /// An extension holding a string
    pub fn string(url: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            value_string: Some(value.into()),
            ..Self::bare(url)
        }
    }

    /// An extension holding a code
    pub fn code(url: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            value_code: Some(value.into()),
            ..Self::bare(url)
        }
    }

    /// An extension holding a boolean
    pub fn boolean(url: impl Into<String>, value: bool) -> Self {
        Self {
            value_boolean: Some(value),
            ..Self::bare(url)
        }
    }

    /// An extension holding a decimal
    pub fn decimal(url: impl Into<String>, value: f64) -> Self {
        Self {
            value_decimal: Some(value),
            ..Self::bare(url)
        }
    }

    /// A grouping extension holding nested extensions
    pub fn nested(url: impl Into<String>, children: Vec<Extension>) -> Self {
        Self {
            extension: children,
            ..Self::bare(url)
        }
    }
}

/// Human-readable narrative attached to a resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Narrative {
    pub status: String,
    pub div: String,
}
