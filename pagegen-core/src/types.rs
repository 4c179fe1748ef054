//! Domain types for a page build.
//!
//! Entity IDs and attribute names are opaque strings wrapped in newtypes so
//! the two can never be swapped at a call site. Both implement
//! `Borrow<str>`, which lets maps keyed by them be queried with a plain `&str`.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Uniquely names one page-like unit of output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Output filename for this entity: `<id>.<extension>`.
    pub fn output_filename(&self, extension: &str) -> String {
        format!("{}.{}", self.0, extension)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Names one substitutable field, e.g. `title`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeName(pub String);

impl AttributeName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The literal placeholder token for this attribute: `{name}`.
    pub fn placeholder(&self) -> String {
        format!("{{{}}}", self.0)
    }
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for AttributeName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AttributeName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl Borrow<str> for AttributeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Attribute name -> raw text for a single entity.
///
/// Attributes whose content could not be loaded are absent, never present
/// with an empty value.
pub type AttributeMap = HashMap<AttributeName, String>;

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

/// The shared page template. Immutable once loaded; clones share one buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template(Arc<str>);

impl Template {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Template {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Template {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// How placeholders are replaced when more than one attribute is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubstitutionMode {
    /// One left-to-right scan that recognises any known `{name}` token.
    /// Inserted values are never re-scanned, so attribute order is irrelevant.
    #[default]
    Simultaneous,
    /// One full pass per attribute, applied in attribute-name order.
    Sequential,
}

impl fmt::Display for SubstitutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubstitutionMode::Simultaneous => write!(f, "simultaneous"),
            SubstitutionMode::Sequential => write!(f, "sequential"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
