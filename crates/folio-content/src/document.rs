//! Wire format of the content document.
//!
//! Section fields are kept as loose JSON values so that validation can
//! report every missing or mistyped field at once instead of stopping at the
//! first one.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The content document as it appears on the wire.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct RawDocument {
    /// Ordered page sections
    #[serde(default)]
    pub sections: Option<Vec<RawSection>>,

    /// Icon sets for the skills lists
    #[serde(default)]
    pub icons: Option<IconSet>,

    /// External links keyed by name, in document order
    #[serde(default)]
    pub ext: Option<IndexMap<String, ExternalLink>>,
}

impl RawDocument {
    /// Parse a document from JSON text.
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }
}

/// One section record before validation.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct RawSection {
    /// Unique slug used for the section's id and anchor
    #[serde(default)]
    pub section: Option<Value>,

    /// Display title
    #[serde(default)]
    pub title: Option<Value>,

    /// Type tag: `pg`, `ls` or `rs`
    #[serde(default, rename = "type")]
    pub kind: Option<Value>,

    /// Body: markup for paragraphs, entries for lists
    #[serde(default)]
    pub body: Option<Value>,

    /// Downloadable file for resume sections
    #[serde(default)]
    pub file: Option<Value>,
}

/// Icon class tokens for the language and tool lists.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct IconSet {
    #[serde(default)]
    pub languages: Vec<String>,

    #[serde(default)]
    pub tools: Vec<String>,
}

/// An external profile link.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ExternalLink {
    /// Icon class tokens
    pub icon: String,

    /// Target URL
    pub link: String,
}

/// One entry of a list section. Every part is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ListEntry {
    #[serde(default)]
    pub header: Option<String>,

    #[serde(default)]
    pub subheader: Option<String>,

    #[serde(default)]
    pub subsubheader: Option<String>,

    /// Trusted markup body
    #[serde(default)]
    pub main: Option<String>,
}
