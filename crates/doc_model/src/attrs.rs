//! Node attributes - dimension lists, markup elements, and the
//! extensible attribute registry used by table cells

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

/// Value type of host-supplied extra attributes
pub type AttrValue = serde_json::Value;

// =============================================================================
// Dimension Lists
// =============================================================================

/// Per-slot pixel dimensions of a spanning cell (`colwidth` / `rowheight`).
///
/// One entry per spanned grid column (or row). `None` means the slot has no
/// explicit size and takes its size from the rendered layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DimensionList(Vec<Option<f32>>);

impl DimensionList {
    /// A list of `len` unset entries
    pub fn unset(len: usize) -> Self {
        Self(vec![None; len])
    }

    /// A list where every entry is set
    pub fn from_values(values: &[f32]) -> Self {
        Self(values.iter().map(|&v| Some(v)).collect())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list has no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Explicit dimension at `index`, if any
    pub fn get(&self, index: usize) -> Option<f32> {
        self.0.get(index).copied().flatten()
    }

    /// Set the entry at `index`; out-of-range indices are ignored
    pub fn set(&mut self, index: usize, value: f32) {
        if let Some(slot) = self.0.get_mut(index) {
            *slot = Some(value);
        }
    }

    /// Explicit dimension of the trailing slot
    pub fn last(&self) -> Option<f32> {
        self.0.last().copied().flatten()
    }

    /// Grow with unset entries or truncate to `len`
    pub fn resized(mut self, len: usize) -> Self {
        self.0.resize(len, None);
        self
    }

    /// Iterate over the entries
    pub fn iter(&self) -> impl Iterator<Item = Option<f32>> + '_ {
        self.0.iter().copied()
    }

    /// Sum of the explicit entries and the number of unset ones
    pub fn explicit_total(&self) -> (f32, usize) {
        self.0.iter().fold((0.0, 0), |(sum, unset), entry| match entry {
            Some(v) => (sum + v, unset),
            None => (sum, unset + 1),
        })
    }

    /// Markup form: comma separated integers, `0` for unset entries
    pub fn to_markup(&self) -> String {
        self.0
            .iter()
            .map(|entry| entry.map(|v| v.round() as u32).unwrap_or(0).to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Parse the markup form; anything but a comma separated integer list is rejected
    pub fn parse_markup(value: &str) -> Option<Self> {
        static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
        let pattern = PATTERN.get_or_init(|| Regex::new(r"^\d+(,\d+)*$").ok()).as_ref()?;
        if !pattern.is_match(value) {
            return None;
        }
        let entries = value
            .split(',')
            .map(|part| part.parse::<u32>().ok().filter(|&v| v > 0).map(|v| v as f32))
            .collect();
        Some(Self(entries))
    }
}

// =============================================================================
// Markup Elements
// =============================================================================

/// Attribute map of a markup element
pub type MarkupAttributes = BTreeMap<String, String>;

/// A minimal markup element (`<td colspan="2">`) used for reading and writing
/// node attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkupElement {
    /// Tag name, lower case
    pub tag: String,
    /// Attribute name to raw string value
    pub attributes: MarkupAttributes,
}

impl MarkupElement {
    /// Create an element without attributes
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: MarkupAttributes::new(),
        }
    }

    /// Builder-style attribute setter
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Raw attribute value
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

// =============================================================================
// Extra Attribute Registry
// =============================================================================

/// Capability describing one host-supplied cell attribute.
///
/// The table code never interprets these values; it only asks the spec for
/// the default and delegates markup conversion to it.
pub trait AttributeSpec: Send + Sync + std::fmt::Debug {
    /// Value used when the attribute is missing
    fn default_value(&self) -> AttrValue;

    /// Read the attribute from a markup element, `None` when absent
    fn read_from_markup(&self, element: &MarkupElement) -> Option<AttrValue>;

    /// Write the attribute into an output attribute map
    fn write_to_markup(&self, value: &AttrValue, attributes: &mut MarkupAttributes);
}

/// Extra attribute backed by a single markup attribute holding its string form
#[derive(Debug, Clone)]
pub struct MarkupAttribute {
    markup_name: String,
    default: AttrValue,
}

impl MarkupAttribute {
    pub fn new(markup_name: impl Into<String>, default: AttrValue) -> Self {
        Self {
            markup_name: markup_name.into(),
            default,
        }
    }
}

impl AttributeSpec for MarkupAttribute {
    fn default_value(&self) -> AttrValue {
        self.default.clone()
    }

    fn read_from_markup(&self, element: &MarkupElement) -> Option<AttrValue> {
        element
            .attribute(&self.markup_name)
            .map(|raw| AttrValue::String(raw.to_string()))
    }

    fn write_to_markup(&self, value: &AttrValue, attributes: &mut MarkupAttributes) {
        match value {
            AttrValue::Null => {}
            AttrValue::String(s) => {
                attributes.insert(self.markup_name.clone(), s.clone());
            }
            other => {
                attributes.insert(self.markup_name.clone(), other.to_string());
            }
        }
    }
}

/// Extra attribute specs keyed by attribute name
#[derive(Debug, Clone, Default)]
pub struct AttributeRegistry {
    specs: BTreeMap<String, Arc<dyn AttributeSpec>>,
}

impl AttributeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) an attribute spec
    pub fn register(&mut self, name: impl Into<String>, spec: Arc<dyn AttributeSpec>) {
        self.specs.insert(name.into(), spec);
    }

    /// Builder-style registration
    pub fn with(mut self, name: impl Into<String>, spec: Arc<dyn AttributeSpec>) -> Self {
        self.register(name, spec);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn AttributeSpec>> {
        self.specs.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.specs.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Default values of every registered attribute
    pub fn defaults(&self) -> BTreeMap<String, AttrValue> {
        self.specs
            .iter()
            .map(|(name, spec)| (name.clone(), spec.default_value()))
            .collect()
    }

    /// Read every registered attribute from markup, falling back to defaults
    pub fn read_all(&self, element: &MarkupElement) -> BTreeMap<String, AttrValue> {
        self.specs
            .iter()
            .map(|(name, spec)| {
                let value = spec
                    .read_from_markup(element)
                    .unwrap_or_else(|| spec.default_value());
                (name.clone(), value)
            })
            .collect()
    }

    /// Write every registered attribute present in `values`
    pub fn write_all(&self, values: &BTreeMap<String, AttrValue>, attributes: &mut MarkupAttributes) {
        for (name, spec) in &self.specs {
            if let Some(value) = values.get(name) {
                spec.write_to_markup(value, attributes);
            }
        }
    }
}
