//! The flat product record.
//!
//! A [`ProductRecord`] maps field names to extracted values. Absence of a
//! field reads as the empty string — never a null, never a panic — so a
//! sparse page produces empty CSV cells rather than failures. The sole
//! validity gate on a record is a non-empty title; callers discard
//! invalid records before persisting, the record itself only reports.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::fieldspec::Value;

/// The fixed set of always-attempted product attributes.
///
/// Domain-specific fields (varietal, region, ABV, ...) arrive through
/// site configuration or the extra-field list; these eight are computed
/// for every page.
pub const CANONICAL_FIELDS: &[&str] = &[
    "title",
    "price",
    "msrp",
    "sku",
    "brand",
    "image_url",
    "description",
    "collection",
];

/// One extracted product: a flat field-name-to-value mapping.
///
/// Records are built fresh per page in a single pass and never updated
/// incrementally. The source URL is stored under the `url` field.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ProductRecord {
    fields: BTreeMap<String, Value>,
}

impl ProductRecord {
    /// Creates an empty record for a page URL.
    pub fn new(url: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert("url".to_string(), Value::Text(url.into()));
        Self { fields }
    }

    /// The page URL this record was extracted from.
    pub fn url(&self) -> String {
        self.render("url")
    }

    /// Sets a field value, replacing any previous value.
    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.fields.insert(field.into(), value);
    }

    /// Gets a field value if present.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// String projection of a field; absent fields render as `""`.
    pub fn render(&self, field: &str) -> String {
        self.fields.get(field).map(Value::render).unwrap_or_default()
    }

    /// The record's title.
    pub fn title(&self) -> String {
        self.render("title")
    }

    /// True iff the title is non-empty — the sole validity gate.
    pub fn is_valid(&self) -> bool {
        !self.title().is_empty()
    }

    /// Iterates field names in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of fields, including `url`.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no fields are present at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
