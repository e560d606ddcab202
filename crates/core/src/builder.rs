//! One-pass product record assembly.
//!
//! The [`RecordBuilder`] decides, per field, between the two extraction
//! strategies: a configured [`FieldSpec`] when the site config has one,
//! heuristic auto-detection otherwise. All canonical fields are always
//! computed, then every configured domain field, then the extra-field
//! list. Building has no side effects beyond the returned record; the
//! empty-title validity gate is the caller's to enforce.

use std::collections::BTreeMap;

use url::Url;

use crate::autodetect;
use crate::config::{ProductConfig, SiteConfig};
use crate::extract::{extract_image, extract_value};
use crate::fieldspec::{FieldSpec, Transform, Value};
use crate::parse::Document;
use crate::record::{CANONICAL_FIELDS, ProductRecord};
use crate::urls::UrlPatterns;
use crate::Result;

#[derive(Debug, Clone)]
struct CompiledField {
    spec: FieldSpec,
    transform: Option<Transform>,
}

/// Builds [`ProductRecord`]s from parsed pages.
///
/// All field specs and transforms are compiled once at construction;
/// configuration errors surface here, never during extraction.
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    specs: BTreeMap<String, CompiledField>,
    extra_fields: Vec<String>,
    url_patterns: UrlPatterns,
}

impl RecordBuilder {
    /// A zero-configuration builder: every field auto-detected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles a builder from site and product configuration.
    ///
    /// The `name` selector key is accepted as an alias for `title`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CorkscrewError::ConfigError`] for an invalid
    /// text pattern, transform regex, or link pattern.
    pub fn from_config(site: &SiteConfig, product: &ProductConfig) -> Result<Self> {
        let mut specs = BTreeMap::new();

        for (field, raw) in &site.selectors {
            if raw.trim().is_empty() {
                continue;
            }

            let name = if field == "name" { "title".to_string() } else { field.clone() };
            let spec = FieldSpec::parse(raw)?;
            let transform = site.transforms.get(field).map(|t| t.compile()).transpose()?;
            specs.insert(name, CompiledField { spec, transform });
        }

        let url_patterns = if site.collection_page.link_patterns.is_empty() {
            UrlPatterns::default()
        } else {
            UrlPatterns::with_classify_patterns(&site.collection_page.link_patterns)?
        };

        Ok(Self { specs, extra_fields: product.extra_fields.clone(), url_patterns })
    }

    /// The URL pattern set in effect for this site.
    pub fn url_patterns(&self) -> &UrlPatterns {
        &self.url_patterns
    }

    /// Extracts one record from a parsed page.
    ///
    /// Every canonical field is computed (configured spec if present,
    /// auto-detection otherwise), then every configured domain field,
    /// then each extra field in order via generic label matching.
    pub fn build(&self, doc: &Document, url: &str) -> ProductRecord {
        let base = doc.base_url().cloned().or_else(|| Url::parse(url).ok());
        let mut record = ProductRecord::new(url);

        for field in CANONICAL_FIELDS {
            let value = match self.specs.get(*field) {
                Some(compiled) => self.configured(doc, field, compiled, base.as_ref()),
                None => Value::Text(self.autodetect(doc, url, field, base.as_ref())),
            };
            record.set(*field, value);
        }

        for (field, compiled) in &self.specs {
            if CANONICAL_FIELDS.contains(&field.as_str()) {
                continue;
            }
            record.set(field.clone(), self.configured(doc, field, compiled, base.as_ref()));
        }

        for field in &self.extra_fields {
            if self.specs.contains_key(field) {
                continue;
            }
            record.set(field.clone(), Value::Text(autodetect::auto_field(doc, field)));
        }

        record
    }

    fn configured(&self, doc: &Document, field: &str, compiled: &CompiledField, base: Option<&Url>) -> Value {
        if field == "image_url" {
            return Value::Text(extract_image(doc, &compiled.spec, base));
        }

        extract_value(doc, &compiled.spec, compiled.transform.as_ref())
    }

    fn autodetect(&self, doc: &Document, url: &str, field: &str, base: Option<&Url>) -> String {
        match field {
            "title" => autodetect::auto_title(doc),
            "price" => autodetect::auto_price(doc),
            "msrp" => autodetect::auto_compare_price(doc),
            "sku" => autodetect::auto_sku(doc, url, &self.url_patterns),
            "brand" => autodetect::auto_brand(doc),
            "image_url" => autodetect::auto_image(doc, base),
            "description" => autodetect::auto_description(doc),
            "collection" => autodetect::auto_collection(doc, url),
            _ => autodetect::auto_field(doc, field),
        }
    }
}
