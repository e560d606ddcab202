//! Serde models for site and product configuration files.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::fieldspec::{Transform, TransformKind};
use crate::record::CANONICAL_FIELDS;
use crate::Result;

/// Site-level configuration: how to crawl one retail site and where its
/// product fields live in the page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub site: SiteSection,
    pub error_handling: ErrorHandling,
    pub collection_page: CollectionPage,
    /// Field name -> raw field spec string (selector, `A + B`, or
    /// `text*="Pattern"`). An empty string means "not configured".
    pub selectors: BTreeMap<String, String>,
    /// Field name -> value transform applied after extraction.
    pub transforms: BTreeMap<String, TransformSpec>,
}

/// Identity and pacing for one site.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    pub name: String,
    pub base_url: String,
    pub user_agent: String,
    /// Minimum seconds between consecutive requests (a floor, not a
    /// token bucket).
    pub rate_limit: f64,
    /// Request timeout in seconds.
    pub timeout: u64,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            name: String::new(),
            base_url: String::new(),
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36".to_string(),
            rate_limit: 1.0,
            timeout: 30,
        }
    }
}

/// Retry behavior for page fetches.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ErrorHandling {
    pub max_retries: u32,
    /// Base delay in seconds; attempt `n` waits `retry_delay * n`.
    pub retry_delay: u64,
    /// Skip a URL after exhausting retries instead of aborting the run.
    pub skip_on_error: bool,
}

impl Default for ErrorHandling {
    fn default() -> Self {
        Self { max_retries: 3, retry_delay: 2, skip_on_error: true }
    }
}

/// Listing-page link discovery overrides.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CollectionPage {
    /// Site-specific product link patterns; empty keeps the built-in set.
    pub link_patterns: Vec<String>,
}

/// A value transform as written in configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TransformSpec {
    pub pattern: String,
    #[serde(rename = "type", default)]
    pub kind: TransformKind,
}

impl TransformSpec {
    /// Compiles the configured pattern.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CorkscrewError::ConfigError`] on an invalid regex.
    pub fn compile(&self) -> Result<Transform> {
        Transform::new(&self.pattern, self.kind)
    }
}

/// Product-schema configuration: which fields the output carries.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductConfig {
    pub product_type: String,
    pub fields: Vec<FieldEntry>,
    /// Open-ended field names extracted by generic label matching when no
    /// selector covers them. Order is preserved; duplicates are the
    /// caller's responsibility.
    pub extra_fields: Vec<String>,
}

/// One field in the product schema.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldEntry {
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl ProductConfig {
    /// Ordered field names for output serialization.
    ///
    /// With an explicit `fields` list, the enabled names in config order;
    /// otherwise the canonical fields followed by the extra fields.
    pub fn enabled_field_names(&self) -> Vec<String> {
        if self.fields.is_empty() {
            return CANONICAL_FIELDS
                .iter()
                .map(|f| f.to_string())
                .chain(self.extra_fields.iter().cloned())
                .collect();
        }

        self.fields
            .iter()
            .filter(|f| f.enabled)
            .map(|f| f.name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITE_YAML: &str = r#"
site:
  name: Total Wine
  base_url: https://www.totalwine.com
  rate_limit: 1.5
  timeout: 20
error_handling:
  max_retries: 2
  retry_delay: 1
collection_page:
  link_patterns:
    - '/p/\d+'
selectors:
  title: h1.product-name
  price: span.price
  varietal: dt.varietal + dd
  abv: text*='ABV'
transforms:
  price:
    pattern: '\$(\d+\.\d{2})'
    type: float
  abv:
    pattern: '(\d+\.?\d*)%'
    type: float
"#;

    const PRODUCT_YAML: &str = r#"
product_type: wine
fields:
  - name: title
  - name: price
  - name: sku
    enabled: false
  - name: varietal
extra_fields:
  - region
  - vintage
"#;

    #[test]
    fn test_site_config_deserialize() {
        let config: SiteConfig = serde_yaml::from_str(SITE_YAML).unwrap();

        assert_eq!(config.site.name, "Total Wine");
        assert_eq!(config.site.rate_limit, 1.5);
        assert_eq!(config.site.timeout, 20);
        assert_eq!(config.error_handling.max_retries, 2);
        assert!(config.error_handling.skip_on_error);
        assert_eq!(config.collection_page.link_patterns, vec![r"/p/\d+"]);
        assert_eq!(config.selectors["title"], "h1.product-name");
        assert_eq!(config.transforms["price"].kind, TransformKind::Float);
    }

    #[test]
    fn test_site_config_defaults() {
        let config: SiteConfig = serde_yaml::from_str("{}").unwrap();

        assert_eq!(config.site.rate_limit, 1.0);
        assert_eq!(config.site.timeout, 30);
        assert_eq!(config.error_handling.max_retries, 3);
        assert!(config.selectors.is_empty());
        assert!(config.collection_page.link_patterns.is_empty());
    }

    #[test]
    fn test_transform_spec_compile() {
        let config: SiteConfig = serde_yaml::from_str(SITE_YAML).unwrap();
        let transform = config.transforms["price"].compile().unwrap();

        assert_eq!(transform.apply("$22.99"), crate::fieldspec::Value::Float(22.99));
    }

    #[test]
    fn test_product_config_deserialize() {
        let config: ProductConfig = serde_yaml::from_str(PRODUCT_YAML).unwrap();

        assert_eq!(config.product_type, "wine");
        assert_eq!(config.fields.len(), 4);
        assert_eq!(config.extra_fields, vec!["region", "vintage"]);
    }

    #[test]
    fn test_enabled_field_names_filters_disabled() {
        let config: ProductConfig = serde_yaml::from_str(PRODUCT_YAML).unwrap();
        assert_eq!(config.enabled_field_names(), vec!["title", "price", "varietal"]);
    }

    #[test]
    fn test_enabled_field_names_fallback() {
        let config = ProductConfig { extra_fields: vec!["region".to_string()], ..Default::default() };
        let names = config.enabled_field_names();

        assert_eq!(names.first().map(String::as_str), Some("title"));
        assert_eq!(names.last().map(String::as_str), Some("region"));
        assert_eq!(names.len(), CANONICAL_FIELDS.len() + 1);
    }
}
