//! Product URL classification and discovery.
//!
//! Listing pages link to many things; only some links are product detail
//! pages. [`UrlPatterns`] holds the path shapes that identify them, plus
//! an ordered list of capturing patterns that pull a SKU out of a product
//! URL. The pattern set is plain data passed by value — site configs can
//! supply their own classification set.

use std::collections::BTreeSet;

use regex::Regex;
use url::Url;

use crate::parse::Document;
use crate::{CorkscrewError, Result};

/// Default path shapes that mark a URL as a product detail page.
const PRODUCT_PATH_PATTERNS: &[&str] = &[
    r"/p/\d+",
    r"/dp/[A-Z0-9]+",
    r"/products/[\w-]+",
    r"/item/\d+",
    r"/shop/[\w-]+/[\w-]+/[\w-]+-\d+",
];

/// Ordered capturing patterns for pulling a SKU out of a product URL.
/// First match wins.
const SKU_CAPTURE_PATTERNS: &[&str] = &[
    r"/p/([^/?]+)",
    r"/dp/([^/?]+)",
    r"/products/[\w-]+-(\d+)",
    r"/item/(\d+)",
];

/// The pattern set used to classify links and extract SKUs.
#[derive(Debug, Clone)]
pub struct UrlPatterns {
    classify: Vec<Regex>,
    sku: Vec<Regex>,
}

impl Default for UrlPatterns {
    fn default() -> Self {
        // The built-in literals are known-good; compilation cannot fail.
        Self {
            classify: PRODUCT_PATH_PATTERNS.iter().map(|p| Regex::new(p).unwrap()).collect(),
            sku: SKU_CAPTURE_PATTERNS.iter().map(|p| Regex::new(p).unwrap()).collect(),
        }
    }
}

impl UrlPatterns {
    /// Builds a pattern set with a site-specific classification list,
    /// keeping the default SKU capture patterns.
    ///
    /// # Errors
    ///
    /// Returns [`CorkscrewError::ConfigError`] on an invalid pattern.
    pub fn with_classify_patterns(patterns: &[String]) -> Result<Self> {
        let classify = patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| CorkscrewError::ConfigError(format!("invalid link pattern '{}': {}", p, e)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { classify, ..Self::default() })
    }

    /// True iff the URL's path matches any classification pattern.
    pub fn is_product_url(&self, url: &str) -> bool {
        let path = path_of(url);
        self.classify.iter().any(|p| p.is_match(&path))
    }

    /// Pulls a SKU out of a product URL.
    ///
    /// Patterns are tried in order; the first capture group of the first
    /// matching pattern wins. No match yields `""`.
    pub fn extract_sku_from_url(&self, url: &str) -> String {
        for pattern in &self.sku {
            if let Some(caps) = pattern.captures(url)
                && let Some(sku) = caps.get(1)
            {
                return sku.as_str().to_string();
            }
        }

        String::new()
    }
}

/// The path component of a URL; relative links are already paths.
fn path_of(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
    }
}

/// Collects product detail links from a listing page.
///
/// Every `a[href]` is resolved against the page's base URL, stripped of
/// query and fragment, and classified; accepted URLs are deduplicated
/// into a sorted set. The stripped absolute URL is the dedup key, so
/// `/p/123` and `/p/123?ref=abc` collapse into one entry.
pub fn find_product_links(doc: &Document, base: &Url, patterns: &UrlPatterns) -> BTreeSet<String> {
    let mut links = BTreeSet::new();

    let anchors = match doc.select("a[href]") {
        Ok(anchors) => anchors,
        Err(_) => return links,
    };

    for anchor in anchors {
        let Some(href) = anchor.attr("href") else { continue };

        let Ok(mut resolved) = base.join(href) else { continue };
        resolved.set_query(None);
        resolved.set_fragment(None);

        if patterns.is_product_url(resolved.as_str()) {
            links.insert(resolved.to_string());
        }
    }

    links
}
