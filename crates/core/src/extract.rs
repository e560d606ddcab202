//! The field extractor.
//!
//! `extract` is a total function from (document, spec) to string: an empty
//! or absent spec, a selector that matches nothing, a malformed selector,
//! or a missing sibling all yield `""`. A miss is the normal case for
//! sparse pages, never an error. Selector failures are logged at debug
//! level only.

use tracing::debug;
use url::Url;

use crate::fieldspec::{FieldSpec, Transform, Value};
use crate::parse::Document;

/// Extracts one field's value as a string.
///
/// # Example
///
/// ```rust
/// use corkscrew_core::extract::extract;
/// use corkscrew_core::fieldspec::FieldSpec;
/// use corkscrew_core::parse::Document;
///
/// let doc = Document::parse("<html><body><h1>Chianti Classico</h1></body></html>");
/// let spec = FieldSpec::parse("h1").unwrap();
/// assert_eq!(extract(&doc, &spec), "Chianti Classico");
/// ```
pub fn extract(doc: &Document, spec: &FieldSpec) -> String {
    match spec {
        FieldSpec::Selector(selector) => {
            if selector.is_empty() {
                return String::new();
            }
            match doc.select(selector) {
                Ok(elements) => elements.first().map(|el| el.trimmed_text()).unwrap_or_default(),
                Err(e) => {
                    debug!(selector = %selector, error = %e, "selector failed to parse");
                    String::new()
                }
            }
        }
        FieldSpec::Sibling(selector) => match doc.select(selector) {
            Ok(elements) => elements
                .first()
                .and_then(|el| el.next_sibling_element())
                .map(|el| el.trimmed_text())
                .unwrap_or_default(),
            Err(e) => {
                debug!(selector = %selector, error = %e, "sibling selector failed to parse");
                String::new()
            }
        },
        FieldSpec::TextPattern(pattern) => doc.find_text_parent(pattern).unwrap_or_default(),
    }
}

/// Extracts a field from a raw configuration string.
///
/// An empty spec string yields an empty value without touching the
/// document; an unparsable spec degrades to an empty value.
pub fn extract_raw(doc: &Document, raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    match FieldSpec::parse(raw) {
        Ok(spec) => extract(doc, &spec),
        Err(e) => {
            debug!(spec = raw, error = %e, "field spec failed to parse");
            String::new()
        }
    }
}

/// Extracts a field and applies its transform, when one is configured.
///
/// Without a transform the extracted string is returned as a text value.
pub fn extract_value(doc: &Document, spec: &FieldSpec, transform: Option<&Transform>) -> Value {
    let text = extract(doc, spec);

    match transform {
        Some(t) => t.apply(&text),
        None => Value::Text(text),
    }
}

/// Extracts an image URL from the element a spec locates.
///
/// Reads `src`, falling back to `data-src` for lazy-loaded images, and
/// resolves the result against the page URL. Misses yield `""`.
pub fn extract_image(doc: &Document, spec: &FieldSpec, base: Option<&Url>) -> String {
    let selector = match spec {
        FieldSpec::Selector(s) | FieldSpec::Sibling(s) => s,
        FieldSpec::TextPattern(_) => return String::new(),
    };
    if selector.is_empty() {
        return String::new();
    }

    match doc.select(selector) {
        Ok(elements) => elements
            .first()
            .and_then(|el| el.attr("src").or_else(|| el.attr("data-src")))
            .map(|src| absolutize(src, base))
            .unwrap_or_default(),
        Err(e) => {
            debug!(selector = %selector, error = %e, "image selector failed to parse");
            String::new()
        }
    }
}

/// Resolves a possibly-relative URL against a base, returning the input
/// unchanged when resolution is not possible.
pub(crate) fn absolutize(href: &str, base: Option<&Url>) -> String {
    match base {
        Some(base) => base.join(href).map(|u| u.to_string()).unwrap_or_else(|_| href.to_string()),
        None => href.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fieldspec::TransformKind;

    const PRODUCT_HTML: &str = r#"
        <!DOCTYPE html>
        <html>
        <body>
            <h1 class="product-name">Renieri Invetro Super Tuscan</h1>
            <span class="price">$24.99</span>
            <dl>
                <dt class="spec-label">Varietal</dt>
                <dd>Sangiovese</dd>
            </dl>
            <div class="abv-row"><span>ABV 14.5%</span></div>
            <img class="hero" data-src="/images/renieri.jpg" alt="bottle">
        </body>
        </html>
    "#;

    #[test]
    fn test_extract_selector() {
        let doc = Document::parse(PRODUCT_HTML);
        let spec = FieldSpec::parse("h1.product-name").unwrap();
        assert_eq!(extract(&doc, &spec), "Renieri Invetro Super Tuscan");
    }

    #[test]
    fn test_extract_selector_no_match() {
        let doc = Document::parse(PRODUCT_HTML);
        let spec = FieldSpec::parse("h2.subtitle").unwrap();
        assert_eq!(extract(&doc, &spec), "");
    }

    #[test]
    fn test_extract_malformed_selector_degrades() {
        let doc = Document::parse(PRODUCT_HTML);
        let spec = FieldSpec::Selector("[[not-a-selector".to_string());
        assert_eq!(extract(&doc, &spec), "");
    }

    #[test]
    fn test_extract_sibling() {
        let doc = Document::parse(PRODUCT_HTML);
        let spec = FieldSpec::parse("dt.spec-label + dd").unwrap();
        assert_eq!(extract(&doc, &spec), "Sangiovese");
    }

    #[test]
    fn test_extract_sibling_absent() {
        let doc = Document::parse(PRODUCT_HTML);
        let spec = FieldSpec::parse("img.hero + span").unwrap();
        assert_eq!(extract(&doc, &spec), "");
    }

    #[test]
    fn test_extract_text_pattern() {
        let doc = Document::parse(PRODUCT_HTML);
        let spec = FieldSpec::parse("text*='ABV'").unwrap();
        assert_eq!(extract(&doc, &spec), "ABV 14.5%");
    }

    #[test]
    fn test_extract_raw_empty_spec() {
        let doc = Document::parse(PRODUCT_HTML);
        assert_eq!(extract_raw(&doc, ""), "");
        assert_eq!(extract_raw(&doc, "   "), "");
    }

    #[test]
    fn test_extract_is_idempotent() {
        let doc = Document::parse(PRODUCT_HTML);
        let spec = FieldSpec::parse("span.price").unwrap();

        let first = extract(&doc, &spec);
        let second = extract(&doc, &spec);
        assert_eq!(first, "$24.99");
        assert_eq!(first, second);
    }

    #[test]
    fn test_extract_value_with_transform() {
        let doc = Document::parse(PRODUCT_HTML);
        let spec = FieldSpec::parse("span.price").unwrap();
        let transform = Transform::new(r"\$(\d+\.\d{2})", TransformKind::Float).unwrap();

        assert_eq!(extract_value(&doc, &spec, Some(&transform)), Value::Float(24.99));
    }

    #[test]
    fn test_extract_value_without_transform() {
        let doc = Document::parse(PRODUCT_HTML);
        let spec = FieldSpec::parse("span.price").unwrap();

        assert_eq!(extract_value(&doc, &spec, None), Value::Text("$24.99".to_string()));
    }

    #[test]
    fn test_extract_value_numeric_miss_is_zero() {
        let doc = Document::parse(PRODUCT_HTML);
        let spec = FieldSpec::parse("h1.product-name").unwrap();
        let transform = Transform::new(r"\$(\d+\.\d{2})", TransformKind::Float).unwrap();

        assert_eq!(extract_value(&doc, &spec, Some(&transform)), Value::Float(0.0));
    }

    #[test]
    fn test_extract_image_data_src() {
        let doc = Document::parse_with_url(PRODUCT_HTML, "https://shop.example.com/wine/p/113710750").unwrap();
        let spec = FieldSpec::parse("img.hero").unwrap();
        let base = doc.base_url().cloned();

        assert_eq!(
            extract_image(&doc, &spec, base.as_ref()),
            "https://shop.example.com/images/renieri.jpg"
        );
    }

    #[test]
    fn test_extract_image_no_base() {
        let doc = Document::parse(PRODUCT_HTML);
        let spec = FieldSpec::parse("img.hero").unwrap();

        assert_eq!(extract_image(&doc, &spec, None), "/images/renieri.jpg");
    }

    #[test]
    fn test_extract_image_miss() {
        let doc = Document::parse(PRODUCT_HTML);
        let spec = FieldSpec::parse("img.gallery").unwrap();
        assert_eq!(extract_image(&doc, &spec, None), "");
    }

    #[test]
    fn test_absolutize() {
        let base = Url::parse("https://shop.example.com/wine/p/1").unwrap();
        assert_eq!(absolutize("/img/a.jpg", Some(&base)), "https://shop.example.com/img/a.jpg");
        assert_eq!(
            absolutize("https://cdn.example.com/a.jpg", Some(&base)),
            "https://cdn.example.com/a.jpg"
        );
        assert_eq!(absolutize("/img/a.jpg", None), "/img/a.jpg");
    }
}
