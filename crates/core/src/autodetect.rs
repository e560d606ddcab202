//! Heuristic auto-detection for unconfigured fields.
//!
//! When a site has no field spec for a canonical field, these fallbacks
//! take over: a fixed battery of page-shape heuristics per field, each
//! chain tried in order until one yields a non-empty value, with `""` as
//! the final answer. Everything here is pure computation over an
//! already-parsed document — no network, no filesystem.

use regex::Regex;
use url::Url;

use crate::extract::absolutize;
use crate::normalize::title_case;
use crate::parse::Document;
use crate::urls::UrlPatterns;

const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".webp"];

/// Title: first `<h1>` text, falling back to the `og:title` meta tag.
pub fn auto_title(doc: &Document) -> String {
    if let Some(h1) = doc.select_first("h1") {
        let text = h1.trimmed_text();
        if !text.is_empty() {
            return text;
        }
    }

    doc.meta_content("og:title").map(|t| t.trim().to_string()).unwrap_or_default()
}

/// Current price: first `$NN.NN` amount anywhere in the page text.
pub fn auto_price(doc: &Document) -> String {
    let price = Regex::new(r"\$(\d+\.\d{2})").unwrap();
    price
        .captures(&doc.text_content())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Compare-at/MSRP price: a `$NN.NN` amount adjacent to a strike-through
/// keyword, tried in both keyword-before-price and price-before-keyword
/// order.
pub fn auto_compare_price(doc: &Document) -> String {
    let text = doc.text_content();
    let patterns = [
        r"(?i)(?:was|originally|list price|msrp|previously|compare at).*?\$(\d+\.\d{2})",
        r"(?i)\$(\d+\.\d{2}).*?(?:was|originally|list)",
    ];

    for pattern in patterns {
        let re = Regex::new(pattern).unwrap();
        if let Some(caps) = re.captures(&text)
            && let Some(price) = caps.get(1)
        {
            return price.as_str().to_string();
        }
    }

    String::new()
}

/// SKU: the URL path shapes first, then a labelled `SKU:` pattern in the
/// page text.
pub fn auto_sku(doc: &Document, url: &str, patterns: &UrlPatterns) -> String {
    let from_url = patterns.extract_sku_from_url(url);
    if !from_url.is_empty() {
        return from_url;
    }

    let labelled = Regex::new(r"(?i)SKU[:\s]+([A-Z0-9-]+)").unwrap();
    labelled
        .captures(&doc.text_content())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Brand: `og:brand` meta, a `/brand/` link, or a labelled `Brand:`
/// pattern in the page text.
pub fn auto_brand(doc: &Document) -> String {
    if let Some(brand) = doc.meta_content("og:brand") {
        let brand = brand.trim();
        if !brand.is_empty() {
            return brand.to_string();
        }
    }

    let brand_href = Regex::new(r"(?i)/brand/").unwrap();
    if let Ok(anchors) = doc.select("a[href]") {
        for anchor in anchors {
            if let Some(href) = anchor.attr("href")
                && brand_href.is_match(href)
            {
                let text = anchor.trimmed_text();
                if !text.is_empty() {
                    return text;
                }
            }
        }
    }

    let labelled = Regex::new(r"Brand[:\s]+([A-Za-z0-9\s&-]+)").unwrap();
    labelled
        .captures(&doc.text_content())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Main image: the first `<img>` whose source carries a known image
/// extension and is not a logo or icon, resolved to an absolute URL.
pub fn auto_image(doc: &Document, base: Option<&Url>) -> String {
    let Ok(images) = doc.select("img") else {
        return String::new();
    };

    for img in images {
        let Some(src) = img.attr("src").or_else(|| img.attr("data-src")) else {
            continue;
        };

        let lower = src.to_lowercase();
        let path = lower.split(['?', '#']).next().unwrap_or_default();

        if IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
            && !lower.contains("logo")
            && !lower.contains("icon")
        {
            return absolutize(src, base);
        }
    }

    String::new()
}

/// Description: the `description` meta tag, falling back to the first
/// container whose class mentions description/details/about, truncated
/// to 500 characters.
pub fn auto_description(doc: &Document) -> String {
    if let Some(desc) = doc.meta_content("description") {
        let desc = desc.trim();
        if !desc.is_empty() {
            return desc.to_string();
        }
    }

    let class_pattern = Regex::new(r"(?i)description|details|about").unwrap();
    if let Ok(containers) = doc.select("div[class], p[class]") {
        for container in containers {
            if let Some(class) = container.attr("class")
                && class_pattern.is_match(class)
            {
                let text = container.trimmed_text();
                if !text.is_empty() {
                    return text.chars().take(500).collect();
                }
            }
        }
    }

    String::new()
}

/// Collection: the last breadcrumb link when a breadcrumb nav with at
/// least two links exists, otherwise a URL path segment with hyphens
/// replaced and words title-cased.
pub fn auto_collection(doc: &Document, url: &str) -> String {
    let breadcrumb = Regex::new(r"(?i)breadcrumb").unwrap();
    if let Ok(navs) = doc.select("nav") {
        for nav in navs {
            if let Some(label) = nav.attr("aria-label")
                && breadcrumb.is_match(label)
                && let Ok(links) = nav.select("a")
                && links.len() >= 2
                && let Some(last) = links.last()
            {
                return last.trimmed_text();
            }
        }
    }

    if let Ok(parsed) = Url::parse(url)
        && let Some(segment) = parsed.path_segments().and_then(|mut segments| segments.nth(1))
    {
        return title_case(&segment.replace('-', " "));
    }

    String::new()
}

/// Generic extra field: a labelled `Name: value` pattern over the page
/// text, matched case-insensitively on the configured field name.
pub fn auto_field(doc: &Document, field_name: &str) -> String {
    let Ok(labelled) = Regex::new(&format!(r"(?i){}[:\s]+([^\n]+)", regex::escape(field_name))) else {
        return String::new();
    };

    labelled
        .captures(&doc.text_content())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}
