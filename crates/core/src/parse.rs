//! HTML parsing and DOM navigation.
//!
//! This module provides the [`Document`] and [`Element`] types for parsing
//! HTML and querying the DOM tree with CSS selectors. On top of plain
//! selection it carries the two walks the field extractor needs: locating
//! the parent element of a matching text node, and stepping to the next
//! sibling element for `A + B` style specs.
//!
//! # Example
//!
//! ```rust
//! use corkscrew_core::parse::Document;
//!
//! let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
//! let doc = Document::parse(html);
//! assert_eq!(doc.title(), Some("Test".to_string()));
//! ```

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::{CorkscrewError, Result};

/// Represents a parsed HTML document.
///
/// A Document wraps one fetched page and provides methods for querying
/// elements using CSS selectors, reading meta tags, and scanning text
/// nodes. It optionally carries the page's originating URL, used to
/// resolve relative links and image sources.
pub struct Document {
    html: Html,
    base_url: Option<Url>,
}

impl Document {
    /// Parses HTML from a string.
    ///
    /// # Example
    ///
    /// ```rust
    /// use corkscrew_core::parse::Document;
    ///
    /// let doc = Document::parse("<html><body><h1>Title</h1></body></html>");
    /// assert_eq!(doc.select("h1").unwrap().len(), 1);
    /// ```
    pub fn parse(html: &str) -> Self {
        let html = Html::parse_document(html);
        Self { html, base_url: None }
    }

    /// Parses HTML together with the absolute URL the page was fetched from.
    ///
    /// # Errors
    ///
    /// Returns [`CorkscrewError::InvalidUrl`] if `url` cannot be parsed.
    pub fn parse_with_url(html: &str, url: &str) -> Result<Self> {
        let base_url = Url::parse(url).map_err(|e| CorkscrewError::InvalidUrl(format!("{}: {}", url, e)))?;
        let html = Html::parse_document(html);
        Ok(Self { html, base_url: Some(base_url) })
    }

    /// Gets the originating URL, if one was provided at parse time.
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`CorkscrewError::SelectorError`] if the selector is invalid.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = Selector::parse(selector).map_err(|e| CorkscrewError::SelectorError(format!("{}", e)))?;

        Ok(self.html.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Selects the first element matching a CSS selector, or `None` if the
    /// selector matches nothing or cannot be parsed.
    pub fn select_first(&'_ self, selector: &str) -> Option<Element<'_>> {
        let sel = Selector::parse(selector).ok()?;
        self.html.select(&sel).next().map(|el| Element { element: el })
    }

    /// Gets the content of the `<title>` element if present.
    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        self.html
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>())
    }

    /// Gets all text content from the document.
    pub fn text_content(&self) -> String {
        self.html.root_element().text().collect()
    }

    /// Get meta tag content by `name` or `property` attribute.
    pub fn meta_content(&self, attr: &str) -> Option<String> {
        let selector = format!("meta[name=\"{}\"]", attr);
        if let Some(el) = self.select_first(&selector)
            && let Some(content) = el.attr("content")
        {
            return Some(content.to_string());
        }

        let selector = format!("meta[property=\"{}\"]", attr);
        if let Some(el) = self.select_first(&selector)
            && let Some(content) = el.attr("content")
        {
            return Some(content.to_string());
        }

        None
    }

    /// Scans all text nodes for a regex match and returns the trimmed text
    /// of the matched node's parent element.
    ///
    /// Used for `text*="Pattern"` field specs: the marker text locates the
    /// node, the surrounding element carries the value.
    pub fn find_text_parent(&self, pattern: &Regex) -> Option<String> {
        for node in self.html.root_element().descendants() {
            if let Some(text) = node.value().as_text()
                && pattern.is_match(text)
                && let Some(parent) = node.parent().and_then(ElementRef::wrap)
            {
                let content: String = parent.text().collect();
                return Some(content.trim().to_string());
            }
        }

        None
    }
}

/// A wrapper around scraper's ElementRef.
///
/// Element represents a single node in the HTML document tree and provides
/// access to its attributes, text content, and adjacent elements.
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the inner HTML of this element.
    pub fn inner_html(&self) -> String {
        self.element.inner_html()
    }

    /// Gets the outer HTML of this element.
    pub fn outer_html(&self) -> String {
        self.element.html()
    }

    /// Gets the concatenated text content of this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Gets the text content with surrounding whitespace removed.
    pub fn trimmed_text(&self) -> String {
        self.text().trim().to_string()
    }

    /// Gets the value of an attribute, or `None` if absent.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.element.value().attr(name)
    }

    /// Gets the lowercase tag name of this element.
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_lowercase()
    }

    /// Steps to the next sibling that is an element, skipping text and
    /// comment nodes.
    pub fn next_sibling_element(&self) -> Option<Element<'a>> {
        self.element
            .next_siblings()
            .find_map(ElementRef::wrap)
            .map(|el| Element { element: el })
    }

    /// Selects descendant elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`CorkscrewError::SelectorError`] if the selector is invalid.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = Selector::parse(selector).map_err(|e| CorkscrewError::SelectorError(format!("{}", e)))?;

        Ok(self.element.select(&sel).map(|el| Element { element: el }).collect())
    }
}
