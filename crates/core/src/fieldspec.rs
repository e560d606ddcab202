//! Declarative field specifications.
//!
//! A [`FieldSpec`] describes how to locate one field's value in a document.
//! It is data, never code: the extractor in [`crate::extract`] is the single
//! interpreter for every variant. Raw configuration strings use three
//! shapes, resolved by [`FieldSpec::parse`]:
//!
//! - `span.price` — a plain CSS selector; the value is the first match's
//!   trimmed text.
//! - `dt.label + dd` — a sibling combinator; element `A` is located by
//!   selector, the value is the trimmed text of its next sibling element.
//! - `text*="ABV"` — a text-pattern marker; the value is the trimmed text
//!   of the parent of the first text node matching the pattern
//!   (case-insensitive).
//!
//! A spec may be paired with a [`Transform`]: a regex whose first capture
//! group is coerced to a declared type. On a pattern miss, numeric kinds
//! yield their zero value and `Str` passes the input through unchanged.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{CorkscrewError, Result};

/// How to locate one field's value in a document.
#[derive(Debug, Clone)]
pub enum FieldSpec {
    /// Plain CSS selector; first match wins.
    Selector(String),
    /// Selector for element `A` in `A + B`; the value is A's next sibling.
    Sibling(String),
    /// Case-insensitive regex matched against text nodes.
    TextPattern(Regex),
}

impl FieldSpec {
    /// Parses a raw configuration string into a spec variant.
    ///
    /// # Errors
    ///
    /// Returns [`CorkscrewError::ConfigError`] if a `text*=` pattern is not
    /// a valid regex. Selector validity is checked lazily at extraction
    /// time, where a bad selector degrades to an empty value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use corkscrew_core::fieldspec::FieldSpec;
    ///
    /// let spec = FieldSpec::parse("h1.product-name").unwrap();
    /// assert!(matches!(spec, FieldSpec::Selector(_)));
    ///
    /// let spec = FieldSpec::parse("text*='ABV'").unwrap();
    /// assert!(matches!(spec, FieldSpec::TextPattern(_)));
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();

        if let Some(rest) = raw.split_once("text*=").map(|(_, rest)| rest) {
            let pattern = rest.trim().trim_matches(|c| c == '\'' || c == '"');
            let regex = Regex::new(&format!("(?i){}", pattern))
                .map_err(|e| CorkscrewError::ConfigError(format!("invalid text pattern '{}': {}", pattern, e)))?;
            return Ok(FieldSpec::TextPattern(regex));
        }

        if let Some((first, _)) = raw.split_once('+') {
            return Ok(FieldSpec::Sibling(first.trim().to_string()));
        }

        Ok(FieldSpec::Selector(raw.to_string()))
    }
}

/// Target type of a transform's captured value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    #[default]
    #[serde(rename = "string")]
    Str,
    Float,
    Int,
}

/// A regex-plus-type coercion applied to an extracted string.
#[derive(Debug, Clone)]
pub struct Transform {
    pattern: Regex,
    kind: TransformKind,
}

impl Transform {
    /// Compiles a transform from a pattern string and target kind.
    ///
    /// # Errors
    ///
    /// Returns [`CorkscrewError::ConfigError`] if the pattern is invalid.
    pub fn new(pattern: &str, kind: TransformKind) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| CorkscrewError::ConfigError(format!("invalid transform pattern '{}': {}", pattern, e)))?;
        Ok(Self { pattern, kind })
    }

    /// Runs the transform against extracted text.
    ///
    /// On a match, capture group 1 is coerced to the declared kind; a group
    /// that fails to parse yields the kind's zero value. On no match, `Str`
    /// returns the input unchanged and numeric kinds return their zero
    /// value.
    pub fn apply(&self, text: &str) -> Value {
        let captured = self
            .pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str());

        match (self.kind, captured) {
            (TransformKind::Str, Some(value)) => Value::Text(value.to_string()),
            (TransformKind::Str, None) => Value::Text(text.to_string()),
            (TransformKind::Float, Some(value)) => Value::Float(value.parse().unwrap_or(0.0)),
            (TransformKind::Float, None) => Value::Float(0.0),
            (TransformKind::Int, Some(value)) => Value::Int(value.parse().unwrap_or(0)),
            (TransformKind::Int, None) => Value::Int(0),
        }
    }

    /// The declared target kind.
    pub fn kind(&self) -> TransformKind {
        self.kind
    }
}

/// An extracted field value.
///
/// Values start life as strings; a [`Transform`] is the only way a record
/// ends up holding a typed scalar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Float(f64),
    Int(i64),
}

impl Value {
    /// String projection used for CSV cells and display.
    pub fn render(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Float(f) => f.to_string(),
            Value::Int(i) => i.to_string(),
        }
    }

    /// Borrows the text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// True for the empty text value, the shape of an extraction miss.
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Text(s) if s.is_empty())
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Text(String::new())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_selector() {
        let spec = FieldSpec::parse("h1.product-name").unwrap();
        assert!(matches!(spec, FieldSpec::Selector(s) if s == "h1.product-name"));
    }

    #[test]
    fn test_parse_sibling_selector() {
        let spec = FieldSpec::parse("dt.label + dd").unwrap();
        assert!(matches!(spec, FieldSpec::Sibling(s) if s == "dt.label"));
    }

    #[test]
    fn test_parse_text_pattern() {
        let spec = FieldSpec::parse("text*='Alcohol'").unwrap();
        match spec {
            FieldSpec::TextPattern(re) => {
                assert!(re.is_match("alcohol content"));
                assert!(re.is_match("ALCOHOL"));
            }
            other => panic!("expected text pattern, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_text_pattern_double_quotes() {
        let spec = FieldSpec::parse("text*=\"Varietal\"").unwrap();
        assert!(matches!(spec, FieldSpec::TextPattern(_)));
    }

    #[test]
    fn test_parse_invalid_text_pattern() {
        let result = FieldSpec::parse("text*='[unclosed'");
        assert!(matches!(result, Err(CorkscrewError::ConfigError(_))));
    }

    #[test]
    fn test_transform_float_match() {
        let t = Transform::new(r"\$(\d+\.\d{2})", TransformKind::Float).unwrap();
        assert_eq!(t.apply("$22.99"), Value::Float(22.99));
    }

    #[test]
    fn test_transform_float_miss_returns_zero() {
        let t = Transform::new(r"\$(\d+\.\d{2})", TransformKind::Float).unwrap();
        assert_eq!(t.apply("price on request"), Value::Float(0.0));
        assert_eq!(t.apply(""), Value::Float(0.0));
    }

    #[test]
    fn test_transform_int_match_and_miss() {
        let t = Transform::new(r"(\d+) Reviews", TransformKind::Int).unwrap();
        assert_eq!(t.apply("165 Reviews"), Value::Int(165));
        assert_eq!(t.apply("no reviews yet"), Value::Int(0));
    }

    #[test]
    fn test_transform_string_miss_passes_through() {
        let t = Transform::new(r"Region: (\w+)", TransformKind::Str).unwrap();
        assert_eq!(t.apply("Tuscany"), Value::Text("Tuscany".to_string()));
        assert_eq!(t.apply("Region: Tuscany"), Value::Text("Tuscany".to_string()));
    }

    #[test]
    fn test_transform_unparsable_group_is_zero() {
        let t = Transform::new(r"ABV: (\S+)", TransformKind::Float).unwrap();
        assert_eq!(t.apply("ABV: unknown"), Value::Float(0.0));
    }

    #[test]
    fn test_transform_invalid_pattern() {
        let result = Transform::new(r"([unclosed", TransformKind::Str);
        assert!(matches!(result, Err(CorkscrewError::ConfigError(_))));
    }

    #[test]
    fn test_value_render() {
        assert_eq!(Value::Text("abc".to_string()).render(), "abc");
        assert_eq!(Value::Float(14.5).render(), "14.5");
        assert_eq!(Value::Int(6).render(), "6");
    }

    #[test]
    fn test_value_is_empty() {
        assert!(Value::default().is_empty());
        assert!(!Value::Text("x".to_string()).is_empty());
        assert!(!Value::Float(0.0).is_empty());
    }
}
