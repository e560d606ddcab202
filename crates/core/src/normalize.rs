//! Text normalization helpers.
//!
//! Small parsers for the scalar shapes product pages carry (prices, ABV
//! percentages, counts) plus handle generation for catalog slugs.

use regex::Regex;

/// Parses a price string like `"$1,234.99"` into a float.
///
/// Currency symbols and thousands separators are stripped; anything that
/// still fails to parse yields `0.0`.
pub fn parse_price(text: &str) -> f64 {
    text.trim()
        .replace(['$', ','], "")
        .parse()
        .unwrap_or(0.0)
}

/// Parses an ABV string like `"14.5%"` into a float, `0.0` on failure.
pub fn parse_abv(text: &str) -> f64 {
    text.trim().trim_end_matches('%').parse().unwrap_or(0.0)
}

/// Parses the first integer found in a string, `0` when there is none.
///
/// Review counts arrive as `"165 Reviews"`; the digits are what matters.
pub fn parse_int(text: &str) -> i64 {
    let digits = Regex::new(r"(\d+)").unwrap();
    digits
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Generates a URL-safe handle from a product name.
///
/// Lowercases, drops everything but word characters, spaces and hyphens,
/// then collapses runs of spaces/hyphens into single hyphens.
///
/// # Example
///
/// ```rust
/// use corkscrew_core::normalize::handle;
///
/// assert_eq!(handle("Château d'Yquem 2015!"), "château-dyquem-2015");
/// ```
pub fn handle(name: &str) -> String {
    let strip = Regex::new(r"[^\w\s-]").unwrap();
    let collapse = Regex::new(r"[-\s]+").unwrap();

    let lowered = name.to_lowercase();
    let stripped = strip.replace_all(&lowered, "");
    let collapsed = collapse.replace_all(&stripped, "-");
    collapsed.trim_matches('-').to_string()
}

/// Title-cases a string word by word (`"red-wine"` stays hyphenated;
/// callers replace separators first).
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("$22.99"), 22.99);
        assert_eq!(parse_price("$1,234.50"), 1234.5);
        assert_eq!(parse_price("22.99"), 22.99);
        assert_eq!(parse_price(""), 0.0);
        assert_eq!(parse_price("call for price"), 0.0);
    }

    #[test]
    fn test_parse_abv() {
        assert_eq!(parse_abv("14.5%"), 14.5);
        assert_eq!(parse_abv("13"), 13.0);
        assert_eq!(parse_abv("unknown"), 0.0);
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("165 Reviews"), 165);
        assert_eq!(parse_int("Reviews: 42"), 42);
        assert_eq!(parse_int("no reviews"), 0);
    }

    #[test]
    fn test_handle() {
        assert_eq!(handle("Renieri Invetro Super Tuscan"), "renieri-invetro-super-tuscan");
        assert_eq!(handle("1858 by Caymus: Red Blend!"), "1858-by-caymus-red-blend");
        assert_eq!(handle("  spaced   out  "), "spaced-out");
        assert_eq!(handle(""), "");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("red wine"), "Red Wine");
        assert_eq!(title_case("cabernet"), "Cabernet");
        assert_eq!(title_case(""), "");
    }
}
