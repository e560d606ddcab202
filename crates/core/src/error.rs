//! Error types for Corkscrew operations.
//!
//! This module defines the main error type [`CorkscrewError`] which covers
//! configuration loading, page fetching, selector parsing, and output
//! serialization failures.
//!
//! A field that fails to extract is NOT an error: extraction is a total
//! function that yields an empty string on a miss. Only the surrounding
//! machinery (fetch, config, CSV) has failure paths.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for crawl and extraction runs.
#[derive(Error, Debug)]
pub enum CorkscrewError {
    /// HTTP request errors from reqwest.
    ///
    /// Wraps network errors, DNS failures, connection issues, and other
    /// HTTP-related problems.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Non-success HTTP status after all retry attempts.
    #[cfg(feature = "fetch")]
    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// Request timeout.
    #[cfg(feature = "fetch")]
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A CSS selector that could not be parsed.
    ///
    /// Surfaced only when a selector is compiled from configuration;
    /// at extraction time a bad selector degrades to an empty result.
    #[error("Invalid selector: {0}")]
    SelectorError(String),

    /// Configuration errors.
    ///
    /// Returned when site or product configuration files are missing or
    /// contain invalid YAML.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// CSV serialization errors.
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File I/O errors.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for CorkscrewError.
pub type Result<T> = std::result::Result<T, CorkscrewError>;
