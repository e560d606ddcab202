pub mod autodetect;
pub mod builder;
pub mod config;
#[cfg(feature = "fetch")]
pub mod crawler;
pub mod error;
pub mod extract;
#[cfg(feature = "fetch")]
pub mod fetch;
pub mod fieldspec;
pub mod formatters;
pub mod normalize;
pub mod parse;
pub mod record;
pub mod urls;

pub use builder::RecordBuilder;
pub use config::{CollectionPage, ConfigLoader, ErrorHandling, ProductConfig, SiteConfig, SiteSection};
#[cfg(feature = "fetch")]
pub use crawler::Crawler;
pub use error::{CorkscrewError, Result};
pub use extract::{extract, extract_image, extract_raw, extract_value};
#[cfg(feature = "fetch")]
pub use fetch::{FetchConfig, Fetcher};
pub use fieldspec::{FieldSpec, Transform, TransformKind, Value};
pub use formatters::{read_records, record_to_json, records_to_json, write_csv_file, write_records};
pub use parse::{Document, Element};
pub use record::{CANONICAL_FIELDS, ProductRecord};
pub use urls::{UrlPatterns, find_product_links};
