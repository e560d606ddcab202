//! Output serialization for extracted records.

pub mod csv;
pub mod json;

pub use self::csv::{read_records, write_csv_file, write_records};
pub use self::json::{record_to_json, records_to_json};
