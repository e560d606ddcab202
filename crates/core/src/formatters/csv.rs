//! CSV serialization with permissive projection.
//!
//! The writer serializes exactly the caller-specified ordered subset of
//! fields: record keys missing from the order are silently dropped, and
//! names in the order that a record lacks become empty cells. A record
//! survives the trip structurally intact for the included fields and
//! loses the rest — dropped, not corrupted.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::fieldspec::Value;
use crate::record::ProductRecord;
use crate::Result;

/// Writes records to a CSV destination with a header row.
pub fn write_records<W: Write>(writer: W, records: &[ProductRecord], field_order: &[String]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(field_order)?;

    for record in records {
        let row: Vec<String> = field_order.iter().map(|field| record.render(field)).collect();
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes records to a CSV file.
///
/// # Errors
///
/// I/O and CSV serialization errors.
pub fn write_csv_file<P: AsRef<Path>>(path: P, records: &[ProductRecord], field_order: &[String]) -> Result<()> {
    let file = File::create(path)?;
    write_records(file, records, field_order)
}

/// Reads records back from a CSV file.
///
/// Every cell comes back as a text value; typed scalars do not survive
/// the round trip, their rendered strings do.
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<ProductRecord>> {
    let mut rdr = csv::Reader::from_path(path)?;
    let headers = rdr.headers()?.clone();

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let mut record = ProductRecord::default();
        for (field, value) in headers.iter().zip(row.iter()) {
            record.set(field, Value::Text(value.to_string()));
        }
        records.push(record);
    }

    Ok(records)
}
