//! GeoLite2 CSV record parsing.

use std::io::Read;

use csv::ReaderBuilder;

use crate::error::{Error, Result};
use crate::locations::LocationTable;
use crate::prefix::RangeEntry;

/// Parse a blocks CSV into range entries.
///
/// Column 0 is the CIDR, column 1 the geoname id. The id may be empty
/// in real data; such ranges are kept and resolve to no display name. A
/// malformed CIDR fails the whole read, no record is ever dropped
/// silently.
pub fn read_blocks<R: Read>(reader: R) -> Result<Vec<RangeEntry>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut entries = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let cidr = record.get(0).unwrap_or_default();
        let code = record.get(1).unwrap_or_default();
        entries.push(RangeEntry::from_cidr(cidr, code)?);
    }

    if entries.is_empty() {
        return Err(Error::EmptyTable("blocks"));
    }
    Ok(entries)
}

/// Parse a locations CSV into a display-name table.
///
/// Column 0 is the geoname id; `name_column` selects the display name
/// (country or city). Duplicate ids keep the last name seen; rows with
/// an empty name are skipped so their codes resolve to Unknown.
pub fn read_locations<R: Read>(reader: R, name_column: usize) -> Result<LocationTable> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut table = LocationTable::new();
    for record in csv_reader.records() {
        let record = record?;
        let code = record.get(0).unwrap_or_default();
        let name = record
            .get(name_column)
            .ok_or(Error::MissingColumn(name_column))?;
        if name.is_empty() {
            continue;
        }
        table.insert(code, name);
    }

    if table.is_empty() {
        return Err(Error::EmptyTable("locations"));
    }
    Ok(table)
}
