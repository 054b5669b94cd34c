//! Database ingestion: archive extraction and CSV parsing into the
//! in-memory index and table.

mod archive;
mod records;

pub use archive::{extract_edition, is_gzip, open_csv};
pub use records::{read_blocks, read_locations};

use std::path::PathBuf;

use crate::edition::Edition;
use crate::error::{Error, Result};
use crate::index::RangeIndex;
use crate::locations::LocationTable;

/// Paths of the extracted CSV pair for one edition.
#[derive(Debug, Clone)]
pub struct EditionFiles {
    pub blocks: PathBuf,
    pub locations: PathBuf,
}

/// Load one edition's CSV pair into a range index and a location table.
///
/// An empty file is downgraded to a warning plus an empty structure so
/// the caller can still serve (always-missing) lookups; every other
/// ingestion failure aborts.
pub fn load_edition(files: &EditionFiles, edition: Edition) -> Result<(RangeIndex, LocationTable)> {
    let blocks = open_csv(&files.blocks)?;
    let index = match records::read_blocks(blocks) {
        Ok(entries) => RangeIndex::from_entries(entries),
        Err(Error::EmptyTable(what)) => {
            log::warn!(
                "{} has no {} rows; {} lookups will miss",
                files.blocks.display(),
                what,
                edition
            );
            RangeIndex::default()
        }
        Err(e) => return Err(e),
    };

    let locations = open_csv(&files.locations)?;
    let names = match records::read_locations(locations, edition.name_column()) {
        Ok(table) => table,
        Err(Error::EmptyTable(what)) => {
            log::warn!(
                "{} has no {} rows; {} codes will resolve to Unknown",
                files.locations.display(),
                what,
                edition
            );
            LocationTable::default()
        }
        Err(e) => return Err(e),
    };

    log::info!(
        "loaded {} edition: {} ranges, {} names",
        edition,
        index.len(),
        names.len()
    );

    Ok((index, names))
}
