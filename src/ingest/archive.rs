//! Archive handling for downloaded database files.
//!
//! GeoLite2 CSV editions ship as zip archives with the CSV members
//! nested under a dated directory, so member selection goes by
//! file-name suffix. Single-file gzip mirrors of the CSVs are handled
//! transparently when the files are opened.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::edition::Edition;
use crate::error::{Error, Result};
use crate::ingest::EditionFiles;

/// Check whether data starts with the gzip magic bytes.
pub fn is_gzip(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0x1f && data[1] == 0x8b
}

/// Open a CSV file for reading, transparently decompressing a gzip
/// payload.
pub fn open_csv(path: &Path) -> Result<Box<dyn Read>> {
    let mut file = File::open(path)?;

    let mut magic = [0u8; 2];
    let n = file.read(&mut magic)?;
    file.seek(SeekFrom::Start(0))?;

    if is_gzip(&magic[..n]) {
        Ok(Box::new(GzDecoder::new(BufReader::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Extract the blocks and locations members for `edition` from a
/// GeoLite2 CSV zip archive, flattening them into `dest`.
pub fn extract_edition(archive_path: &Path, dest: &Path, edition: Edition) -> Result<EditionFiles> {
    let file = File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))?;

    let mut blocks = None;
    let mut locations = None;

    for i in 0..archive.len() {
        let mut member = archive.by_index(i)?;
        let name = member.name().to_string();

        let slot = if name.ends_with(edition.blocks_file()) {
            &mut blocks
        } else if name.ends_with(edition.locations_file()) {
            &mut locations
        } else {
            continue;
        };

        let file_name = Path::new(&name)
            .file_name()
            .ok_or_else(|| Error::Config(format!("unusable archive member name: {}", name)))?;
        let out_path = dest.join(file_name);
        let mut out = File::create(&out_path)?;
        io::copy(&mut member, &mut out)?;

        log::debug!("extracted {} ({} bytes)", out_path.display(), member.size());
        *slot = Some(out_path);
    }

    match (blocks, locations) {
        (Some(blocks), Some(locations)) => Ok(EditionFiles { blocks, locations }),
        _ => Err(Error::Config(format!(
            "archive {} is missing the {} CSV members",
            archive_path.display(),
            edition
        ))),
    }
}
