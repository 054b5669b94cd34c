//! Database acquisition: download, cache and extract GeoLite2 CSV
//! editions.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use crate::config::Settings;
use crate::edition::Edition;
use crate::error::{Error, Result};
use crate::ingest::{self, EditionFiles};
use crate::metadata::DbMetadata;

/// MaxMind permalink for GeoLite2 CSV downloads.
pub const DEFAULT_DOWNLOAD_URL: &str = "https://download.maxmind.com/app/geoip_download";

/// Manager for the lifecycle of cached GeoLite2 CSV editions.
///
/// With a license key, editions are downloaded from MaxMind and cached;
/// without one, bundled archives from the assets directory are used.
/// Cached CSVs are refreshed once they are older than the configured
/// interval, with ETag conditional requests avoiding re-downloads of
/// unchanged archives.
pub struct DatabaseManager {
    cache_dir: PathBuf,
    assets_dir: PathBuf,
    license_key: Option<String>,
    base_url: String,
    update_interval: Duration,
}

impl DatabaseManager {
    /// Create a manager from settings.
    pub fn new(settings: &Settings) -> Self {
        Self {
            cache_dir: settings.cache_dir.clone(),
            assets_dir: settings.assets_dir.clone(),
            license_key: settings.license_key.clone(),
            base_url: DEFAULT_DOWNLOAD_URL.to_string(),
            update_interval: settings.update_interval,
        }
    }

    /// Override the download endpoint (mirrors, tests).
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// Override the staleness interval.
    pub fn with_update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }

    /// Path of the cached archive for an edition.
    pub fn archive_path(&self, edition: Edition) -> PathBuf {
        self.cache_dir.join(format!("{}.zip", edition.edition_id()))
    }

    /// Path of the bundled archive used without a license key.
    pub fn asset_path(&self, edition: Edition) -> PathBuf {
        self.assets_dir.join(format!("{}.zip", edition.edition_id()))
    }

    fn temp_path(&self, edition: Edition) -> PathBuf {
        self.cache_dir
            .join(format!("{}.zip.tmp", edition.edition_id()))
    }

    fn metadata_path(&self, edition: Edition) -> PathBuf {
        self.cache_dir.join(format!("{}.meta", edition.edition_id()))
    }

    /// Paths of the extracted CSV pair for an edition.
    pub fn edition_files(&self, edition: Edition) -> EditionFiles {
        EditionFiles {
            blocks: self.cache_dir.join(edition.blocks_file()),
            locations: self.cache_dir.join(edition.locations_file()),
        }
    }

    fn files_present(&self, files: &EditionFiles) -> bool {
        files.blocks.exists() && files.locations.exists()
    }

    /// The last successful refresh of an edition, if any.
    pub fn last_refreshed(&self, edition: Edition) -> Option<SystemTime> {
        DbMetadata::load(self.metadata_path(edition))
            .ok()
            .and_then(|m| m.refreshed_at())
    }

    /// Whether the cached edition is stale under the configured
    /// interval.
    pub fn needs_update(&self, edition: Edition) -> bool {
        DbMetadata::load(self.metadata_path(edition))
            .unwrap_or_default()
            .is_stale(self.update_interval)
    }

    /// Make an edition's CSV pair available, downloading or extracting
    /// only when required.
    pub fn ensure(&self, edition: Edition) -> Result<EditionFiles> {
        fs::create_dir_all(&self.cache_dir)?;

        let files = self.edition_files(edition);
        if self.files_present(&files) && !self.needs_update(edition) {
            log::debug!("using cached {} CSVs", edition);
            return Ok(files);
        }

        if self.license_key.is_some() {
            return match self.refresh(edition) {
                Ok(_) => Ok(files),
                Err(e) if self.files_present(&files) => {
                    log::warn!("refresh of {} failed ({}); using stale cache", edition, e);
                    Ok(files)
                }
                Err(e) => Err(e),
            };
        }

        // Keyless operation: bundled archive, or whatever is already
        // cached.
        let asset = self.asset_path(edition);
        if asset.exists() {
            ingest::extract_edition(&asset, &self.cache_dir, edition)?;
            DbMetadata::stamp(None).save(self.metadata_path(edition))?;
            log::info!(
                "extracted {} from bundled archive {}",
                edition,
                asset.display()
            );
            return Ok(files);
        }
        if self.files_present(&files) {
            log::warn!(
                "no license key and no bundled archive; using stale {} cache",
                edition
            );
            return Ok(files);
        }
        Err(Error::Config(format!(
            "no way to obtain the {} database: set MAXMIND_KEY or provide {}",
            edition,
            asset.display()
        )))
    }

    /// Download an edition and refresh the extracted CSVs.
    ///
    /// Returns `false` when the server answered 304 Not Modified for
    /// the cached ETag.
    pub fn refresh(&self, edition: Edition) -> Result<bool> {
        let key = self
            .license_key
            .as_deref()
            .ok_or_else(|| Error::Config("MAXMIND_KEY is not set".to_string()))?;

        fs::create_dir_all(&self.cache_dir)?;

        let url = format!(
            "{}?edition_id={}&license_key={}&suffix=zip",
            self.base_url,
            edition.edition_id(),
            key
        );

        let meta = DbMetadata::load(self.metadata_path(edition)).unwrap_or_default();
        let mut request = ureq::get(&url);
        if let Some(ref etag) = meta.etag {
            if self.files_present(&self.edition_files(edition)) {
                request = request.set("If-None-Match", etag);
            }
        }

        let response = match request.call() {
            Ok(resp) => resp,
            Err(ureq::Error::Status(304, _)) => {
                log::debug!("{} archive not modified (304)", edition);
                DbMetadata::stamp(meta.etag).save(self.metadata_path(edition))?;
                return Ok(false);
            }
            Err(ureq::Error::Status(code, _)) => {
                return Err(Error::Download(format!(
                    "{} download failed: HTTP {}",
                    edition, code
                )));
            }
            Err(ureq::Error::Transport(t)) => {
                return Err(Error::Download(format!(
                    "{} download failed: {}",
                    edition, t
                )));
            }
        };

        let etag = response.header("ETag").map(str::to_string);

        let mut body = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut body)
            .map_err(|e| Error::Download(format!("reading {} response: {}", edition, e)))?;

        if !body.starts_with(b"PK") {
            return Err(Error::Download(format!(
                "{} response is not a zip archive",
                edition
            )));
        }

        let archive_path = self.archive_path(edition);
        let temp_path = self.temp_path(edition);
        let mut temp = File::create(&temp_path)?;
        temp.write_all(&body)?;
        temp.sync_all()?;
        drop(temp);
        fs::rename(&temp_path, &archive_path)?;

        ingest::extract_edition(&archive_path, &self.cache_dir, edition)?;
        DbMetadata::stamp(etag).save(self.metadata_path(edition))?;

        log::info!("downloaded {} database ({} bytes)", edition, body.len());
        Ok(true)
    }

    /// Refresh an edition only when the cached copy is stale.
    pub fn refresh_if_needed(&self, edition: Edition) -> Result<bool> {
        if self.needs_update(edition) {
            self.refresh(edition)
        } else {
            Ok(false)
        }
    }
}
