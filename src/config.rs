//! Environment-derived settings.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default staleness interval before a cached database is refreshed.
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Runtime settings for database acquisition.
///
/// Values come from the environment (a `.env` file is honored) and can
/// be overridden by CLI flags.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory holding downloaded archives, extracted CSVs and
    /// metadata sidecars.
    pub cache_dir: PathBuf,
    /// Directory searched for bundled archives when no license key is
    /// set.
    pub assets_dir: PathBuf,
    /// MaxMind license key; without it only bundled archives are used.
    pub license_key: Option<String>,
    /// Staleness interval before a cached edition is re-downloaded.
    pub update_interval: Duration,
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// `MAXMIND_KEY` enables online downloads; `IPLOC_CACHE_DIR` and
    /// `IPLOC_ASSETS_DIR` override the default directories.
    pub fn from_env() -> Self {
        // A .env file is optional.
        let _ = dotenvy::dotenv();

        let mut settings = Self::default();
        if let Some(dir) = env::var_os("IPLOC_CACHE_DIR") {
            settings.cache_dir = PathBuf::from(dir);
        }
        if let Some(dir) = env::var_os("IPLOC_ASSETS_DIR") {
            settings.assets_dir = PathBuf::from(dir);
        }
        settings.license_key = env::var("MAXMIND_KEY").ok().filter(|k| !k.is_empty());
        settings
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache_dir: env::temp_dir().join("iploc"),
            assets_dir: PathBuf::from("assets"),
            license_key: None,
            update_interval: DEFAULT_UPDATE_INTERVAL,
        }
    }
}
