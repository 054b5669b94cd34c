//! iploc - IPv4 geolocation lookup over locally built range indexes.
//!
//! The crate ingests the MaxMind GeoLite2 CSV editions into two
//! in-memory structures per edition: a [`RangeIndex`] of disjoint
//! network ranges tagged with location codes, and a [`LocationTable`]
//! mapping those codes to display names. A [`GeoSession`] owns the
//! country and city pairs and answers point lookups by binary search
//! over the sorted ranges, using nothing but byte-wise address/mask
//! comparison.
//!
//! # Quick start
//!
//! ```
//! use iploc::{GeoSession, LocationTable, RangeEntry, RangeIndex};
//!
//! let index = RangeIndex::from_entries(vec![
//!     RangeEntry::from_cidr("167.114.238.0/24", "3017382").unwrap(),
//! ]);
//! let names = LocationTable::from_pairs([("3017382".to_string(), "France".to_string())]);
//!
//! let session = GeoSession::new(index, names, RangeIndex::default(), LocationTable::default());
//! let resolution = session.resolve_str("167.114.238.22").unwrap();
//! assert_eq!(resolution.country.as_deref(), Some("France"));
//! assert_eq!(resolution.city_display(), "Unknown");
//! ```
//!
//! # Database acquisition
//!
//! [`DatabaseManager`] downloads and caches the CSV editions (license
//! key via `MAXMIND_KEY`) or extracts bundled archives, and [`ingest`]
//! turns the extracted files into the session structures:
//!
//! ```ignore
//! use iploc::{ingest, DatabaseManager, Edition, GeoSession, Settings};
//!
//! let settings = Settings::from_env();
//! let manager = DatabaseManager::new(&settings);
//!
//! let (country_index, country_names) =
//!     ingest::load_edition(&manager.ensure(Edition::Country)?, Edition::Country)?;
//! let (city_index, city_names) =
//!     ingest::load_edition(&manager.ensure(Edition::City)?, Edition::City)?;
//!
//! let session = GeoSession::new(country_index, country_names, city_index, city_names);
//! println!("{}", session.resolve_str("167.114.238.22")?);
//! ```

mod config;
mod download;
mod edition;
mod error;
mod index;
mod locations;
mod metadata;
mod prefix;
mod session;

pub mod ingest;

// Re-export core types
pub use config::{Settings, DEFAULT_UPDATE_INTERVAL};
pub use download::{DatabaseManager, DEFAULT_DOWNLOAD_URL};
pub use edition::Edition;
pub use error::{Error, Result};
pub use index::RangeIndex;
pub use locations::{LocationTable, UNKNOWN};
pub use metadata::DbMetadata;
pub use prefix::{NetworkPrefix, RangeEntry};
pub use session::{GeoSession, Resolution};
