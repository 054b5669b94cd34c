//! End-to-end tests: bundled archive to extracted CSVs to a serving
//! lookup session.

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use std::time::Duration;

use tempfile::tempdir;
use zip::write::FileOptions;

use iploc::{
    ingest, DatabaseManager, Edition, GeoSession, LocationTable, RangeEntry, RangeIndex, Settings,
};

const COUNTRY_BLOCKS: &str = "\
network,geoname_id,registered_country_geoname_id,represented_country_geoname_id
85.235.192.0/19,2921044,2921044,
167.114.238.0/24,3017382,3017382,
195.238.78.0/23,2963597,2963597,
";

const COUNTRY_LOCATIONS: &str = "\
geoname_id,locale_code,continent_code,continent_name,country_iso_code,country_name
2921044,en,EU,Europe,DE,Germany
2963597,en,EU,Europe,IE,Ireland
3017382,en,EU,Europe,FR,France
";

const CITY_BLOCKS: &str = "\
network,geoname_id,registered_country_geoname_id,represented_country_geoname_id
167.114.238.0/25,2988507,3017382,
";

const CITY_LOCATIONS: &str = "\
geoname_id,locale_code,continent_code,continent_name,country_iso_code,country_name,subdivision_1_iso_code,subdivision_1_name,subdivision_2_iso_code,subdivision_2_name,city_name,metro_code,time_zone
2988507,en,EU,Europe,FR,France,IDF,Île-de-France,75,Paris,Paris,,Europe/Paris
";

/// Build a GeoLite2-style zip archive with the CSV members nested
/// under a dated directory.
fn build_edition_zip(edition: Edition, blocks: &str, locations: &str) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default();

    writer
        .start_file(
            format!("{}_20250801/{}", edition.edition_id(), edition.blocks_file()),
            options,
        )
        .unwrap();
    writer.write_all(blocks.as_bytes()).unwrap();

    writer
        .start_file(
            format!(
                "{}_20250801/{}",
                edition.edition_id(),
                edition.locations_file()
            ),
            options,
        )
        .unwrap();
    writer.write_all(locations.as_bytes()).unwrap();

    writer.finish().unwrap().into_inner()
}

fn write_assets(assets_dir: &Path) {
    fs::create_dir_all(assets_dir).unwrap();
    fs::write(
        assets_dir.join(format!("{}.zip", Edition::Country.edition_id())),
        build_edition_zip(Edition::Country, COUNTRY_BLOCKS, COUNTRY_LOCATIONS),
    )
    .unwrap();
    fs::write(
        assets_dir.join(format!("{}.zip", Edition::City.edition_id())),
        build_edition_zip(Edition::City, CITY_BLOCKS, CITY_LOCATIONS),
    )
    .unwrap();
}

fn build_session(settings: &Settings) -> GeoSession {
    let manager = DatabaseManager::new(settings);

    let (country_index, country_names) =
        ingest::load_edition(&manager.ensure(Edition::Country).unwrap(), Edition::Country).unwrap();
    let (city_index, city_names) =
        ingest::load_edition(&manager.ensure(Edition::City).unwrap(), Edition::City).unwrap();

    GeoSession::new(country_index, country_names, city_index, city_names)
}

#[test]
fn test_end_to_end_from_bundled_archives() {
    let cache = tempdir().unwrap();
    let assets = tempdir().unwrap();
    write_assets(assets.path());

    let settings = Settings {
        cache_dir: cache.path().to_path_buf(),
        assets_dir: assets.path().to_path_buf(),
        license_key: None,
        update_interval: Duration::from_secs(86400),
    };

    let session = build_session(&settings);

    // Full hit: country and city.
    let resolution = session.resolve_str("167.114.238.22").unwrap();
    assert_eq!(resolution.country.as_deref(), Some("France"));
    assert_eq!(resolution.city.as_deref(), Some("Paris"));
    assert_eq!(
        resolution.to_string(),
        "country : France\ncity    : Paris"
    );

    // Country hit, city miss.
    let resolution = session.resolve_str("85.235.200.1").unwrap();
    assert_eq!(resolution.country.as_deref(), Some("Germany"));
    assert_eq!(resolution.city_display(), "Unknown");

    // Complete miss.
    let resolution = session.resolve_str("167.114.239.22").unwrap();
    assert_eq!(resolution.country_display(), "Unknown");
    assert_eq!(resolution.city_display(), "Unknown");

    // Invalid queries are rejected without tearing anything down.
    assert!(session.resolve_str("not-an-ip").is_err());
    assert!(session.resolve_str("167.114.238.22").is_ok());
}

#[test]
fn test_second_run_uses_cache() {
    let cache = tempdir().unwrap();
    let assets = tempdir().unwrap();
    write_assets(assets.path());

    let settings = Settings {
        cache_dir: cache.path().to_path_buf(),
        assets_dir: assets.path().to_path_buf(),
        license_key: None,
        update_interval: Duration::from_secs(86400),
    };

    build_session(&settings);

    // Remove the assets; the extracted cache must carry the second run.
    fs::remove_dir_all(assets.path()).unwrap();
    fs::create_dir_all(assets.path()).unwrap();

    let session = build_session(&settings);
    let resolution = session.resolve_str("195.238.79.1").unwrap();
    assert_eq!(resolution.country.as_deref(), Some("Ireland"));
}

#[test]
fn test_in_memory_session_scenarios() {
    // Straight against the public API, no files involved.
    let country_index = RangeIndex::from_entries(vec![
        RangeEntry::from_cidr("167.114.238.0/24", "A").unwrap(),
        RangeEntry::from_cidr("195.238.78.0/23", "B").unwrap(),
        RangeEntry::from_cidr("85.235.192.0/19", "C").unwrap(),
    ]);
    let country_names = LocationTable::from_pairs([
        ("A".to_string(), "France".to_string()),
        ("B".to_string(), "Ireland".to_string()),
        ("C".to_string(), "Germany".to_string()),
    ]);

    let session = GeoSession::new(
        country_index,
        country_names,
        RangeIndex::default(),
        LocationTable::default(),
    );

    assert_eq!(
        session
            .resolve_str("167.114.238.22")
            .unwrap()
            .country
            .as_deref(),
        Some("France")
    );
    assert_eq!(session.resolve_str("167.114.239.22").unwrap().country, None);

    // Empty indexes answer Unknown for everything.
    let empty = GeoSession::new(
        RangeIndex::default(),
        LocationTable::default(),
        RangeIndex::default(),
        LocationTable::default(),
    );
    let resolution = empty.resolve_str("8.8.8.8").unwrap();
    assert_eq!(resolution.country_display(), "Unknown");
    assert_eq!(resolution.city_display(), "Unknown");
}

#[test]
fn test_concurrent_lookups_share_the_session() {
    let assets = tempdir().unwrap();
    let cache = tempdir().unwrap();
    write_assets(assets.path());

    let settings = Settings {
        cache_dir: cache.path().to_path_buf(),
        assets_dir: assets.path().to_path_buf(),
        license_key: None,
        update_interval: Duration::from_secs(86400),
    };

    let session = std::sync::Arc::new(build_session(&settings));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let session = session.clone();
            std::thread::spawn(move || {
                for _ in 0..100 {
                    let resolution = session.resolve_str("167.114.238.22").unwrap();
                    assert_eq!(resolution.country.as_deref(), Some("France"));
                    assert!(session.resolve_str("1.2.3.4").unwrap().country.is_none());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
