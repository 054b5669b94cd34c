//! GeoLite2 database editions.

use std::fmt;

/// The two GeoLite2 CSV editions the resolver consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edition {
    /// Country-level ranges and names
    Country,
    /// City-level ranges and names
    City,
}

impl Edition {
    /// Both editions, in load order.
    pub const ALL: [Edition; 2] = [Edition::Country, Edition::City];

    /// Short name as it appears in MaxMind file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Edition::Country => "Country",
            Edition::City => "City",
        }
    }

    /// MaxMind edition identifier for the CSV download.
    pub fn edition_id(&self) -> &'static str {
        match self {
            Edition::Country => "GeoLite2-Country-CSV",
            Edition::City => "GeoLite2-City-CSV",
        }
    }

    /// File name of the IPv4 blocks member inside the archive.
    pub fn blocks_file(&self) -> &'static str {
        match self {
            Edition::Country => "GeoLite2-Country-Blocks-IPv4.csv",
            Edition::City => "GeoLite2-City-Blocks-IPv4.csv",
        }
    }

    /// File name of the English locations member inside the archive.
    pub fn locations_file(&self) -> &'static str {
        match self {
            Edition::Country => "GeoLite2-Country-Locations-en.csv",
            Edition::City => "GeoLite2-City-Locations-en.csv",
        }
    }

    /// Column of the display name in the locations file: country_name
    /// for the Country edition, city_name for the City edition.
    pub fn name_column(&self) -> usize {
        match self {
            Edition::Country => 5,
            Edition::City => 10,
        }
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
