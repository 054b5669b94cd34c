//! Process-level lookup session owning the built indexes and tables.

use serde::Serialize;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};

use crate::error::{Error, Result};
use crate::index::RangeIndex;
use crate::locations::{LocationTable, UNKNOWN};

/// The outcome of resolving one address.
///
/// A `None` field means no stored range covered the address, or the
/// matched code had no display name; rendering substitutes `"Unknown"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub country: Option<String>,
    pub city: Option<String>,
}

impl Resolution {
    /// Country display text, with the Unknown placeholder on a miss.
    pub fn country_display(&self) -> &str {
        self.country.as_deref().unwrap_or(UNKNOWN)
    }

    /// City display text, with the Unknown placeholder on a miss.
    pub fn city_display(&self) -> &str {
        self.city.as_deref().unwrap_or(UNKNOWN)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "country : {}\ncity    : {}",
            self.country_display(),
            self.city_display()
        )
    }
}

/// A lookup session holding the country and city range indexes together
/// with their display-name tables.
///
/// Built once at startup and read-only afterwards. All data is owned and
/// immutable, so a shared reference can serve lookups from any number of
/// threads without locking.
pub struct GeoSession {
    country_index: RangeIndex,
    country_names: LocationTable,
    city_index: RangeIndex,
    city_names: LocationTable,
}

impl GeoSession {
    /// Assemble a session from built indexes and tables.
    pub fn new(
        country_index: RangeIndex,
        country_names: LocationTable,
        city_index: RangeIndex,
        city_names: LocationTable,
    ) -> Self {
        Self {
            country_index,
            country_names,
            city_index,
            city_names,
        }
    }

    /// Resolve an IPv4 address to country and city display names.
    ///
    /// The two lookups are independent; an address can have a country
    /// but no city, or neither.
    pub fn resolve(&self, ip: Ipv4Addr) -> Resolution {
        let country = self
            .country_index
            .lookup(ip)
            .and_then(|code| self.country_names.get(code))
            .map(str::to_owned);
        let city = self
            .city_index
            .lookup(ip)
            .and_then(|code| self.city_names.get(code))
            .map(str::to_owned);

        Resolution { country, city }
    }

    /// Query boundary: parse a textual address and resolve it.
    ///
    /// IPv6-mapped IPv4 addresses (`::ffff:1.2.3.4`) are reduced to
    /// their 4-byte form. Anything else that is not IPv4 is rejected
    /// with [`Error::InvalidAddress`]; a rejected query leaves the
    /// session untouched.
    pub fn resolve_str(&self, input: &str) -> Result<Resolution> {
        let input = input.trim();
        let addr: IpAddr = input
            .parse()
            .map_err(|_| Error::InvalidAddress(input.to_string()))?;
        let v4 = match addr {
            IpAddr::V4(v4) => v4,
            IpAddr::V6(v6) => v6
                .to_ipv4_mapped()
                .ok_or_else(|| Error::InvalidAddress(input.to_string()))?,
        };
        Ok(self.resolve(v4))
    }

    /// The country range index.
    pub fn country_index(&self) -> &RangeIndex {
        &self.country_index
    }

    /// The city range index.
    pub fn city_index(&self) -> &RangeIndex {
        &self.city_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefix::RangeEntry;

    fn test_session() -> GeoSession {
        let country_index = RangeIndex::from_entries(vec![
            RangeEntry::from_cidr("167.114.238.0/24", "3017382").unwrap(),
        ]);
        let country_names =
            LocationTable::from_pairs([("3017382".to_string(), "France".to_string())]);

        let city_index = RangeIndex::from_entries(vec![
            RangeEntry::from_cidr("167.114.238.0/25", "2988507").unwrap(),
        ]);
        let city_names =
            LocationTable::from_pairs([("2988507".to_string(), "Paris".to_string())]);

        GeoSession::new(country_index, country_names, city_index, city_names)
    }

    #[test]
    fn test_resolve_hit() {
        let session = test_session();
        let resolution = session.resolve_str("167.114.238.22").unwrap();

        assert_eq!(resolution.country.as_deref(), Some("France"));
        assert_eq!(resolution.city.as_deref(), Some("Paris"));
    }

    #[test]
    fn test_resolve_partial_hit() {
        let session = test_session();
        // Inside the country /24 but outside the city /25.
        let resolution = session.resolve_str("167.114.238.200").unwrap();

        assert_eq!(resolution.country.as_deref(), Some("France"));
        assert_eq!(resolution.city, None);
        assert_eq!(resolution.city_display(), UNKNOWN);
    }

    #[test]
    fn test_resolve_miss() {
        let session = test_session();
        let resolution = session.resolve_str("8.8.8.8").unwrap();

        assert_eq!(resolution.country, None);
        assert_eq!(resolution.city, None);
        assert_eq!(resolution.country_display(), UNKNOWN);
    }

    #[test]
    fn test_resolve_ipv6_mapped() {
        let session = test_session();
        let resolution = session.resolve_str("::ffff:167.114.238.22").unwrap();

        assert_eq!(resolution.country.as_deref(), Some("France"));
    }

    #[test]
    fn test_resolve_rejects_bad_input() {
        let session = test_session();

        assert!(matches!(
            session.resolve_str("not-an-ip"),
            Err(Error::InvalidAddress(_))
        ));
        assert!(matches!(
            session.resolve_str("2001:db8::1"),
            Err(Error::InvalidAddress(_))
        ));
        assert!(matches!(
            session.resolve_str(""),
            Err(Error::InvalidAddress(_))
        ));
        // The session still answers after rejected queries.
        assert!(session.resolve_str("167.114.238.22").is_ok());
    }

    #[test]
    fn test_display_format() {
        let session = test_session();
        let resolution = session.resolve_str("167.114.238.22").unwrap();

        assert_eq!(
            resolution.to_string(),
            "country : France\ncity    : Paris"
        );
    }

    #[test]
    fn test_session_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GeoSession>();
    }
}
