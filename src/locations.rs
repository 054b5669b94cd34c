//! Location code to display-name resolution.

use ahash::AHashMap;

/// Display text substituted when a code is unknown or absent.
pub const UNKNOWN: &str = "Unknown";

/// A mapping from location codes to human-readable display names.
///
/// Built independently of the range indexes; the two are joined only at
/// query time via the shared location code.
#[derive(Debug, Clone, Default)]
pub struct LocationTable {
    names: AHashMap<String, String>,
}

impl LocationTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from (code, name) pairs. The last name wins on
    /// duplicate codes.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            names: pairs.into_iter().collect(),
        }
    }

    /// Insert a (code, name) pair, replacing any previous name.
    pub fn insert(&mut self, code: impl Into<String>, name: impl Into<String>) {
        self.names.insert(code.into(), name.into());
    }

    /// Number of codes in the table.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the table holds no names.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Raw lookup of a code.
    pub fn get(&self, code: &str) -> Option<&str> {
        self.names.get(code).map(String::as_str)
    }

    /// Resolve a lookup result to display text, substituting [`UNKNOWN`]
    /// when the code is absent at either stage.
    pub fn resolve(&self, code: Option<&str>) -> &str {
        code.and_then(|c| self.get(c)).unwrap_or(UNKNOWN)
    }
}
