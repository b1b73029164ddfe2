//! Airline enrichment: resolve operator name from callsign prefix.

use std::collections::HashMap;

/// Name used when a callsign is missing or its prefix is not in the table.
pub const UNKNOWN_AIRLINE: &str = "Unknown";

/// Callsign characters used for the airline lookup.
pub const AIRLINE_PREFIX_LEN: usize = 3;

/// Airline ICAO prefixes → operator name.
const DEFAULT_AIRLINES: &[(&str, &str)] = &[
    ("SWA", "Southwest Airlines"),
    ("DAL", "Delta Air Lines"),
    ("AAL", "American Airlines"),
    ("JBU", "JetBlue"),
    ("JSX", "JSX"),
];

/// Immutable prefix → airline lookup, handed to the matcher at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct AirlineTable {
    entries: HashMap<String, String>,
}

impl AirlineTable {
    /// Build from `(prefix, name)` pairs. Prefixes are stored upper-case.
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        AirlineTable {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.as_ref().trim().to_ascii_uppercase(), v.into()))
                .collect(),
        }
    }

    /// Copy of this table with extra entries layered on top.
    pub fn with_overrides<I, K, V>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut entries = self.entries.clone();
        entries.extend(AirlineTable::new(extra).entries);
        AirlineTable { entries }
    }

    /// Look up operator name from callsign prefix.
    ///
    /// The callsign is trimmed, its first three characters upper-cased.
    pub fn lookup(&self, callsign: &str) -> Option<&str> {
        let prefix: String = callsign
            .trim()
            .chars()
            .take(AIRLINE_PREFIX_LEN)
            .collect::<String>()
            .to_uppercase();
        if prefix.is_empty() {
            return None;
        }
        self.entries.get(&prefix).map(String::as_str)
    }

    /// Operator name, or [`UNKNOWN_AIRLINE`].
    pub fn resolve(&self, callsign: Option<&str>) -> String {
        callsign
            .and_then(|cs| self.lookup(cs))
            .unwrap_or(UNKNOWN_AIRLINE)
            .to_string()
    }

    /// Entries sorted by prefix.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut out: Vec<_> = self
            .entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        out.sort();
        out
    }
}

impl Default for AirlineTable {
    fn default() -> Self {
        AirlineTable::new(DEFAULT_AIRLINES.iter().copied())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known() {
        let table = AirlineTable::default();
        assert_eq!(table.lookup("AAL123"), Some("American Airlines"));
        assert_eq!(table.lookup("DAL456"), Some("Delta Air Lines"));
        assert_eq!(table.lookup("JSX12"), Some("JSX"));
    }

    #[test]
    fn test_resolve_lowercase_and_padding() {
        let table = AirlineTable::default();
        assert_eq!(table.resolve(Some("swa123")), "Southwest Airlines");
        assert_eq!(table.resolve(Some("  jbu9 ")), "JetBlue");
    }

    #[test]
    fn test_resolve_unknown() {
        let table = AirlineTable::default();
        assert_eq!(table.resolve(None), "Unknown");
        assert_eq!(table.resolve(Some("")), "Unknown");
        assert_eq!(table.resolve(Some("   ")), "Unknown");
        assert_eq!(table.resolve(Some("xyz999")), "Unknown");
        assert_eq!(table.resolve(Some("SW")), "Unknown");
    }

    #[test]
    fn test_substituted_table() {
        let table = AirlineTable::new([("ual", "United Airlines")]);
        assert_eq!(table.resolve(Some("UAL1")), "United Airlines");
        assert_eq!(table.resolve(Some("SWA1")), "Unknown");
        assert_eq!(table.entries(), vec![("UAL", "United Airlines")]);
    }

    #[test]
    fn test_overrides() {
        let table = AirlineTable::default().with_overrides([("SWA", "Southwest"), ("NKS", "Spirit")]);
        assert_eq!(table.resolve(Some("SWA1")), "Southwest");
        assert_eq!(table.resolve(Some("NKS1")), "Spirit");
        assert_eq!(table.entries().len(), 6);
        assert_eq!(table.entries()[0], ("AAL", "American Airlines"));
    }
}
