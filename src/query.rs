//! Search option normalization and query-string serialization.
//!
//! The subtitles endpoint matches option values case-insensitively only when
//! they arrive lower-cased, and redirects mixed-case requests. Options are
//! therefore lower-cased before serialization. Insertion order is preserved
//! so identical option sets always produce identical URLs.

use std::fmt;

/// Ordered option map for the `/subtitles` endpoint.
///
/// Setting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    entries: Vec<(String, String)>,
}

impl SearchOptions {
    /// Creates an empty option set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, keeping the original position of an existing key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    /// Builder form of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Returns the value stored for exactly `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Number of options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no options are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates options in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns a copy with every key and value lower-cased.
    ///
    /// Keys that collide after lower-casing keep the first position and the
    /// last value. Normalizing twice equals normalizing once.
    #[must_use]
    pub fn normalize(&self) -> Self {
        let mut normalized = Self::new();
        for (key, value) in &self.entries {
            normalized.set(key.to_lowercase(), value.to_lowercase());
        }
        normalized
    }

    /// Serializes to `k=v&k=v` with percent-encoded keys and values.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Appends the query string to `path`, omitting `?` when there are no options.
    #[must_use]
    pub fn apply_to(&self, path: &str) -> String {
        if self.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{}", self.to_query_string())
        }
    }
}

impl fmt::Display for SearchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

impl<K, V> FromIterator<(K, V)> for SearchOptions
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut options = Self::new();
        for (key, value) in iter {
            options.set(key, value);
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_overwrites_in_place() {
        let mut options = SearchOptions::new();
        options.set("query", "a").set("languages", "en").set("query", "b");
        assert_eq!(
            options.iter().collect::<Vec<_>>(),
            vec![("query", "b"), ("languages", "en")]
        );
    }

    #[test]
    fn test_normalize_lowercases_keys_and_values() {
        let options = SearchOptions::new()
            .with("IMDB_ID", "TT0133093")
            .with("Languages", "EN,De");
        let normalized = options.normalize();
        assert_eq!(normalized.get("imdb_id"), Some("tt0133093"));
        assert_eq!(normalized.get("languages"), Some("en,de"));
        assert_eq!(options.get("IMDB_ID"), Some("TT0133093"), "input untouched");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            SearchOptions::new(),
            SearchOptions::new().with("Query", "The Matrix"),
            SearchOptions::new()
                .with("A", "X")
                .with("a", "y")
                .with("Ünïcode", "ÄÖ"),
        ];
        for options in samples {
            let once = options.normalize();
            assert_eq!(once.normalize(), once);
        }
    }

    #[test]
    fn test_normalize_collision_keeps_first_position_last_value() {
        let options = SearchOptions::new()
            .with("Query", "One")
            .with("page", "2")
            .with("QUERY", "Two");
        let normalized = options.normalize();
        assert_eq!(
            normalized.iter().collect::<Vec<_>>(),
            vec![("query", "two"), ("page", "2")]
        );
    }

    #[test]
    fn test_query_string_percent_encodes() {
        let options = SearchOptions::new()
            .with("query", "the matrix & co")
            .with("languages", "en,de");
        assert_eq!(
            options.to_query_string(),
            "query=the%20matrix%20%26%20co&languages=en%2Cde"
        );
    }

    #[test]
    fn test_query_string_is_stable_across_calls() {
        let options: SearchOptions = [("b", "2"), ("a", "1")].into_iter().collect();
        assert_eq!(options.to_query_string(), "b=2&a=1");
        assert_eq!(options.to_query_string(), options.to_string());
    }

    #[test]
    fn test_apply_to_without_options() {
        assert_eq!(SearchOptions::new().apply_to("/subtitles"), "/subtitles");
        assert_eq!(
            SearchOptions::new().with("page", "2").apply_to("/subtitles"),
            "/subtitles?page=2"
        );
    }
}
