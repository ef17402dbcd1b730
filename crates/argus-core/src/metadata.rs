//! Call metadata.
//!
//! [`Metadata`] is the key/value side channel attached to every call, the RPC
//! analogue of HTTP headers. Keys are matched ignoring ASCII case, so
//! `Authorization`, `authorization` and `authoRiZaTion` all address the same
//! field. A key may carry several values; lookups return the first one.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Metadata key carrying the caller's credentials.
pub const AUTHORIZATION: &str = "authorization";

/// Ordered, multi-valued, case-insensitive metadata map.
///
/// Entries keep the key spelling they were added with; only lookups ignore
/// case.
///
/// # Example
///
/// ```
/// use argus_core::Metadata;
///
/// let mut metadata = Metadata::new();
/// metadata.append("Authorization", "Bearer 1111");
///
/// assert_eq!(metadata.get("authorization"), Some("Bearer 1111"));
/// assert_eq!(metadata.get("AUTHORIZATION"), Some("Bearer 1111"));
/// assert!(metadata.get("foo").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "IndexMap<String, String>",
    into = "IndexMap<String, String>"
)]
pub struct Metadata {
    entries: Vec<(String, String)>,
}

impl Metadata {
    /// Creates an empty metadata map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the first value stored under `key`, ignoring key case.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Returns every value stored under `key`, in insertion order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if at least one value is stored under `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Adds a value, keeping any values already stored under the same key.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Sets `key` to a single value, replacing all existing values.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.entries.retain(|(k, _)| !k.eq_ignore_ascii_case(&key));
        self.entries.push((key, value.into()));
    }

    /// Removes every value stored under `key`, returning the first one.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let mut removed = None;
        self.entries.retain_mut(|(k, v)| {
            if k.eq_ignore_ascii_case(key) {
                if removed.is_none() {
                    removed = Some(std::mem::take(v));
                }
                false
            } else {
                true
            }
        });
        removed
    }

    /// Iterates over all `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no values are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Metadata
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut metadata = Self::new();
        for (key, value) in iter {
            metadata.append(key, value);
        }
        metadata
    }
}

impl From<IndexMap<String, String>> for Metadata {
    fn from(map: IndexMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

// Serialized as a plain string map: the first value per key wins.
impl From<Metadata> for IndexMap<String, String> {
    fn from(metadata: Metadata) -> Self {
        let mut map = IndexMap::with_capacity(metadata.len());
        for (key, value) in metadata.entries {
            let key = key.to_ascii_lowercase();
            map.entry(key).or_insert(value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_ignores_key_case() {
        let mut metadata = Metadata::new();
        metadata.append("authoRiZaTion", "bEArer 1111");

        assert_eq!(metadata.get(AUTHORIZATION), Some("bEArer 1111"));
        assert_eq!(metadata.get("Authorization"), Some("bEArer 1111"));
        assert!(metadata.contains_key("AUTHORIZATION"));
    }

    #[test]
    fn test_get_returns_first_value() {
        let metadata: Metadata = [("x-tag", "a"), ("X-Tag", "b")].into_iter().collect();

        assert_eq!(metadata.get("x-tag"), Some("a"));
        assert_eq!(metadata.get_all("x-tag").collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(metadata.len(), 2);
    }

    #[test]
    fn test_insert_replaces_all_values() {
        let mut metadata = Metadata::new();
        metadata.append("foo", "1");
        metadata.append("FOO", "2");
        metadata.insert("Foo", "3");

        assert_eq!(metadata.get_all("foo").collect::<Vec<_>>(), vec!["3"]);
    }

    #[test]
    fn test_remove() {
        let mut metadata: Metadata = [("a", "1"), ("A", "2"), ("b", "3")].into_iter().collect();

        assert_eq!(metadata.remove("a"), Some("1".to_string()));
        assert!(!metadata.contains_key("a"));
        assert_eq!(metadata.remove("missing"), None);
        assert_eq!(metadata.iter().collect::<Vec<_>>(), vec![("b", "3")]);
    }

    #[test]
    fn test_empty_metadata() {
        let metadata = Metadata::new();
        assert!(metadata.is_empty());
        assert!(metadata.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_deserializes_from_string_map() {
        let metadata: Metadata =
            serde_json::from_str(r#"{"code": "INVALID_TOKEN", "retry": "no"}"#).unwrap();

        assert_eq!(metadata.get("code"), Some("INVALID_TOKEN"));
        assert_eq!(metadata.get("retry"), Some("no"));
    }

    #[test]
    fn test_serializes_first_value_per_key() {
        let metadata: Metadata = [("Code", "A"), ("code", "B")].into_iter().collect();
        let json = serde_json::to_value(&metadata).unwrap();

        assert_eq!(json, serde_json::json!({ "code": "A" }));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn get_matches_any_key_case(key in "[a-z][a-z0-9-]{0,15}", value in ".*", upper in any::<bool>()) {
                let stored = if upper { key.to_ascii_uppercase() } else { key.clone() };
                let mut metadata = Metadata::new();
                metadata.append(stored, value.clone());

                prop_assert_eq!(metadata.get(&key), Some(value.as_str()));
                prop_assert_eq!(metadata.get(&key.to_ascii_uppercase()), Some(value.as_str()));
            }

            #[test]
            fn insert_leaves_one_value(key in "[a-z]{1,8}", values in prop::collection::vec(".*", 1..5)) {
                let mut metadata = Metadata::new();
                for value in &values {
                    metadata.append(key.to_ascii_uppercase(), value.clone());
                }
                metadata.insert(key.clone(), "last");

                prop_assert_eq!(metadata.get_all(&key).count(), 1);
                prop_assert_eq!(metadata.get(&key), Some("last"));
            }
        }
    }
}
