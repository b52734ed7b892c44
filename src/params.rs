//! Parameter maps attached to schedule lines.
//!
//! A schedule line may carry `key=value` assignments after its five time
//! fields. At firing time those explicit assignments are merged over the
//! owner's statically configured defaults with [`merge`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Named string parameters in insertion order.
///
/// Insertion order is preserved so iteration is deterministic, but order
/// carries no meaning for matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterMap {
    values: IndexMap<String, String>,
}

impl ParameterMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter. An existing key keeps its position but takes
    /// the new value (last occurrence wins).
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(key.into(), value.into())
    }

    /// Look up a parameter value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Whether a parameter with this name exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for ParameterMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<const N: usize> From<[(&str, &str); N]> for ParameterMap {
    fn from(pairs: [(&str, &str); N]) -> Self {
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

/// Merge a matched line's explicit parameters over the owner's defaults.
///
/// An explicit value overrides a same-named default; explicit keys with no
/// corresponding default become new ad hoc parameters; all other defaults
/// pass through unchanged.
pub fn merge(defaults: &ParameterMap, explicit: &ParameterMap) -> ParameterMap {
    let mut merged = defaults.clone();
    for (key, value) in explicit.iter() {
        merged.insert(key, value);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_last_wins() {
        let mut params = ParameterMap::new();
        assert_eq!(params.insert("COLOR", "red"), None);
        assert_eq!(params.insert("COLOR", "green"), Some("red".to_string()));

        assert_eq!(params.len(), 1);
        assert_eq!(params.get("COLOR"), Some("green"));
    }

    #[test]
    fn test_iteration_order_is_insertion_order() {
        let mut params = ParameterMap::new();
        params.insert("b", "2");
        params.insert("a", "1");
        params.insert("c", "3");

        let keys: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_merge_override_and_passthrough() {
        let defaults = ParameterMap::from([("ENV", "staging"), ("RETRIES", "3")]);
        let explicit = ParameterMap::from([("ENV", "production"), ("TOKEN", "abc")]);

        let merged = merge(&defaults, &explicit);

        // Explicit overrides the same-named default.
        assert_eq!(merged.get("ENV"), Some("production"));
        // Untouched defaults pass through.
        assert_eq!(merged.get("RETRIES"), Some("3"));
        // Explicit keys without a default become ad hoc parameters.
        assert_eq!(merged.get("TOKEN"), Some("abc"));
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn test_merge_empty_sides() {
        let defaults = ParameterMap::from([("A", "1")]);
        let explicit = ParameterMap::new();
        assert_eq!(merge(&defaults, &explicit), defaults);
        assert_eq!(merge(&ParameterMap::new(), &defaults), defaults);
    }
}
