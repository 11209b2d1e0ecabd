use indexmap::IndexMap;
use serde::Serialize;

/// Ordered property name to value mapping built from the selection query.
///
/// Iteration follows first insertion; re-inserting a key replaces the value
/// in place. A `None` value stands for a NULL value column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PropertyMapping {
    entries: IndexMap<String, Option<String>>,
}

impl PropertyMapping {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `name`, returning the previous value when present.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: Option<String>,
    ) -> Option<Option<String>> {
        self.entries.insert(name.into(), value)
    }

    /// `None` when the key is absent, `Some(None)` when its value is NULL.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.entries.get(name).map(Option::as_deref)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_deref()))
    }
}

impl<K: Into<String>> FromIterator<(K, Option<String>)> for PropertyMapping {
    fn from_iter<I: IntoIterator<Item = (K, Option<String>)>>(iter: I) -> Self {
        let mut mapping = PropertyMapping::new();
        for (k, v) in iter {
            mapping.insert(k, v);
        }
        mapping
    }
}

/// Pick the singular or plural noun for `count`.
#[must_use]
pub fn singular_plural<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 { singular } else { plural }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_keys_keep_first_position() {
        let mut m = PropertyMapping::new();
        m.insert("a", Some("1".into()));
        m.insert("b", Some("2".into()));
        m.insert("a", Some("3".into()));
        let items: Vec<_> = m.iter().collect();
        assert_eq!(items, vec![("a", Some("3")), ("b", Some("2"))]);
    }

    #[test]
    fn null_value_is_distinct_from_missing() {
        let mut m = PropertyMapping::new();
        m.insert("k", None);
        assert_eq!(m.get("k"), Some(None));
        assert_eq!(m.get("other"), None);
    }

    #[test]
    fn plural_wording() {
        assert_eq!(singular_plural(1, "property", "properties"), "property");
        assert_eq!(singular_plural(0, "property", "properties"), "properties");
        assert_eq!(singular_plural(7, "property", "properties"), "properties");
    }
}
