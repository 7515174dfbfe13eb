use indexmap::IndexMap;

/// Dotted name or alias key -> fully qualified object path.
pub type AliasMap = IndexMap<String, Vec<String>>;

/// Canonical case-insensitive identity of a dotted path.
pub struct NameKey;

impl NameKey {
    pub fn of(name: &[String]) -> String {
        Self::of_prefix(name, name.len())
    }

    /// Key of the first `length` segments.
    pub fn of_prefix(name: &[String], length: usize) -> String {
        name.iter()
            .take(length)
            .map(|segment| segment.to_lowercase())
            .collect::<Vec<_>>()
            .join(".")
    }

    pub fn equals(left: &[String], right: &[String]) -> bool {
        left.len() == right.len() && Self::starts_with(left, right)
    }

    pub fn starts_with(name: &[String], prefix: &[String]) -> bool {
        name.len() >= prefix.len() && name.iter()
            .zip(prefix)
            .all(|(segment, expected)| segment.to_lowercase() == expected.to_lowercase())
    }
}
