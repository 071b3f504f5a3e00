//! Query keys: the cache-key paths that identify cached reads.
//!
//! A [`QueryKey`] is an ordered sequence of [`KeySegment`]s, each either a
//! string or an integer. Keys serialize as plain JSON/TOML arrays so they can
//! be written directly in settings files:
//!
//! ```text
//! ["services"]            every public services query
//! ["services", 3]         a single service
//! ["admin", "services"]   the admin panel's services list
//! ```
//!
//! # Matching
//!
//! Invalidation uses prefix matching: a path matches every stored key that
//! starts with the same segments. Segments compare by type as well as value,
//! so `"1"` and `1` are different segments.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One segment of a [`QueryKey`].
///
/// # Serialization
///
/// Untagged: integers serialize as JSON numbers, strings as JSON strings.
///
/// # Examples
///
/// ```
/// use pact_mutation::KeySegment;
///
/// assert_eq!(KeySegment::from("news"), KeySegment::Str("news".to_string()));
/// assert_eq!(KeySegment::from(7), KeySegment::Num(7));
/// assert_ne!(KeySegment::from("7"), KeySegment::from(7));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeySegment {
    /// Integer segment, typically a record id.
    Num(i64),
    /// String segment, typically a collection or scope name.
    Str(String),
}

impl fmt::Display for KeySegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<&str> for KeySegment {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for KeySegment {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for KeySegment {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<i64> for KeySegment {
    fn from(value: i64) -> Self {
        Self::Num(value)
    }
}

impl From<i32> for KeySegment {
    fn from(value: i32) -> Self {
        Self::Num(i64::from(value))
    }
}

impl From<u32> for KeySegment {
    fn from(value: u32) -> Self {
        Self::Num(i64::from(value))
    }
}

/// An ordered cache-key path.
///
/// # Examples
///
/// ```
/// use pact_mutation::{query_key, QueryKey};
///
/// let list = QueryKey::from(["services"]);
/// let item = query_key!["services", 3];
///
/// assert!(list.is_prefix_of(&item));
/// assert!(!item.is_prefix_of(&list));
/// assert_eq!(item.to_string(), r#"["services", 3]"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryKey(Vec<KeySegment>);

impl QueryKey {
    /// Creates an empty key. Empty keys are rejected as invalidation paths.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Returns this key extended by one segment.
    #[must_use]
    pub fn with(mut self, segment: impl Into<KeySegment>) -> Self {
        self.0.push(segment.into());
        self
    }

    /// Appends a segment in place.
    pub fn push(&mut self, segment: impl Into<KeySegment>) {
        self.0.push(segment.into());
    }

    /// The key's segments in order.
    pub fn segments(&self) -> &[KeySegment] {
        &self.0
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the key has no segments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if every segment of `self` equals the corresponding
    /// leading segment of `other`.
    ///
    /// A key is a prefix of itself. The empty key is a prefix of every key.
    pub fn is_prefix_of(&self, other: &QueryKey) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{segment}")?;
        }
        f.write_str("]")
    }
}

impl From<Vec<KeySegment>> for QueryKey {
    fn from(segments: Vec<KeySegment>) -> Self {
        Self(segments)
    }
}

impl<S: Into<KeySegment>, const N: usize> From<[S; N]> for QueryKey {
    fn from(segments: [S; N]) -> Self {
        segments.into_iter().collect()
    }
}

impl<S: Into<KeySegment>> FromIterator<S> for QueryKey {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Builds a [`QueryKey`] from mixed string and integer segments.
///
/// ```
/// use pact_mutation::{query_key, KeySegment};
///
/// let key = query_key!["admin", "news", 12];
/// assert_eq!(key.len(), 3);
/// assert_eq!(key.segments()[2], KeySegment::Num(12));
/// ```
#[macro_export]
macro_rules! query_key {
    ($($segment:expr),* $(,)?) => {
        $crate::QueryKey::from(vec![$($crate::KeySegment::from($segment)),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prefix_matching_is_segment_wise() {
        let services = QueryKey::from(["services"]);
        assert!(services.is_prefix_of(&query_key!["services", 3]));
        assert!(services.is_prefix_of(&services));
        assert!(!services.is_prefix_of(&QueryKey::from(["service_categories"])));
        assert!(!query_key!["services", 3].is_prefix_of(&query_key!["services", 4]));
    }

    #[test]
    fn string_and_number_segments_differ() {
        assert!(!query_key!["news", "1"].is_prefix_of(&query_key!["news", 1]));
    }

    #[test]
    fn serializes_as_plain_array() {
        let key = query_key!["services", 3];
        let json = serde_json::to_value(&key).unwrap();
        assert_eq!(json, json!(["services", 3]));

        let back: QueryKey = serde_json::from_value(json!(["admin", "news", 12])).unwrap();
        assert_eq!(back, query_key!["admin", "news", 12]);
    }

    #[test]
    fn builder_appends_segments() {
        let mut key = QueryKey::new().with("projects");
        key.push(5);
        assert_eq!(key, query_key!["projects", 5]);
        assert!(!key.is_empty());
    }
}
