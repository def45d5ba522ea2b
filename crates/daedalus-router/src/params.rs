//! Captured placeholder bindings.
//!
//! A successful match yields one binding per placeholder, stored as
//! (name, value) pairs in pattern left-to-right order. Small-vector storage
//! keeps the common 1-4 binding case off the heap.

use smallvec::SmallVec;

/// Maximum number of bindings stored inline (stack allocated).
const INLINE_PARAMS: usize = 4;

/// Placeholder bindings produced by a route match.
///
/// Insertion order is pattern order, which is also the order handlers
/// receive their positional arguments in.
///
/// # Example
///
/// ```
/// use daedalus_router::Params;
///
/// let mut params = Params::new();
/// params.push("org", "acme");
/// params.push("user", "123");
///
/// assert_eq!(params.get("org"), Some("acme"));
/// assert_eq!(params.values().collect::<Vec<_>>(), ["acme", "123"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    inner: SmallVec<[(String, String); INLINE_PARAMS]>,
}

impl Params {
    /// Creates an empty binding set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a binding set with the given capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: SmallVec::with_capacity(capacity),
        }
    }

    /// Appends a binding.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.push((name.into(), value.into()));
    }

    /// Returns the value bound to `name`, or `None`.
    ///
    /// Names are unique per pattern; if a caller registers a pattern that
    /// repeats a name, the first binding wins.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if there are no bindings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Iterates over (name, value) pairs in pattern order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Iterates over the bound values in pattern order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.inner.iter().map(|(_, v)| v.as_str())
    }

    /// Iterates over the placeholder names in pattern order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.iter().map(|(n, _)| n.as_str())
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a str, &'a str);
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, (String, String)>,
        fn(&'a (String, String)) -> (&'a str, &'a str),
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_get() {
        let mut params = Params::new();
        params.push("id", "42");
        params.push("slug", "intro");

        assert_eq!(params.get("id"), Some("42"));
        assert_eq!(params.get("slug"), Some("intro"));
        assert_eq!(params.get("missing"), None);
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut params = Params::new();
        params.push("b", "2");
        params.push("a", "1");
        params.push("c", "3");

        let names: Vec<_> = params.names().collect();
        assert_eq!(names, ["b", "a", "c"]);
        let values: Vec<_> = params.values().collect();
        assert_eq!(values, ["2", "1", "3"]);
    }

    #[test]
    fn test_duplicate_name_first_wins() {
        let mut params = Params::new();
        params.push("id", "first");
        params.push("id", "second");
        assert_eq!(params.get("id"), Some("first"));
    }

    #[test]
    fn test_from_iterator() {
        let params: Params = vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
        ]
        .into_iter()
        .collect();

        assert_eq!(params.len(), 2);
        assert_eq!(params.get("b"), Some("2"));
    }

    #[test]
    fn test_spills_past_inline_capacity() {
        let mut params = Params::new();
        for i in 0..10 {
            params.push(format!("key{i}"), format!("value{i}"));
        }
        assert_eq!(params.len(), 10);
        assert_eq!(params.get("key7"), Some("value7"));
    }
}
