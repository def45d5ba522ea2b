//! Route pattern compilation.
//!
//! Patterns are plain path strings with named placeholders delimited by
//! colons: `/blog/:id:` matches `/blog/42` and binds `id = "42"`. A
//! placeholder matches one or more characters excluding the path separator;
//! every other byte of the pattern matches literally.
//!
//! Compilation is cached by exact pattern text, so routes sharing a pattern
//! share one compiled matcher for the lifetime of the compiler.

use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;

/// A compiled route pattern: an anchored matcher plus the ordered list of
/// placeholder names it binds.
///
/// # Example
///
/// ```
/// use daedalus_router::CompiledPattern;
///
/// let pattern = CompiledPattern::compile("/users/:id:/posts/:post:");
/// assert_eq!(pattern.placeholders(), ["id", "post"]);
///
/// let values = pattern.capture("/users/7/posts/hello").unwrap();
/// assert_eq!(values, ["7", "hello"]);
/// ```
#[derive(Debug)]
pub struct CompiledPattern {
    /// The raw pattern text this was compiled from.
    pattern: String,

    /// Anchored regex; one capture group per placeholder.
    regex: Regex,

    /// Placeholder names in pattern left-to-right order.
    placeholders: Vec<String>,
}

impl CompiledPattern {
    /// Compiles a pattern into an anchored matcher.
    ///
    /// A `:` that does not open a well-formed placeholder (`:name:` where
    /// `name` is an identifier) is matched literally, so static route tables
    /// containing stray colons keep working.
    #[must_use]
    pub fn compile(pattern: &str) -> Self {
        let (source, placeholders) = translate(pattern);
        let regex = Regex::new(&source).expect("escaped pattern is always a valid regex");
        debug_assert_eq!(regex.captures_len() - 1, placeholders.len());
        Self {
            pattern: pattern.to_string(),
            regex,
            placeholders,
        }
    }

    /// Returns the raw pattern text.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the placeholder names in pattern left-to-right order.
    #[must_use]
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Returns true if the whole path matches this pattern.
    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Applies the matcher to a path.
    ///
    /// On success, returns the captured placeholder values in pattern
    /// left-to-right order; the length always equals
    /// [`placeholders`](Self::placeholders)`.len()`.
    #[must_use]
    pub fn capture<'p>(&self, path: &'p str) -> Option<Vec<&'p str>> {
        let caps = self.regex.captures(path)?;
        let values: Vec<&str> = caps
            .iter()
            .skip(1)
            .map(|m| m.expect("all groups participate in a full match").as_str())
            .collect();
        debug_assert_eq!(values.len(), self.placeholders.len());
        Some(values)
    }
}

/// Translates a pattern into regex source plus its placeholder names.
fn translate(pattern: &str) -> (String, Vec<String>) {
    let mut source = String::with_capacity(pattern.len() + 8);
    source.push('^');
    let mut placeholders = Vec::new();
    let mut literal = String::new();
    let mut rest = pattern;

    while let Some(colon) = rest.find(':') {
        let (before, from_colon) = rest.split_at(colon);
        literal.push_str(before);
        match read_placeholder(from_colon) {
            Some((name, after)) => {
                source.push_str(&regex::escape(&literal));
                literal.clear();
                source.push_str("([^/]+)");
                placeholders.push(name.to_string());
                rest = after;
            }
            None => {
                // Literal colon, not a placeholder opener.
                literal.push(':');
                rest = &from_colon[1..];
            }
        }
    }
    literal.push_str(rest);
    source.push_str(&regex::escape(&literal));
    source.push('$');
    (source, placeholders)
}

/// Reads `:name:` from the head of `input` (which starts with `:`).
///
/// Returns the placeholder name and the remainder after the closing colon,
/// or `None` if the head is not a well-formed placeholder.
fn read_placeholder(input: &str) -> Option<(&str, &str)> {
    let body = &input[1..];
    let close = body.find(':')?;
    let name = &body[..close];
    if is_identifier(name) {
        Some((name, &body[close + 1..]))
    } else {
        None
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Compiles patterns and caches the result by exact pattern text.
///
/// Identical patterns compile once per compiler; every route sharing the
/// pattern receives the same [`Arc<CompiledPattern>`].
///
/// # Example
///
/// ```
/// use daedalus_router::PatternCompiler;
///
/// let mut compiler = PatternCompiler::new();
/// let a = compiler.compile("/blog/:id:");
/// let b = compiler.compile("/blog/:id:");
/// assert!(std::sync::Arc::ptr_eq(&a, &b));
/// ```
#[derive(Debug, Default)]
pub struct PatternCompiler {
    cache: HashMap<String, Arc<CompiledPattern>>,
}

impl PatternCompiler {
    /// Creates an empty compiler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles a pattern, reusing the cached matcher when the exact text
    /// was compiled before.
    pub fn compile(&mut self, pattern: &str) -> Arc<CompiledPattern> {
        if let Some(compiled) = self.cache.get(pattern) {
            return Arc::clone(compiled);
        }
        let compiled = Arc::new(CompiledPattern::compile(pattern));
        self.cache
            .insert(pattern.to_string(), Arc::clone(&compiled));
        compiled
    }

    /// Returns the number of distinct patterns compiled so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Returns true if nothing has been compiled yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_pattern() {
        let pattern = CompiledPattern::compile("/users");
        assert!(pattern.is_match("/users"));
        assert!(!pattern.is_match("/users/7"));
        assert!(!pattern.is_match("/api/users"));
        assert!(pattern.placeholders().is_empty());
    }

    #[test]
    fn test_single_placeholder() {
        let pattern = CompiledPattern::compile("/blog/:id:");
        assert_eq!(pattern.placeholders(), ["id"]);
        assert_eq!(pattern.capture("/blog/42").unwrap(), ["42"]);
        assert_eq!(pattern.capture("/blog/create").unwrap(), ["create"]);
        assert!(pattern.capture("/blog").is_none());
        assert!(pattern.capture("/blog/").is_none());
    }

    #[test]
    fn test_placeholder_excludes_separator() {
        let pattern = CompiledPattern::compile("/blog/:id:");
        assert!(pattern.capture("/blog/1/edit").is_none());
    }

    #[test]
    fn test_multiple_placeholders_in_order() {
        let pattern = CompiledPattern::compile("/orgs/:org:/users/:user:");
        assert_eq!(pattern.placeholders(), ["org", "user"]);
        let values = pattern.capture("/orgs/acme/users/123").unwrap();
        assert_eq!(values, ["acme", "123"]);
    }

    #[test]
    fn test_anchored_full_match() {
        let pattern = CompiledPattern::compile("/a/:x:");
        assert!(pattern.capture("/a/b/c").is_none());
        assert!(pattern.capture("prefix/a/b").is_none());
    }

    #[test]
    fn test_literal_bytes_escaped() {
        let pattern = CompiledPattern::compile("/v1.0/items");
        assert!(pattern.is_match("/v1.0/items"));
        // The dot must not act as a regex wildcard.
        assert!(!pattern.is_match("/v1x0/items"));
    }

    #[test]
    fn test_stray_colon_is_literal() {
        let pattern = CompiledPattern::compile("/time/12:30");
        assert!(pattern.is_match("/time/12:30"));
        assert!(pattern.placeholders().is_empty());
    }

    #[test]
    fn test_colon_with_invalid_name_is_literal() {
        // "12" is not an identifier, so ":12:" matches literally.
        let pattern = CompiledPattern::compile("/t/:12:/x");
        assert!(pattern.is_match("/t/:12:/x"));
        assert!(pattern.placeholders().is_empty());
    }

    #[test]
    fn test_mixed_segment() {
        let pattern = CompiledPattern::compile("/files/report-:id:.pdf");
        assert_eq!(pattern.capture("/files/report-7.pdf").unwrap(), ["7"]);
        assert!(pattern.capture("/files/report-.pdf").is_none());
    }

    #[test]
    fn test_compiler_caches_by_text() {
        let mut compiler = PatternCompiler::new();
        let a = compiler.compile("/x/:y:");
        let b = compiler.compile("/x/:y:");
        let c = compiler.compile("/x/:z:");
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(compiler.len(), 2);
    }

    #[test]
    fn test_cached_matcher_behaves_identically() {
        let mut compiler = PatternCompiler::new();
        let first = compiler.compile("/blog/:id:");
        let second = compiler.compile("/blog/:id:");
        for path in ["/blog/1", "/blog/create", "/blog", "/blog/a/b"] {
            assert_eq!(first.capture(path), second.capture(path));
        }
    }

    #[test]
    fn test_root_pattern() {
        let pattern = CompiledPattern::compile("/");
        assert!(pattern.is_match("/"));
        assert!(!pattern.is_match("/x"));
    }
}
