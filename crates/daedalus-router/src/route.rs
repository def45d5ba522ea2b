//! Route records.
//!
//! A [`Route`] binds a method filter and a compiled pattern to an opaque
//! handler reference, together with the hook names that wrap it. Routes are
//! created at registration time and immutable thereafter; the registry owns
//! them for its whole lifetime.

use crate::pattern::CompiledPattern;
use http::Method;
use std::sync::Arc;

/// Which HTTP methods a route responds to.
///
/// Routes bind a single verb each, or the `ANY` wildcard which matches
/// every method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodFilter {
    /// Matches every request method.
    Any,
    /// Matches exactly one method.
    Only(Method),
}

impl MethodFilter {
    /// Returns true if `method` passes this filter.
    #[must_use]
    pub fn matches(&self, method: &Method) -> bool {
        match self {
            Self::Any => true,
            Self::Only(m) => m == method,
        }
    }

    /// Returns the canonical string form: the method name, or `"ANY"`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Any => "ANY",
            Self::Only(m) => m.as_str(),
        }
    }

    /// Parses a filter from its string form.
    ///
    /// `"ANY"` and `"*"` produce the wildcard; anything else is treated as
    /// a method token (extension methods included). Invalid tokens yield
    /// `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("ANY") || s == "*" {
            return Some(Self::Any);
        }
        Method::from_bytes(s.to_ascii_uppercase().as_bytes())
            .ok()
            .map(Self::Only)
    }
}

impl std::fmt::Display for MethodFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for MethodFilter {
    fn from(method: Method) -> Self {
        Self::Only(method)
    }
}

/// A registered route.
///
/// The pattern stored here is the *effective* pattern: the group prefixes
/// active at registration time are already concatenated in front of the
/// pattern the caller supplied.
#[derive(Debug, Clone)]
pub struct Route {
    /// Method filter.
    method: MethodFilter,

    /// Effective pattern text (group prefix included).
    pattern: String,

    /// Compiled matcher, shared with every route using the same pattern.
    compiled: Arc<CompiledPattern>,

    /// Opaque handler reference, resolved by the dispatcher.
    handler: String,

    /// Attached hook names: group hooks first, route-level hooks appended.
    hooks: Vec<String>,

    /// The group prefix that was active at registration time.
    group_prefix: String,
}

impl Route {
    pub(crate) fn new(
        method: MethodFilter,
        pattern: String,
        compiled: Arc<CompiledPattern>,
        handler: String,
        hooks: Vec<String>,
        group_prefix: String,
    ) -> Self {
        Self {
            method,
            pattern,
            compiled,
            handler,
            hooks,
            group_prefix,
        }
    }

    /// Returns the method filter.
    #[must_use]
    pub fn method(&self) -> &MethodFilter {
        &self.method
    }

    /// Returns the effective pattern text.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the compiled matcher.
    #[must_use]
    pub fn compiled(&self) -> &Arc<CompiledPattern> {
        &self.compiled
    }

    /// Returns the placeholder names in pattern order.
    #[must_use]
    pub fn placeholders(&self) -> &[String] {
        self.compiled.placeholders()
    }

    /// Returns the opaque handler reference.
    #[must_use]
    pub fn handler(&self) -> &str {
        &self.handler
    }

    /// Returns the attached hook names, group hooks first.
    #[must_use]
    pub fn hooks(&self) -> &[String] {
        &self.hooks
    }

    /// Returns the group prefix active when this route was registered.
    #[must_use]
    pub fn group_prefix(&self) -> &str {
        &self.group_prefix
    }

    pub(crate) fn append_hooks<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hooks.extend(names.into_iter().map(Into::into));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_filter_matches() {
        assert!(MethodFilter::Any.matches(&Method::GET));
        assert!(MethodFilter::Any.matches(&Method::DELETE));
        assert!(MethodFilter::Only(Method::GET).matches(&Method::GET));
        assert!(!MethodFilter::Only(Method::GET).matches(&Method::POST));
    }

    #[test]
    fn test_method_filter_strings() {
        assert_eq!(MethodFilter::Any.as_str(), "ANY");
        assert_eq!(MethodFilter::Only(Method::PUT).as_str(), "PUT");
    }

    #[test]
    fn test_method_filter_parse() {
        assert_eq!(MethodFilter::parse("ANY"), Some(MethodFilter::Any));
        assert_eq!(MethodFilter::parse("any"), Some(MethodFilter::Any));
        assert_eq!(MethodFilter::parse("*"), Some(MethodFilter::Any));
        assert_eq!(
            MethodFilter::parse("get"),
            Some(MethodFilter::Only(Method::GET))
        );
        assert_eq!(
            MethodFilter::parse("PATCH"),
            Some(MethodFilter::Only(Method::PATCH))
        );
        assert_eq!(MethodFilter::parse(""), None);
    }
}
