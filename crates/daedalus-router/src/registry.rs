//! The route registry: an append-only, order-preserving route table.
//!
//! Registration order is match priority. `match_route` scans routes in the
//! order they were registered and returns the first success, so a
//! placeholder route registered before a static route shadows it for paths
//! they both match. This is the intended contract, not an accident; callers
//! control priority by registration order.

use crate::group::{GroupAttributes, GroupStack};
use crate::params::Params;
use crate::pattern::PatternCompiler;
use crate::route::{MethodFilter, Route};
use crate::RouteMatch;
use http::Method;

/// A stable handle to a registered route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteHandle(usize);

impl RouteHandle {
    /// Returns the registration index of the route.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// An append-only, order-preserving registry of routes.
///
/// # Example
///
/// ```
/// use daedalus_router::{GroupAttributes, MethodFilter, RouteRegistry};
/// use http::Method;
///
/// let mut routes = RouteRegistry::new();
/// routes.get("/blog/:id:", "blog.show");
/// routes.group(GroupAttributes::new().prefix("/admin").hooks(["auth"]), |routes| {
///     routes.post("/posts", "admin.create").hooks(["log"]);
/// });
///
/// let matched = routes.match_route(&Method::GET, "/blog/42").unwrap();
/// assert_eq!(matched.route().handler(), "blog.show");
/// assert_eq!(matched.params().get("id"), Some("42"));
/// ```
#[derive(Debug, Default)]
pub struct RouteRegistry {
    routes: Vec<Route>,
    compiler: PatternCompiler,
    groups: GroupStack,
}

impl RouteRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a route under the current group context.
    ///
    /// The effective pattern is the active group prefix followed by
    /// `pattern`; the route's hook list starts as the group context's
    /// effective hook list. Route-level hooks are appended through the
    /// returned entry's [`hooks`](RouteEntry::hooks).
    pub fn register(
        &mut self,
        method: MethodFilter,
        pattern: &str,
        handler: impl Into<String>,
    ) -> RouteEntry<'_> {
        let merged = self.groups.merged();
        let group_prefix = merged.prefix.clone();
        let hooks = merged.hooks.clone();
        let effective = format!("{group_prefix}{pattern}");
        let compiled = self.compiler.compile(&effective);
        let route = Route::new(
            method,
            effective,
            compiled,
            handler.into(),
            hooks,
            group_prefix,
        );
        tracing::debug!(
            method = %route.method(),
            pattern = route.pattern(),
            handler = route.handler(),
            "route registered"
        );
        self.routes.push(route);
        let index = self.routes.len() - 1;
        RouteEntry {
            registry: self,
            index,
        }
    }

    /// Registers a `GET` route.
    pub fn get(&mut self, pattern: &str, handler: impl Into<String>) -> RouteEntry<'_> {
        self.register(MethodFilter::Only(Method::GET), pattern, handler)
    }

    /// Registers a `POST` route.
    pub fn post(&mut self, pattern: &str, handler: impl Into<String>) -> RouteEntry<'_> {
        self.register(MethodFilter::Only(Method::POST), pattern, handler)
    }

    /// Registers a `PUT` route.
    pub fn put(&mut self, pattern: &str, handler: impl Into<String>) -> RouteEntry<'_> {
        self.register(MethodFilter::Only(Method::PUT), pattern, handler)
    }

    /// Registers a `DELETE` route.
    pub fn delete(&mut self, pattern: &str, handler: impl Into<String>) -> RouteEntry<'_> {
        self.register(MethodFilter::Only(Method::DELETE), pattern, handler)
    }

    /// Registers a `PATCH` route.
    pub fn patch(&mut self, pattern: &str, handler: impl Into<String>) -> RouteEntry<'_> {
        self.register(MethodFilter::Only(Method::PATCH), pattern, handler)
    }

    /// Registers a route matching every method.
    pub fn any(&mut self, pattern: &str, handler: impl Into<String>) -> RouteEntry<'_> {
        self.register(MethodFilter::Any, pattern, handler)
    }

    /// Appends route-level hooks to a previously registered route.
    pub fn attach_hooks<I, S>(&mut self, handle: RouteHandle, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(route) = self.routes.get_mut(handle.0) {
            route.append_hooks(names);
        }
    }

    /// Runs `body` inside a nested group scope.
    ///
    /// The attributes are pushed onto the group stack (invalidating the
    /// merged-attribute cache), `body` runs with the registry — it may
    /// register routes or open further groups — and the frame is popped
    /// afterwards. The pop happens in a drop guard, so a body that panics
    /// still unwinds with a balanced stack and a clean cache.
    pub fn group(&mut self, attrs: GroupAttributes, body: impl FnOnce(&mut Self)) {
        self.groups.push(attrs.into_frame());

        struct PopGuard<'a>(&'a mut RouteRegistry);
        impl Drop for PopGuard<'_> {
            fn drop(&mut self) {
                self.0.groups.pop();
            }
        }

        let guard = PopGuard(self);
        body(&mut *guard.0);
    }

    /// Matches a request against the registry.
    ///
    /// Routes are tried in registration order; a route is skipped when its
    /// method filter rejects `method`, and the first pattern success wins.
    /// Returns `None` without inspecting any route when the registry is
    /// empty.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_>> {
        if self.routes.is_empty() {
            return None;
        }

        for (index, route) in self.routes.iter().enumerate() {
            if !route.method().matches(method) {
                continue;
            }
            if let Some(values) = route.compiled().capture(path) {
                let mut params = Params::with_capacity(values.len());
                for (name, value) in route.placeholders().iter().zip(values) {
                    params.push(name.clone(), value);
                }
                return Some(RouteMatch::new(
                    method.clone(),
                    path.to_string(),
                    index,
                    route,
                    params,
                ));
            }
        }
        None
    }

    /// Returns a registered route by handle.
    #[must_use]
    pub fn route(&self, handle: RouteHandle) -> Option<&Route> {
        self.routes.get(handle.0)
    }

    /// Returns all routes in registration order.
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Returns the number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Short-lived handle to a just-registered route, supporting fluent
/// route-level hook attachment.
#[derive(Debug)]
pub struct RouteEntry<'a> {
    registry: &'a mut RouteRegistry,
    index: usize,
}

impl RouteEntry<'_> {
    /// Appends route-level hooks to the route. Group hooks stay in front.
    pub fn hooks<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.registry.routes[self.index].append_hooks(names);
        self
    }

    /// Returns a stable handle to the route.
    #[must_use]
    pub fn handle(&self) -> RouteHandle {
        RouteHandle(self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_registry_fast_path() {
        let routes = RouteRegistry::new();
        assert!(routes.match_route(&Method::GET, "/anything").is_none());
        assert!(routes.is_empty());
    }

    #[test]
    fn test_registration_order_is_match_priority() {
        let mut routes = RouteRegistry::new();
        routes.get("/blog/:id:", "blog.show");
        routes.get("/blog/create", "blog.create");

        // The placeholder route was registered first, so it shadows the
        // later static route for paths both match.
        let matched = routes.match_route(&Method::GET, "/blog/create").unwrap();
        assert_eq!(matched.route().handler(), "blog.show");
        assert_eq!(matched.params().get("id"), Some("create"));
    }

    #[test]
    fn test_later_static_route_reachable_when_registered_first() {
        let mut routes = RouteRegistry::new();
        routes.get("/blog/create", "blog.create");
        routes.get("/blog/:id:", "blog.show");

        let matched = routes.match_route(&Method::GET, "/blog/create").unwrap();
        assert_eq!(matched.route().handler(), "blog.create");

        let matched = routes.match_route(&Method::GET, "/blog/42").unwrap();
        assert_eq!(matched.route().handler(), "blog.show");
    }

    #[test]
    fn test_method_filtering() {
        let mut routes = RouteRegistry::new();
        routes.get("/users", "users.list");
        routes.post("/users", "users.create");

        let get = routes.match_route(&Method::GET, "/users").unwrap();
        assert_eq!(get.route().handler(), "users.list");

        let post = routes.match_route(&Method::POST, "/users").unwrap();
        assert_eq!(post.route().handler(), "users.create");

        assert!(routes.match_route(&Method::DELETE, "/users").is_none());
    }

    #[test]
    fn test_any_matches_all_methods() {
        let mut routes = RouteRegistry::new();
        routes.any("/health", "health.check");

        for method in [Method::GET, Method::POST, Method::DELETE, Method::PATCH] {
            let matched = routes.match_route(&method, "/health").unwrap();
            assert_eq!(matched.route().handler(), "health.check");
        }
    }

    #[test]
    fn test_duplicate_route_first_wins() {
        let mut routes = RouteRegistry::new();
        routes.get("/dup", "first");
        routes.get("/dup", "second");

        let matched = routes.match_route(&Method::GET, "/dup").unwrap();
        assert_eq!(matched.route().handler(), "first");
    }

    #[test]
    fn test_placeholder_bindings_in_pattern_order() {
        let mut routes = RouteRegistry::new();
        routes.get("/orgs/:org:/users/:user:", "org.user");

        let matched = routes
            .match_route(&Method::GET, "/orgs/acme/users/123")
            .unwrap();
        assert_eq!(matched.params().len(), 2);
        let pairs: Vec<_> = matched.params().iter().collect();
        assert_eq!(pairs, [("org", "acme"), ("user", "123")]);
    }

    #[test]
    fn test_nested_group_prefixes_concatenate() {
        let mut routes = RouteRegistry::new();
        routes.group(GroupAttributes::new().prefix("/a"), |routes| {
            routes.group(GroupAttributes::new().prefix("/b"), |routes| {
                routes.get("/c", "nested");
            });
        });

        let matched = routes.match_route(&Method::GET, "/a/b/c").unwrap();
        assert_eq!(matched.route().handler(), "nested");
        assert_eq!(matched.route().pattern(), "/a/b/c");
        assert_eq!(matched.route().group_prefix(), "/a/b");
    }

    #[test]
    fn test_group_hooks_precede_route_hooks() {
        let mut routes = RouteRegistry::new();
        routes.group(
            GroupAttributes::new().prefix("/admin").hooks(["auth"]),
            |routes| {
                routes.get("/posts", "admin.posts").hooks(["log"]);
            },
        );

        let route = &routes.routes()[0];
        assert_eq!(route.hooks(), ["auth", "log"]);
        assert_eq!(route.pattern(), "/admin/posts");
    }

    #[test]
    fn test_routes_after_group_are_unaffected() {
        let mut routes = RouteRegistry::new();
        routes.group(
            GroupAttributes::new().prefix("/admin").hooks(["auth"]),
            |routes| {
                routes.get("/inside", "inside");
            },
        );
        routes.get("/outside", "outside");

        let outside = &routes.routes()[1];
        assert_eq!(outside.pattern(), "/outside");
        assert!(outside.hooks().is_empty());
    }

    #[test]
    fn test_group_stack_balanced_after_panic() {
        let mut routes = RouteRegistry::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            routes.group(GroupAttributes::new().prefix("/boom"), |_routes| {
                panic!("body failed");
            });
        }));
        assert!(result.is_err());

        // The frame must have been popped, so later registrations see no
        // stale prefix.
        routes.get("/after", "after");
        assert_eq!(routes.routes()[0].pattern(), "/after");
    }

    #[test]
    fn test_attach_hooks_via_handle() {
        let mut routes = RouteRegistry::new();
        let handle = routes.get("/x", "x").handle();
        routes.attach_hooks(handle, ["late"]);

        assert_eq!(routes.route(handle).unwrap().hooks(), ["late"]);
    }

    #[test]
    fn test_shared_pattern_shares_compiled_matcher() {
        let mut routes = RouteRegistry::new();
        routes.get("/same/:id:", "a");
        routes.post("/same/:id:", "b");

        let all = routes.routes();
        assert!(std::sync::Arc::ptr_eq(all[0].compiled(), all[1].compiled()));
    }
}
