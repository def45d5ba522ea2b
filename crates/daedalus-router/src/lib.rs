//! Pattern-based route registry and matcher for Daedalus.
//!
//! This crate implements the routing half of the dispatch core:
//!
//! - **Pattern compilation** — `:name:` placeholder patterns compile to
//!   anchored matchers, cached by exact pattern text
//! - **Order-preserving registry** — routes match in registration order;
//!   the first success wins, so registration order *is* match priority
//! - **Groups** — nested registration scopes contributing a cumulative
//!   path prefix and hook list to the routes inside them
//! - **Snapshots** — an optional serialized route table for skipping
//!   registration work on later starts
//!
//! # Example
//!
//! ```
//! use daedalus_router::{GroupAttributes, RouteRegistry};
//! use http::Method;
//!
//! let mut routes = RouteRegistry::new();
//! routes.get("/blog/:id:", "blog.show");
//! routes.group(GroupAttributes::new().prefix("/admin").hooks(["auth"]), |routes| {
//!     routes.get("/posts/:id:", "admin.edit").hooks(["log"]);
//! });
//!
//! let matched = routes.match_route(&Method::GET, "/admin/posts/9").unwrap();
//! assert_eq!(matched.route().handler(), "admin.edit");
//! assert_eq!(matched.route().hooks(), ["auth", "log"]);
//! ```
//!
//! # Match priority
//!
//! Unlike specificity-based routers, this registry makes no judgment about
//! static versus placeholder segments: `GET /blog/:id:` registered before
//! `GET /blog/create` captures `/blog/create` with `id = "create"`. Callers
//! order registrations from most to least specific when they want the usual
//! behavior.

mod group;
mod params;
mod pattern;
mod registry;
mod route;
mod snapshot;

pub use group::GroupAttributes;
pub use params::Params;
pub use pattern::{CompiledPattern, PatternCompiler};
pub use registry::{RouteEntry, RouteHandle, RouteRegistry};
pub use route::{MethodFilter, Route};
pub use snapshot::{RouteDef, RouteSnapshot, SnapshotError, SNAPSHOT_VERSION};

use http::Method;

/// A successful route match.
///
/// Produced transiently per request; borrows the matched [`Route`] from the
/// registry.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    method: Method,
    path: String,
    index: usize,
    route: &'a Route,
    params: Params,
}

impl<'a> RouteMatch<'a> {
    pub(crate) fn new(
        method: Method,
        path: String,
        index: usize,
        route: &'a Route,
        params: Params,
    ) -> Self {
        Self {
            method,
            path,
            index,
            route,
            params,
        }
    }

    /// The request method that matched.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The normalized path that matched.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Registration index of the matched route.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The matched route.
    #[must_use]
    pub fn route(&self) -> &'a Route {
        self.route
    }

    /// Captured placeholder bindings, in pattern left-to-right order.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Consumes the match, returning the bindings.
    #[must_use]
    pub fn into_params(self) -> Params {
        self.params
    }
}
