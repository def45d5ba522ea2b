//! # Daedalus
//!
//! **Pattern-routed request dispatch for the Labyrinth Platform**
//!
//! Daedalus is the request-dispatch core of a web-request-handling stack:
//! a pattern-based route registry/matcher combined with a priority-ordered
//! lifecycle hook dispatcher. It decides, for each incoming request, which
//! handler runs and which cross-cutting behaviors wrap it, in what order,
//! with what ability to short-circuit.
//!
//! - **Routing** – `:name:` placeholder patterns, registration order as
//!   match priority, nested groups with cumulative prefixes and hooks
//! - **Hooks** – ten lifecycle points, integer priorities with stable
//!   ties, lazily-resolved named hooks, explicit continue/halt flow
//! - **Dispatch** – one synchronous pipeline per request, halt checks
//!   after every chain, render phase only when a view was requested
//!
//! ## Quick Start
//!
//! ```
//! use daedalus::prelude::*;
//! use serde_json::json;
//!
//! let mut routes = RouteRegistry::new();
//! routes.get("/blog/:id:", "blog.show");
//!
//! let mut handlers = HandlerRegistry::new();
//! handlers.insert_fn("blog.show", |_ctx, params| {
//!     Ok(ActionResult::payload(json!({ "id": params.get("id") })))
//! });
//!
//! let dispatcher = Dispatcher::builder()
//!     .routes(routes)
//!     .handlers(handlers)
//!     .build();
//!
//! dispatcher.boot();
//! let outcome = dispatcher.dispatch(&Request::new("GET", "/blog/42")).unwrap();
//! assert!(outcome.is_completed());
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Request → normalize → before_routing → match → route_matched
//!         → route hooks → controller load → action → [view render]
//! ```

#![doc(html_root_url = "https://docs.rs/daedalus/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use daedalus_core as core;

// Re-export router types
pub use daedalus_router as router;

// Re-export hook types
pub use daedalus_hooks as hooks;

// Re-export dispatch types
pub use daedalus_dispatch as dispatch;

pub mod logging;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```
/// use daedalus::prelude::*;
/// ```
pub mod prelude {
    pub use daedalus_core::{
        ActionResult, DispatchContext, FnHandler, Handler, HandlerRegistry, LabyrinthError,
        LabyrinthResult, RequestId, ViewSpec,
    };

    pub use daedalus_router::{
        GroupAttributes, MethodFilter, Params, RouteMatch, RouteRegistry, RouteSnapshot,
    };

    pub use daedalus_hooks::{
        Flow, FnHook, Hook, HookRegistry, LifecyclePoint, DEFAULT_PRIORITY,
    };

    pub use daedalus_dispatch::{
        DispatchConfig, DispatchOutcome, Dispatcher, Request,
    };
}
