//! Request dispatcher and lifecycle orchestration for Daedalus.
//!
//! This crate ties the route registry and the hook registry together into
//! the per-request pipeline:
//!
//! ```text
//! normalize → before_routing → match → route_matched
//!           → route hooks → before_controller_load → after_controller_load
//!           → before_action_execute → handler → after_action_execute
//!           → [before_view_render → render → after_view_render]
//! ```
//!
//! # Example
//!
//! ```
//! use daedalus_core::{ActionResult, HandlerRegistry};
//! use daedalus_dispatch::{Dispatcher, Request};
//! use daedalus_router::RouteRegistry;
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
//! let outcome = dispatcher.dispatch(&Request::new("GET", "/blog/42")).unwrap();
//! assert_eq!(outcome.payload()["result"], json!({ "id": "42" }));
//! ```

#![doc(html_root_url = "https://docs.rs/daedalus-dispatch/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod dispatcher;
mod error;
mod request;

pub use config::DispatchConfig;
pub use dispatcher::{
    DefaultNotFound, DispatchOutcome, Dispatcher, DispatcherBuilder, NotFoundHandler,
    NullRenderer, Phase, Renderer,
};
pub use error::{ConfigError, DispatchError};
pub use request::{NormalizedRequest, Request};
