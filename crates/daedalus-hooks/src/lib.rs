//! Priority-ordered lifecycle hooks for Daedalus.
//!
//! This crate implements the cross-cutting half of the dispatch core:
//!
//! - [`LifecyclePoint`] — the fixed set of named moments hooks may run at
//! - [`Hook`] / [`FnHook`] — a unit of behavior that transforms the
//!   in-flight payload and decides whether the chain continues
//! - [`Flow`] — the explicit continue/halt result each hook (and each
//!   chain fold) returns
//! - [`HookRegistry`] — per-point chains with integer priorities, lazily
//!   resolved named hooks, and exact (method, pattern) route attachments
//!
//! # Ordering
//!
//! Within one point, entries run in ascending priority order; equal
//! priorities preserve registration order. The sorted order is computed at
//! most once per registration generation.
//!
//! # Halting and failure
//!
//! A [`Flow::Halt`] stops the remaining hooks at the current point and
//! carries every transformation made so far. An error from a hook is
//! logged and the chain continues with the hook's input unchanged —
//! resilience over strictness.
//!
//! # Example
//!
//! ```
//! use daedalus_core::DispatchContext;
//! use daedalus_hooks::{Flow, FnHook, HookRegistry, LifecyclePoint};
//! use serde_json::json;
//!
//! let mut hooks = HookRegistry::new();
//! hooks.register(
//!     LifecyclePoint::BeforeActionExecute,
//!     FnHook::new("audit", |_ctx, mut payload| {
//!         payload["audited"] = json!(true);
//!         Ok(Flow::Continue(payload))
//!     }),
//!     5,
//! );
//!
//! let mut ctx = DispatchContext::new();
//! let flow = hooks.trigger(LifecyclePoint::BeforeActionExecute, &mut ctx, json!({}));
//! assert_eq!(flow.into_value(), json!({ "audited": true }));
//! ```

#![doc(html_root_url = "https://docs.rs/daedalus-hooks/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod hook;
mod point;
mod registry;

pub use hook::{Flow, FnHook, Hook};
pub use point::{LifecyclePoint, UnknownPoint};
pub use registry::{HookError, HookFactory, HookRegistry, DEFAULT_PRIORITY};
