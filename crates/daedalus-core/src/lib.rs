//! # Daedalus Core
//!
//! Core types and traits for the Daedalus dispatch framework:
//!
//! - [`DispatchContext`] — per-request context threaded through hook
//!   chains and handlers
//! - [`RequestId`] — UUID v7 request identifier
//! - [`LabyrinthError`] — standard application error type
//! - [`Handler`] / [`HandlerRegistry`] — the handler seam routes resolve
//!   their opaque references through

#![doc(html_root_url = "https://docs.rs/daedalus-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
mod handler;

pub use context::{DispatchContext, RequestId};
pub use error::{ErrorCategory, LabyrinthError, LabyrinthResult};
pub use handler::{ActionResult, FnHandler, Handler, HandlerRegistry, ViewSpec};
