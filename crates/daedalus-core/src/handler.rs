//! Handler trait and handler registry.
//!
//! Routes carry an opaque handler reference; the [`HandlerRegistry`] maps
//! those references to [`Handler`] implementations at dispatch time. A
//! reference that resolves to nothing is fatal for the current request —
//! it is never silently skipped.

use crate::context::DispatchContext;
use crate::error::{LabyrinthError, LabyrinthResult};
use daedalus_router::Params;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// What a handler asked the dispatcher to render, if anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSpec {
    /// Template identifier, resolved by the rendering collaborator.
    pub template: String,
    /// Data handed to the template.
    pub data: Value,
}

/// The result of invoking a handler.
///
/// A pure API response carries only a payload; the render phase (and its
/// hooks) run only when a view was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    payload: Value,
    view: Option<ViewSpec>,
}

impl ActionResult {
    /// A payload-only result: no view, no render phase.
    #[must_use]
    pub fn payload(payload: impl Into<Value>) -> Self {
        Self {
            payload: payload.into(),
            view: None,
        }
    }

    /// A result requesting a view render.
    #[must_use]
    pub fn view(template: impl Into<String>, data: impl Into<Value>) -> Self {
        let data = data.into();
        Self {
            payload: data.clone(),
            view: Some(ViewSpec {
                template: template.into(),
                data,
            }),
        }
    }

    /// Returns the payload.
    #[must_use]
    pub fn payload_value(&self) -> &Value {
        &self.payload
    }

    /// Returns the requested view, if any.
    #[must_use]
    pub fn view_spec(&self) -> Option<&ViewSpec> {
        self.view.as_ref()
    }

    /// Splits the result into payload and optional view.
    #[must_use]
    pub fn into_parts(self) -> (Value, Option<ViewSpec>) {
        (self.payload, self.view)
    }
}

/// A request handler.
///
/// Handlers receive the read-only dispatch context and the captured
/// placeholder bindings in pattern left-to-right order.
///
/// # Example
///
/// ```
/// use daedalus_core::{ActionResult, DispatchContext, Handler, LabyrinthResult};
/// use daedalus_router::Params;
/// use serde_json::json;
///
/// struct ShowPost;
///
/// impl Handler for ShowPost {
///     fn call(&self, _ctx: &DispatchContext, params: &Params) -> LabyrinthResult<ActionResult> {
///         let id = params.get("id").unwrap_or("?");
///         Ok(ActionResult::payload(json!({ "post": id })))
///     }
/// }
/// ```
pub trait Handler: Send + Sync {
    /// Handles a matched request.
    ///
    /// # Errors
    ///
    /// Returns [`LabyrinthError`] when business logic fails; the dispatcher
    /// propagates it to the caller rather than swallowing it.
    fn call(&self, ctx: &DispatchContext, params: &Params) -> LabyrinthResult<ActionResult>;
}

/// A function-based handler wrapper.
///
/// # Example
///
/// ```
/// use daedalus_core::{ActionResult, FnHandler};
/// use serde_json::json;
///
/// let handler = FnHandler::new(|_ctx, params| {
///     Ok(ActionResult::payload(json!({ "id": params.get("id") })))
/// });
/// ```
pub struct FnHandler<F> {
    func: F,
}

impl<F> FnHandler<F>
where
    F: Fn(&DispatchContext, &Params) -> LabyrinthResult<ActionResult> + Send + Sync,
{
    /// Creates a new function-based handler.
    #[must_use]
    pub const fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> Handler for FnHandler<F>
where
    F: Fn(&DispatchContext, &Params) -> LabyrinthResult<ActionResult> + Send + Sync,
{
    fn call(&self, ctx: &DispatchContext, params: &Params) -> LabyrinthResult<ActionResult> {
        (self.func)(ctx, params)
    }
}

/// Maps opaque handler references to handler instances.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn Handler>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler under a reference id.
    ///
    /// Registering the same id twice replaces the earlier handler.
    pub fn insert(&mut self, id: impl Into<String>, handler: impl Handler + 'static) {
        let id = id.into();
        tracing::debug!(handler = %id, "handler registered");
        self.handlers.insert(id, Arc::new(handler));
    }

    /// Registers a closure as a handler.
    pub fn insert_fn<F>(&mut self, id: impl Into<String>, func: F)
    where
        F: Fn(&DispatchContext, &Params) -> LabyrinthResult<ActionResult> + Send + Sync + 'static,
    {
        self.insert(id, FnHandler::new(func));
    }

    /// Resolves a handler reference.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<dyn Handler>> {
        self.handlers.get(id).cloned()
    }

    /// Returns true if the reference is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.handlers.contains_key(id)
    }

    /// Returns the number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true if no handlers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_result_has_no_view() {
        let result = ActionResult::payload(json!({ "ok": true }));
        assert!(result.view_spec().is_none());
        assert_eq!(result.payload_value(), &json!({ "ok": true }));
    }

    #[test]
    fn test_view_result_carries_template_and_data() {
        let result = ActionResult::view("blog/show", json!({ "id": 7 }));
        let view = result.view_spec().unwrap();
        assert_eq!(view.template, "blog/show");
        assert_eq!(view.data, json!({ "id": 7 }));
    }

    #[test]
    fn test_fn_handler_receives_params() {
        let handler = FnHandler::new(|_ctx, params| {
            Ok(ActionResult::payload(json!({ "id": params.get("id") })))
        });

        let ctx = DispatchContext::new();
        let mut params = Params::new();
        params.push("id", "42");

        let result = handler.call(&ctx, &params).unwrap();
        assert_eq!(result.payload_value(), &json!({ "id": "42" }));
    }

    #[test]
    fn test_registry_lookup() {
        let mut registry = HandlerRegistry::new();
        registry.insert_fn("blog.show", |_ctx, _params| {
            Ok(ActionResult::payload(json!(null)))
        });

        assert!(registry.contains("blog.show"));
        assert!(registry.get("blog.show").is_some());
        assert!(registry.get("blog.missing").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_replaces_on_duplicate_insert() {
        let mut registry = HandlerRegistry::new();
        registry.insert_fn("h", |_ctx, _params| {
            Ok(ActionResult::payload(json!("first")))
        });
        registry.insert_fn("h", |_ctx, _params| {
            Ok(ActionResult::payload(json!("second")))
        });

        let ctx = DispatchContext::new();
        let result = registry
            .get("h")
            .unwrap()
            .call(&ctx, &Params::new())
            .unwrap();
        assert_eq!(result.payload_value(), &json!("second"));
        assert_eq!(registry.len(), 1);
    }
}
