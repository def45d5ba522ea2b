//! The dispatcher: one request through routing, hooks, handler, render.
//!
//! A request advances through fixed phases:
//!
//! ```text
//! INIT → ROUTED → ROUTE_HOOKS → HANDLER → RENDER → DONE
//! ```
//!
//! Global lifecycle hooks fire at each boundary and route-attached hooks
//! fire between routing and handler invocation. After every chain the
//! dispatcher checks for a halt and, when one occurred, abandons the rest
//! of the pipeline — halting is cooperative: a hook's halt by itself stops
//! only its own chain, and it is this caller that turns it into an aborted
//! request.
//!
//! The render phase exists only when the handler asked for a view; pure
//! API responses skip it without firing the render hooks at all.

use crate::config::DispatchConfig;
use crate::error::DispatchError;
use crate::request::Request;
use daedalus_core::{DispatchContext, HandlerRegistry, LabyrinthResult, ViewSpec};
use daedalus_hooks::{Flow, HookRegistry, LifecyclePoint};
use daedalus_router::{Params, RouteRegistry};
use http::Method;
use serde_json::{json, Value};

/// The dispatcher's pipeline phases, used to label outcomes and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Phase {
    /// Normalization and the `before_routing` chain.
    Init = 1,
    /// Route matching and the `route_matched` chain.
    Routed = 2,
    /// Route-attached hooks for the matched (method, pattern).
    RouteHooks = 3,
    /// Controller load and action execution chains.
    Handler = 4,
    /// View rendering chains.
    Render = 5,
    /// The pipeline ran to completion.
    Done = 6,
}

impl Phase {
    /// Returns the phase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Routed => "routed",
            Self::RouteHooks => "route_hooks",
            Self::Handler => "handler",
            Self::Render => "render",
            Self::Done => "done",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// How a dispatched request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The pipeline ran to completion.
    Completed {
        /// The final folded payload.
        payload: Value,
        /// The rendered view, when one was requested.
        rendered: Option<String>,
    },

    /// A hook halted the pipeline.
    Halted {
        /// The phase whose chain was halted.
        phase: Phase,
        /// The payload at the halt, every prior transformation included.
        payload: Value,
    },

    /// No route matched; the not-found collaborator produced the payload.
    NotFound {
        /// The collaborator's payload.
        payload: Value,
    },
}

impl DispatchOutcome {
    /// Returns the outcome's payload.
    #[must_use]
    pub fn payload(&self) -> &Value {
        match self {
            Self::Completed { payload, .. }
            | Self::Halted { payload, .. }
            | Self::NotFound { payload } => payload,
        }
    }

    /// Returns the rendered view, when the pipeline completed with one.
    #[must_use]
    pub fn rendered(&self) -> Option<&str> {
        match self {
            Self::Completed { rendered, .. } => rendered.as_deref(),
            _ => None,
        }
    }

    /// Returns true for [`DispatchOutcome::Completed`].
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Returns true for [`DispatchOutcome::Halted`].
    #[must_use]
    pub const fn is_halted(&self) -> bool {
        matches!(self, Self::Halted { .. })
    }

    /// Returns true for [`DispatchOutcome::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Renders a handler-requested view.
///
/// Template syntax and storage are outside the dispatch core; this trait
/// is the seam the real templating collaborator plugs into.
pub trait Renderer: Send + Sync {
    /// Renders the view to a string.
    fn render(&self, view: &ViewSpec) -> LabyrinthResult<String>;
}

/// Default renderer: serializes the view data as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&self, view: &ViewSpec) -> LabyrinthResult<String> {
        Ok(serde_json::to_string(&view.data).unwrap_or_default())
    }
}

/// Produces the response payload when no route matched.
pub trait NotFoundHandler: Send + Sync {
    /// Builds the not-found payload.
    ///
    /// `data` is the `route_matched` chain's folded output for the missed
    /// request, so hooks can annotate what the collaborator sees.
    fn handle(&self, method: &Method, path: &str, data: Value) -> Value;
}

/// Default not-found collaborator: a plain 404 payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNotFound;

impl NotFoundHandler for DefaultNotFound {
    fn handle(&self, method: &Method, path: &str, _data: Value) -> Value {
        json!({
            "status": 404,
            "error": "not_found",
            "method": method.as_str(),
            "path": path,
        })
    }
}

/// Builder for a [`Dispatcher`].
///
/// `build` wires every registered route's hook list into the hook
/// registry's route attachments, which is what `trigger_route_hooks`
/// consults at dispatch time.
pub struct DispatcherBuilder {
    routes: RouteRegistry,
    hooks: HookRegistry,
    handlers: HandlerRegistry,
    config: DispatchConfig,
    renderer: Box<dyn Renderer>,
    not_found: Box<dyn NotFoundHandler>,
}

impl DispatcherBuilder {
    /// Creates a builder with empty registries and default collaborators.
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: RouteRegistry::new(),
            hooks: HookRegistry::new(),
            handlers: HandlerRegistry::new(),
            config: DispatchConfig::default(),
            renderer: Box::new(NullRenderer),
            not_found: Box::new(DefaultNotFound),
        }
    }

    /// Sets the route registry.
    #[must_use]
    pub fn routes(mut self, routes: RouteRegistry) -> Self {
        self.routes = routes;
        self
    }

    /// Sets the hook registry.
    #[must_use]
    pub fn hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = hooks;
        self
    }

    /// Sets the handler registry.
    #[must_use]
    pub fn handlers(mut self, handlers: HandlerRegistry) -> Self {
        self.handlers = handlers;
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the rendering collaborator.
    #[must_use]
    pub fn renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    /// Sets the not-found collaborator.
    #[must_use]
    pub fn not_found(mut self, not_found: impl NotFoundHandler + 'static) -> Self {
        self.not_found = Box::new(not_found);
        self
    }

    /// Builds the dispatcher, syncing route hook lists into the hook
    /// registry.
    #[must_use]
    pub fn build(mut self) -> Dispatcher {
        for route in self.routes.routes() {
            if !route.hooks().is_empty() {
                self.hooks.attach_to_route(
                    route.method().as_str(),
                    route.pattern(),
                    route.hooks().iter().cloned(),
                );
            }
        }
        Dispatcher {
            routes: self.routes,
            hooks: self.hooks,
            handlers: self.handlers,
            config: self.config,
            renderer: self.renderer,
            not_found: self.not_found,
        }
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Orchestrates one request at a time through routing, hooks, the handler,
/// and rendering.
///
/// All registration happens before construction; dispatching takes
/// `&self`, so a built dispatcher can be treated as an immutable snapshot
/// and shared across threads, with each request owning its own
/// [`DispatchContext`].
pub struct Dispatcher {
    routes: RouteRegistry,
    hooks: HookRegistry,
    handlers: HandlerRegistry,
    config: DispatchConfig,
    renderer: Box<dyn Renderer>,
    not_found: Box<dyn NotFoundHandler>,
}

impl Dispatcher {
    /// Creates a builder.
    #[must_use]
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// Returns the route registry.
    #[must_use]
    pub fn routes(&self) -> &RouteRegistry {
        &self.routes
    }

    /// Returns the hook registry.
    #[must_use]
    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    /// Returns the handler registry.
    #[must_use]
    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Fires the `framework_start` chain. Call once before dispatching.
    pub fn boot(&self) -> Value {
        tracing::debug!("framework start");
        let mut ctx = DispatchContext::new();
        self.hooks
            .trigger(
                LifecyclePoint::FrameworkStart,
                &mut ctx,
                json!({ "event": "framework_start" }),
            )
            .into_value()
    }

    /// Fires the `framework_shutdown` chain. Call once after the last
    /// request.
    pub fn shutdown(&self) -> Value {
        tracing::debug!("framework shutdown");
        let mut ctx = DispatchContext::new();
        self.hooks
            .trigger(
                LifecyclePoint::FrameworkShutdown,
                &mut ctx,
                json!({ "event": "framework_shutdown" }),
            )
            .into_value()
    }

    /// Dispatches one request.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] for failures fatal to this request: an
    /// invalid method token, an unresolvable handler reference, or a
    /// handler/renderer failure. A missed route and halted chains are
    /// outcomes, not errors.
    pub fn dispatch(&self, request: &Request) -> Result<DispatchOutcome, DispatchError> {
        let normalized = request.normalize(&self.config)?;
        let mut ctx = DispatchContext::new();
        ctx.set_method(normalized.method.clone());
        ctx.set_path(normalized.path.clone());

        let span = tracing::debug_span!(
            "dispatch",
            request_id = %ctx.request_id(),
            method = %normalized.method,
            path = %normalized.path,
        );
        let _enter = span.enter();

        let payload = json!({
            "method": normalized.method.as_str(),
            "path": normalized.path,
        });
        let mut payload =
            match self.fire(LifecyclePoint::BeforeRouting, Phase::Init, &mut ctx, payload) {
                Ok(value) => value,
                Err(halted) => return Ok(halted),
            };

        let Some(matched) = self.routes.match_route(&normalized.method, &normalized.path) else {
            annotate(&mut payload, "matched", json!(false));
            let payload =
                match self.fire(LifecyclePoint::RouteMatched, Phase::Routed, &mut ctx, payload) {
                    Ok(value) => value,
                    Err(halted) => return Ok(halted),
                };
            tracing::debug!("no route matched");
            let payload = self
                .not_found
                .handle(&normalized.method, &normalized.path, payload);
            return Ok(DispatchOutcome::NotFound { payload });
        };

        let route = matched.route();
        ctx.set_handler_id(route.handler());
        ctx.set_params(matched.params().clone());
        tracing::debug!(pattern = route.pattern(), handler = route.handler(), "route matched");

        annotate(&mut payload, "matched", json!(true));
        annotate(
            &mut payload,
            "route",
            json!({
                "pattern": route.pattern(),
                "handler": route.handler(),
                "params": params_value(matched.params()),
            }),
        );
        let payload =
            match self.fire(LifecyclePoint::RouteMatched, Phase::Routed, &mut ctx, payload) {
                Ok(value) => value,
                Err(halted) => return Ok(halted),
            };

        let payload = match self.hooks.trigger_route_hooks(
            route.method().as_str(),
            route.pattern(),
            &mut ctx,
            payload,
        ) {
            Flow::Continue(value) => value,
            Flow::Halt(value) => {
                return Ok(DispatchOutcome::Halted {
                    phase: Phase::RouteHooks,
                    payload: value,
                })
            }
        };

        let payload = match self.fire(
            LifecyclePoint::BeforeControllerLoad,
            Phase::Handler,
            &mut ctx,
            payload,
        ) {
            Ok(value) => value,
            Err(halted) => return Ok(halted),
        };

        let handler =
            self.handlers
                .get(route.handler())
                .ok_or_else(|| DispatchError::UnknownHandler {
                    id: route.handler().to_string(),
                })?;

        let payload = match self.fire(
            LifecyclePoint::AfterControllerLoad,
            Phase::Handler,
            &mut ctx,
            payload,
        ) {
            Ok(value) => value,
            Err(halted) => return Ok(halted),
        };
        let mut payload = match self.fire(
            LifecyclePoint::BeforeActionExecute,
            Phase::Handler,
            &mut ctx,
            payload,
        ) {
            Ok(value) => value,
            Err(halted) => return Ok(halted),
        };

        let result = handler
            .call(&ctx, matched.params())
            .map_err(DispatchError::Handler)?;
        let (result_payload, view) = result.into_parts();
        annotate(&mut payload, "result", result_payload);

        let payload = match self.fire(
            LifecyclePoint::AfterActionExecute,
            Phase::Handler,
            &mut ctx,
            payload,
        ) {
            Ok(value) => value,
            Err(halted) => return Ok(halted),
        };

        // Pure API responses skip the render phase entirely; the render
        // hooks never fire.
        let Some(view) = view else {
            return Ok(DispatchOutcome::Completed {
                payload,
                rendered: None,
            });
        };

        let mut payload = payload;
        annotate(&mut payload, "view", json!({ "template": view.template }));
        let mut payload = match self.fire(
            LifecyclePoint::BeforeViewRender,
            Phase::Render,
            &mut ctx,
            payload,
        ) {
            Ok(value) => value,
            Err(halted) => return Ok(halted),
        };

        let rendered = self.renderer.render(&view).map_err(DispatchError::Render)?;
        annotate(&mut payload, "rendered", json!(rendered));

        let payload = match self.fire(
            LifecyclePoint::AfterViewRender,
            Phase::Render,
            &mut ctx,
            payload,
        ) {
            Ok(value) => value,
            Err(halted) => return Ok(halted),
        };

        Ok(DispatchOutcome::Completed {
            payload,
            rendered: Some(rendered),
        })
    }

    /// Fires one global chain, turning a halt into the aborting outcome.
    fn fire(
        &self,
        point: LifecyclePoint,
        phase: Phase,
        ctx: &mut DispatchContext,
        payload: Value,
    ) -> Result<Value, DispatchOutcome> {
        match self.hooks.trigger(point, ctx, payload) {
            Flow::Continue(value) => Ok(value),
            Flow::Halt(value) => {
                tracing::debug!(point = %point, phase = %phase, "pipeline halted");
                Err(DispatchOutcome::Halted {
                    phase,
                    payload: value,
                })
            }
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("routes", &self.routes.len())
            .field("handlers", &self.handlers.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn annotate(payload: &mut Value, key: &str, value: Value) {
    // Stage annotations only apply while the payload is still an object;
    // a hook that replaced it with something else keeps its replacement.
    if let Some(map) = payload.as_object_mut() {
        map.insert(key.to_string(), value);
    }
}

fn params_value(params: &Params) -> Value {
    let map: serde_json::Map<String, Value> = params
        .iter()
        .map(|(name, value)| (name.to_string(), Value::String(value.to_string())))
        .collect();
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use daedalus_core::ActionResult;

    fn minimal_dispatcher() -> Dispatcher {
        let mut routes = RouteRegistry::new();
        routes.get("/ping", "ping");

        let mut handlers = HandlerRegistry::new();
        handlers.insert_fn("ping", |_ctx, _params| {
            Ok(ActionResult::payload(json!({ "pong": true })))
        });

        Dispatcher::builder()
            .routes(routes)
            .handlers(handlers)
            .build()
    }

    #[test]
    fn test_completed_outcome() {
        let dispatcher = minimal_dispatcher();
        let outcome = dispatcher.dispatch(&Request::new("GET", "/ping")).unwrap();

        assert!(outcome.is_completed());
        assert!(outcome.rendered().is_none());
        assert_eq!(outcome.payload()["result"], json!({ "pong": true }));
        assert_eq!(outcome.payload()["matched"], json!(true));
    }

    #[test]
    fn test_not_found_outcome() {
        let dispatcher = minimal_dispatcher();
        let outcome = dispatcher.dispatch(&Request::new("GET", "/nope")).unwrap();

        assert!(outcome.is_not_found());
        assert_eq!(outcome.payload()["status"], json!(404));
        assert_eq!(outcome.payload()["path"], json!("/nope"));
    }

    #[test]
    fn test_unknown_handler_is_fatal_for_request() {
        let mut routes = RouteRegistry::new();
        routes.get("/orphan", "missing.handler");

        let dispatcher = Dispatcher::builder().routes(routes).build();
        let result = dispatcher.dispatch(&Request::new("GET", "/orphan"));

        assert!(matches!(
            result,
            Err(DispatchError::UnknownHandler { id }) if id == "missing.handler"
        ));
    }

    #[test]
    fn test_handler_error_propagates() {
        let mut routes = RouteRegistry::new();
        routes.get("/fail", "fail");

        let mut handlers = HandlerRegistry::new();
        handlers.insert_fn("fail", |_ctx, _params| {
            Err(daedalus_core::LabyrinthError::internal("handler broke"))
        });

        let dispatcher = Dispatcher::builder()
            .routes(routes)
            .handlers(handlers)
            .build();
        let result = dispatcher.dispatch(&Request::new("GET", "/fail"));
        assert!(matches!(result, Err(DispatchError::Handler(_))));
    }

    #[test]
    fn test_view_renders_through_collaborator() {
        struct UpperRenderer;
        impl Renderer for UpperRenderer {
            fn render(&self, view: &ViewSpec) -> LabyrinthResult<String> {
                Ok(format!("<{}>", view.template.to_uppercase()))
            }
        }

        let mut routes = RouteRegistry::new();
        routes.get("/page", "page");

        let mut handlers = HandlerRegistry::new();
        handlers.insert_fn("page", |_ctx, _params| {
            Ok(ActionResult::view("home", json!({ "title": "hi" })))
        });

        let dispatcher = Dispatcher::builder()
            .routes(routes)
            .handlers(handlers)
            .renderer(UpperRenderer)
            .build();

        let outcome = dispatcher.dispatch(&Request::new("GET", "/page")).unwrap();
        assert_eq!(outcome.rendered(), Some("<HOME>"));
    }

    #[test]
    fn test_custom_not_found_collaborator() {
        struct Teapot;
        impl NotFoundHandler for Teapot {
            fn handle(&self, _method: &Method, path: &str, _data: Value) -> Value {
                json!({ "status": 418, "path": path })
            }
        }

        let dispatcher = Dispatcher::builder().not_found(Teapot).build();
        let outcome = dispatcher.dispatch(&Request::new("GET", "/x")).unwrap();
        assert_eq!(outcome.payload()["status"], json!(418));
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(Phase::Init.name(), "init");
        assert_eq!(Phase::RouteHooks.name(), "route_hooks");
        assert_eq!(Phase::Done.name(), "done");
        assert!(Phase::Init < Phase::Done);
    }

    #[test]
    fn test_builder_wires_route_hook_attachments() {
        let mut routes = RouteRegistry::new();
        routes.get("/admin", "admin").hooks(["auth"]);

        let dispatcher = Dispatcher::builder().routes(routes).build();
        assert_eq!(
            dispatcher.hooks().attached_to_route("GET", "/admin"),
            Some(["auth".to_string()].as_slice())
        );
    }
}
