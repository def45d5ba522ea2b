//! Per-request dispatch context.
//!
//! The [`DispatchContext`] flows through every hook chain and into the
//! handler. Hooks enrich it as the request advances (normalized request
//! line after routing, bindings after a match) and can stash typed
//! extension data for later hooks or the handler to read.
//!
//! The context is the *only* per-request state hooks receive; resolved hook
//! instances are cached and reused, so anything request-scoped belongs
//! here, never in a hook's own fields.

use daedalus_router::Params;
use http::Method;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::time::Instant;
use uuid::Uuid;

/// A unique identifier for each request, using UUID v7.
///
/// UUID v7 is time-ordered, which makes it ideal for request tracking and
/// log correlation.
///
/// # Example
///
/// ```
/// use daedalus_core::RequestId;
///
/// let id = RequestId::new();
/// println!("request: {id}");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID using UUID v7.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `RequestId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-request state threaded through hook chains and handlers.
///
/// # Example
///
/// ```
/// use daedalus_core::DispatchContext;
///
/// #[derive(Debug, PartialEq)]
/// struct AuthInfo {
///     user: String,
/// }
///
/// let mut ctx = DispatchContext::new();
/// ctx.set_extension(AuthInfo { user: "alice".into() });
/// assert_eq!(ctx.get_extension::<AuthInfo>().unwrap().user, "alice");
/// ```
#[derive(Debug)]
pub struct DispatchContext {
    /// Unique identifier for this request.
    request_id: RequestId,

    /// Normalized request method, set by the dispatcher before routing.
    method: Option<Method>,

    /// Normalized request path, set by the dispatcher before routing.
    path: Option<String>,

    /// Handler reference of the matched route, set after routing.
    handler_id: Option<String>,

    /// Captured placeholder bindings, set after routing.
    params: Params,

    /// When the request started processing.
    started_at: Instant,

    /// Type-erased extension data set by hooks.
    extensions: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl DispatchContext {
    /// Creates a context with a fresh request ID.
    #[must_use]
    pub fn new() -> Self {
        Self::with_request_id(RequestId::new())
    }

    /// Creates a context with a specific request ID.
    ///
    /// Useful when the ID was assigned by an upstream service.
    #[must_use]
    pub fn with_request_id(request_id: RequestId) -> Self {
        Self {
            request_id,
            method: None,
            path: None,
            handler_id: None,
            params: Params::new(),
            started_at: Instant::now(),
            extensions: HashMap::new(),
        }
    }

    /// Returns the request ID.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the normalized method, once set.
    #[must_use]
    pub fn method(&self) -> Option<&Method> {
        self.method.as_ref()
    }

    /// Sets the normalized method. Called by the dispatcher.
    pub fn set_method(&mut self, method: Method) {
        self.method = Some(method);
    }

    /// Returns the normalized path, once set.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Sets the normalized path. Called by the dispatcher.
    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = Some(path.into());
    }

    /// Returns the matched route's handler reference, once routed.
    #[must_use]
    pub fn handler_id(&self) -> Option<&str> {
        self.handler_id.as_deref()
    }

    /// Sets the matched handler reference. Called by the dispatcher.
    pub fn set_handler_id(&mut self, handler_id: impl Into<String>) {
        self.handler_id = Some(handler_id.into());
    }

    /// Returns the captured placeholder bindings.
    ///
    /// Empty until a route has matched.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Sets the captured bindings. Called by the dispatcher.
    pub fn set_params(&mut self, params: Params) {
        self.params = params;
    }

    /// Returns when the request started processing.
    #[must_use]
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Returns the elapsed time since the request started.
    #[must_use]
    pub fn elapsed(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }

    /// Stores a typed extension value.
    pub fn set_extension<T: Send + Sync + 'static>(&mut self, value: T) {
        self.extensions.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Retrieves a typed extension value.
    #[must_use]
    pub fn get_extension<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Removes and returns a typed extension value.
    pub fn remove_extension<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.extensions
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|b| *b)
    }

    /// Checks if an extension of the given type exists.
    #[must_use]
    pub fn has_extension<T: Send + Sync + 'static>(&self) -> bool {
        self.extensions.contains_key(&TypeId::of::<T>())
    }
}

impl Default for DispatchContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_context() {
        let ctx = DispatchContext::new();
        assert!(ctx.method().is_none());
        assert!(ctx.path().is_none());
        assert!(ctx.handler_id().is_none());
        assert!(ctx.params().is_empty());
    }

    #[test]
    fn test_request_line_setters() {
        let mut ctx = DispatchContext::new();
        ctx.set_method(Method::POST);
        ctx.set_path("/blog/42");
        ctx.set_handler_id("blog.show");

        assert_eq!(ctx.method(), Some(&Method::POST));
        assert_eq!(ctx.path(), Some("/blog/42"));
        assert_eq!(ctx.handler_id(), Some("blog.show"));
    }

    #[test]
    fn test_params_set_after_match() {
        let mut ctx = DispatchContext::new();
        let mut params = Params::new();
        params.push("id", "42");
        ctx.set_params(params);

        assert_eq!(ctx.params().get("id"), Some("42"));
    }

    #[test]
    fn test_extensions() {
        #[derive(Debug, PartialEq)]
        struct Marker(u32);

        let mut ctx = DispatchContext::new();
        assert!(!ctx.has_extension::<Marker>());

        ctx.set_extension(Marker(7));
        assert!(ctx.has_extension::<Marker>());
        assert_eq!(ctx.get_extension::<Marker>(), Some(&Marker(7)));

        assert_eq!(ctx.remove_extension::<Marker>(), Some(Marker(7)));
        assert!(!ctx.has_extension::<Marker>());
    }

    #[test]
    fn test_request_ids_are_unique() {
        assert_ne!(RequestId::new(), RequestId::new());
    }

    #[test]
    fn test_explicit_request_id_preserved() {
        let id = RequestId::new();
        let ctx = DispatchContext::with_request_id(id);
        assert_eq!(ctx.request_id(), id);
    }
}
