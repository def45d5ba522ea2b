//! The hook trait and its control-flow result.
//!
//! A hook is a unit of cross-cutting behavior invoked at a lifecycle
//! point. Each hook receives the in-flight payload, may transform it, and
//! decides whether the chain continues. Halting is a structural result —
//! [`Flow::Halt`] — not a shared flag: a halt stops the remaining hooks at
//! the *current* point, and the dispatcher checks each chain's outcome to
//! decide whether the rest of the pipeline runs.

use daedalus_core::DispatchContext;
use serde_json::Value;

/// The outcome of one hook, or of a whole chain fold.
///
/// Both variants carry the payload: a halting hook still returns its
/// (possibly transformed) data, and every transformation made before the
/// halt is preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Pass the payload to the next hook (or out of the chain).
    Continue(Value),
    /// Stop the remaining hooks at this point.
    Halt(Value),
}

impl Flow {
    /// Returns the carried payload, consuming the flow.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Continue(value) | Self::Halt(value) => value,
        }
    }

    /// Returns the carried payload by reference.
    #[must_use]
    pub fn value(&self) -> &Value {
        match self {
            Self::Continue(value) | Self::Halt(value) => value,
        }
    }

    /// Returns true for [`Flow::Halt`].
    #[must_use]
    pub const fn is_halt(&self) -> bool {
        matches!(self, Self::Halt(_))
    }
}

/// A unit of cross-cutting behavior invoked at a lifecycle point.
///
/// Implementations must not keep per-request state in their own fields:
/// resolved instances are cached and reused across every trigger in the
/// execution scope. Request-scoped data belongs in the
/// [`DispatchContext`] extensions.
///
/// # Errors
///
/// A returned error is caught by the chain, logged, and treated as if the
/// hook had returned its input unchanged; it never aborts the remaining
/// chain.
///
/// # Example
///
/// ```
/// use daedalus_core::DispatchContext;
/// use daedalus_hooks::{Flow, Hook};
/// use serde_json::Value;
///
/// struct Tag;
///
/// impl Hook for Tag {
///     fn name(&self) -> &str {
///         "tag"
///     }
///
///     fn handle(&self, _ctx: &mut DispatchContext, mut payload: Value) -> anyhow::Result<Flow> {
///         if let Some(map) = payload.as_object_mut() {
///             map.insert("tagged".into(), Value::Bool(true));
///         }
///         Ok(Flow::Continue(payload))
///     }
/// }
/// ```
pub trait Hook: Send + Sync {
    /// The hook's name, used for logging and diagnostics.
    fn name(&self) -> &str;

    /// Processes the in-flight payload.
    fn handle(&self, ctx: &mut DispatchContext, payload: Value) -> anyhow::Result<Flow>;
}

/// A hook built from a closure.
///
/// # Example
///
/// ```
/// use daedalus_hooks::{Flow, FnHook};
/// use serde_json::json;
///
/// let hook = FnHook::new("stamp", |_ctx, mut payload| {
///     payload["stamped"] = json!(true);
///     Ok(Flow::Continue(payload))
/// });
/// ```
pub struct FnHook<F> {
    name: String,
    func: F,
}

impl<F> FnHook<F>
where
    F: Fn(&mut DispatchContext, Value) -> anyhow::Result<Flow> + Send + Sync,
{
    /// Creates a new closure-based hook.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Hook for FnHook<F>
where
    F: Fn(&mut DispatchContext, Value) -> anyhow::Result<Flow> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn handle(&self, ctx: &mut DispatchContext, payload: Value) -> anyhow::Result<Flow> {
        (self.func)(ctx, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flow_accessors() {
        let cont = Flow::Continue(json!(1));
        let halt = Flow::Halt(json!(2));

        assert!(!cont.is_halt());
        assert!(halt.is_halt());
        assert_eq!(cont.value(), &json!(1));
        assert_eq!(halt.into_value(), json!(2));
    }

    #[test]
    fn test_fn_hook_transforms_payload() {
        let hook = FnHook::new("double", |_ctx, payload| {
            let n = payload.as_i64().unwrap_or(0);
            Ok(Flow::Continue(json!(n * 2)))
        });

        let mut ctx = DispatchContext::new();
        let out = hook.handle(&mut ctx, json!(21)).unwrap();
        assert_eq!(out, Flow::Continue(json!(42)));
        assert_eq!(hook.name(), "double");
    }

    #[test]
    fn test_fn_hook_can_halt() {
        let hook = FnHook::new("gate", |_ctx, payload| Ok(Flow::Halt(payload)));

        let mut ctx = DispatchContext::new();
        let out = hook.handle(&mut ctx, json!("stop")).unwrap();
        assert!(out.is_halt());
    }
}
