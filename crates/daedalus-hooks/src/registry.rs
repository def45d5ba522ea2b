//! The hook registry.
//!
//! Stores, per lifecycle point, a priority-ordered chain of hook entries.
//! Entries are either inline hooks (registered ready-made) or named
//! descriptors that are lazily constructed on first use and cached for the
//! rest of the execution scope. Triggering a point folds the payload
//! through the chain left to right; a [`Flow::Halt`] stops the remaining
//! entries at that point.
//!
//! Registration takes `&mut self` and happens during warm-up; triggering
//! takes `&self`, so a warmed registry can be shared as a read-only
//! snapshot. The two lazy caches that must survive `&self` triggering
//! (the per-point sort cache and the resolved-instance cache) sit behind
//! `parking_lot` locks.

use crate::hook::{Flow, Hook};
use crate::point::LifecyclePoint;
use daedalus_core::DispatchContext;
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Priority assigned when the caller does not specify one.
///
/// Lower priorities run earlier; ties preserve registration order.
pub const DEFAULT_PRIORITY: i32 = 10;

/// Errors from named-hook resolution.
#[derive(Debug, Error)]
pub enum HookError {
    /// No descriptor is registered under the alias.
    #[error("unknown hook alias: {alias}")]
    UnknownAlias {
        /// The alias that failed to resolve.
        alias: String,
    },

    /// The descriptor's factory failed.
    #[error("failed to construct hook {alias}: {source}")]
    Construction {
        /// The alias whose factory failed.
        alias: String,
        /// The factory's error.
        #[source]
        source: anyhow::Error,
    },
}

/// Factory for a named hook: receives the descriptor's constructor params.
pub type HookFactory = Box<dyn Fn(&Value) -> anyhow::Result<Box<dyn Hook>> + Send + Sync>;

/// A named, lazily-resolved hook descriptor.
struct NamedHook {
    point: LifecyclePoint,
    priority: i32,
    params: Value,
    factory: HookFactory,
}

/// What a chain entry runs: a ready-made hook or a named descriptor.
#[derive(Clone)]
enum HookAction {
    Inline(Arc<dyn Hook>),
    Named(String),
}

#[derive(Clone)]
struct ChainEntry {
    priority: i32,
    action: HookAction,
}

/// One lifecycle point's chain, with its cached sort state.
#[derive(Default)]
struct PointChain {
    entries: Vec<ChainEntry>,
    sorted: bool,
}

impl PointChain {
    /// Returns the entries in priority order, sorting at most once per
    /// registration generation. The sort is stable, so equal priorities
    /// keep registration order.
    fn sorted_entries(&mut self) -> Vec<ChainEntry> {
        if !self.sorted {
            self.entries.sort_by_key(|entry| entry.priority);
            self.sorted = true;
        }
        self.entries.clone()
    }
}

/// Per-lifecycle-point hook storage and dispatch.
///
/// # Example
///
/// ```
/// use daedalus_core::DispatchContext;
/// use daedalus_hooks::{Flow, FnHook, HookRegistry, LifecyclePoint, DEFAULT_PRIORITY};
/// use serde_json::json;
///
/// let mut hooks = HookRegistry::new();
/// hooks.register(
///     LifecyclePoint::BeforeRouting,
///     FnHook::new("stamp", |_ctx, mut payload| {
///         payload["stamped"] = json!(true);
///         Ok(Flow::Continue(payload))
///     }),
///     DEFAULT_PRIORITY,
/// );
///
/// let mut ctx = DispatchContext::new();
/// let flow = hooks.trigger(LifecyclePoint::BeforeRouting, &mut ctx, json!({}));
/// assert_eq!(flow.into_value(), json!({ "stamped": true }));
/// ```
#[derive(Default)]
pub struct HookRegistry {
    chains: IndexMap<LifecyclePoint, Mutex<PointChain>>,
    named: IndexMap<String, NamedHook>,
    resolved: Mutex<HashMap<String, Arc<dyn Hook>>>,
    route_hooks: HashMap<(String, String), Vec<String>>,
}

impl HookRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an inline hook at a lifecycle point.
    pub fn register(
        &mut self,
        point: LifecyclePoint,
        hook: impl Hook + 'static,
        priority: i32,
    ) {
        self.push_entry(point, priority, HookAction::Inline(Arc::new(hook)));
    }

    /// Registers a named, lazily-resolved hook descriptor.
    ///
    /// The factory is *not* invoked here; construction happens on the
    /// first [`resolve`](Self::resolve) — typically the first trigger that
    /// reaches the alias — with `params` as the constructor arguments, and
    /// the instance is cached under `alias` afterwards. Re-registering an
    /// alias replaces the descriptor and drops any cached instance.
    ///
    /// Registration alone does not enlist the hook anywhere: route
    /// attachments reference the alias via
    /// [`attach_to_route`](Self::attach_to_route), and
    /// [`register_alias`](Self::register_alias) enlists it in the global
    /// chain of its declared point.
    pub fn register_named(
        &mut self,
        alias: impl Into<String>,
        point: LifecyclePoint,
        priority: i32,
        params: Value,
        factory: HookFactory,
    ) {
        let alias = alias.into();
        self.resolved.get_mut().remove(&alias);
        self.named.insert(
            alias,
            NamedHook {
                point,
                priority,
                params,
                factory,
            },
        );
    }

    /// Enlists a named hook in the global chain of its declared point,
    /// with its declared priority.
    pub fn register_alias(&mut self, alias: &str) -> Result<(), HookError> {
        let (point, priority) = {
            let named = self.named.get(alias).ok_or_else(|| HookError::UnknownAlias {
                alias: alias.to_string(),
            })?;
            (named.point, named.priority)
        };
        self.push_entry(point, priority, HookAction::Named(alias.to_string()));
        Ok(())
    }

    fn push_entry(&mut self, point: LifecyclePoint, priority: i32, action: HookAction) {
        let chain = self.chains.entry(point).or_default().get_mut();
        chain.entries.push(ChainEntry { priority, action });
        chain.sorted = false;
    }

    /// Resolves a named hook, constructing and caching it on first use.
    pub fn resolve(&self, alias: &str) -> Result<Arc<dyn Hook>, HookError> {
        if let Some(hook) = self.resolved.lock().get(alias) {
            return Ok(Arc::clone(hook));
        }
        let named = self.named.get(alias).ok_or_else(|| HookError::UnknownAlias {
            alias: alias.to_string(),
        })?;
        let hook = (named.factory)(&named.params).map_err(|source| HookError::Construction {
            alias: alias.to_string(),
            source,
        })?;
        let hook: Arc<dyn Hook> = Arc::from(hook);
        tracing::debug!(alias, point = %named.point, "named hook resolved");
        self.resolved
            .lock()
            .insert(alias.to_string(), Arc::clone(&hook));
        Ok(hook)
    }

    /// Records named hooks for an exact (method, pattern) pair.
    ///
    /// These fire through [`trigger_route_hooks`](Self::trigger_route_hooks)
    /// for the matched route, distinct from global lifecycle firing.
    /// Repeated attachment to the same pair appends.
    pub fn attach_to_route<I, S>(&mut self, method: &str, pattern: &str, hook_names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.route_hooks
            .entry((method.to_string(), pattern.to_string()))
            .or_default()
            .extend(hook_names.into_iter().map(Into::into));
    }

    /// Returns the hook names attached to an exact (method, pattern) pair.
    #[must_use]
    pub fn attached_to_route(&self, method: &str, pattern: &str) -> Option<&[String]> {
        self.route_hooks
            .get(&(method.to_string(), pattern.to_string()))
            .map(Vec::as_slice)
    }

    /// Fires a lifecycle point, folding the payload through its chain.
    ///
    /// With no entries registered for the point the payload is returned
    /// unchanged without sorting or allocation. Otherwise entries run in
    /// ascending priority order (stable on ties); each receives the
    /// previous entry's output, a [`Flow::Halt`] stops the loop with every
    /// prior transformation preserved, and an erroring entry is logged and
    /// skipped with its input intact.
    pub fn trigger(
        &self,
        point: LifecyclePoint,
        ctx: &mut DispatchContext,
        payload: Value,
    ) -> Flow {
        let Some(cell) = self.chains.get(&point) else {
            return Flow::Continue(payload);
        };
        let entries = {
            let mut chain = cell.lock();
            if chain.entries.is_empty() {
                return Flow::Continue(payload);
            }
            chain.sorted_entries()
        };
        self.fold(point.as_str(), &entries, ctx, payload)
    }

    /// Fires the hooks attached to an exact (method, pattern) pair.
    ///
    /// The attached list carries group hooks before route-level hooks (the
    /// route registry builds it that way); before folding it is stably
    /// sorted by each named hook's registered priority, so equal
    /// priorities preserve the group-then-route order.
    pub fn trigger_route_hooks(
        &self,
        method: &str,
        pattern: &str,
        ctx: &mut DispatchContext,
        payload: Value,
    ) -> Flow {
        let Some(names) = self
            .route_hooks
            .get(&(method.to_string(), pattern.to_string()))
        else {
            return Flow::Continue(payload);
        };
        if names.is_empty() {
            return Flow::Continue(payload);
        }

        let mut entries: Vec<ChainEntry> = names
            .iter()
            .map(|name| ChainEntry {
                priority: self
                    .named
                    .get(name)
                    .map_or(DEFAULT_PRIORITY, |named| named.priority),
                action: HookAction::Named(name.clone()),
            })
            .collect();
        entries.sort_by_key(|entry| entry.priority);

        self.fold(pattern, &entries, ctx, payload)
    }

    fn fold(
        &self,
        chain_label: &str,
        entries: &[ChainEntry],
        ctx: &mut DispatchContext,
        mut payload: Value,
    ) -> Flow {
        for entry in entries {
            let hook = match &entry.action {
                HookAction::Inline(hook) => Arc::clone(hook),
                HookAction::Named(alias) => match self.resolve(alias) {
                    Ok(hook) => hook,
                    Err(err) => {
                        tracing::warn!(
                            chain = chain_label,
                            alias = %alias,
                            error = %err,
                            "named hook unavailable; continuing chain"
                        );
                        continue;
                    }
                },
            };
            // The input is kept so a failing hook leaves it unchanged.
            match hook.handle(ctx, payload.clone()) {
                Ok(Flow::Continue(next)) => payload = next,
                Ok(Flow::Halt(out)) => {
                    tracing::debug!(chain = chain_label, hook = hook.name(), "chain halted");
                    return Flow::Halt(out);
                }
                Err(err) => {
                    tracing::warn!(
                        chain = chain_label,
                        hook = hook.name(),
                        error = %err,
                        "hook failed; continuing with unchanged payload"
                    );
                }
            }
        }
        Flow::Continue(payload)
    }

    /// Returns the number of entries registered at a point.
    #[must_use]
    pub fn chain_len(&self, point: LifecyclePoint) -> usize {
        self.chains
            .get(&point)
            .map_or(0, |cell| cell.lock().entries.len())
    }

    /// Returns true if any entry is registered at the point.
    #[must_use]
    pub fn has_entries(&self, point: LifecyclePoint) -> bool {
        self.chain_len(point) > 0
    }

    /// Returns the hook names at a point, in the order they would run.
    ///
    /// Named entries that have not been resolved yet are listed by alias.
    #[must_use]
    pub fn hook_names(&self, point: LifecyclePoint) -> Vec<String> {
        let Some(cell) = self.chains.get(&point) else {
            return Vec::new();
        };
        let entries = cell.lock().sorted_entries();
        entries
            .iter()
            .map(|entry| match &entry.action {
                HookAction::Inline(hook) => hook.name().to_string(),
                HookAction::Named(alias) => alias.clone(),
            })
            .collect()
    }

    /// Returns the points that have at least one registered entry, in
    /// registration order.
    pub fn points(&self) -> impl Iterator<Item = LifecyclePoint> + '_ {
        self.chains.keys().copied()
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("points", &self.chains.keys().collect::<Vec<_>>())
            .field("named", &self.named.keys().collect::<Vec<_>>())
            .field("route_hooks", &self.route_hooks.keys().collect::<Vec<_>>())
            .finish()
    }
}
