//! Group context: registration-time scopes that contribute a shared path
//! prefix and hook list to every route registered inside them.
//!
//! The effective prefix for a route is the concatenation of all active
//! frames outermost to innermost; the effective hook list is the
//! concatenation in the same order, with route-level hooks appended last by
//! the registry. The merged result for the current stack state is cached
//! and invalidated on every push or pop.

/// Attributes contributed by one group scope.
///
/// # Example
///
/// ```
/// use daedalus_router::GroupAttributes;
///
/// let attrs = GroupAttributes::new().prefix("/admin").hooks(["auth"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GroupAttributes {
    prefix: Option<String>,
    hooks: Vec<String>,
}

impl GroupAttributes {
    /// Creates empty attributes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the path prefix fragment for this group.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Sets the hook names attached to every route in this group.
    #[must_use]
    pub fn hooks<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hooks = names.into_iter().map(Into::into).collect();
        self
    }

    pub(crate) fn into_frame(self) -> GroupFrame {
        GroupFrame {
            prefix: self.prefix.unwrap_or_default(),
            hooks: self.hooks,
        }
    }
}

/// One active group scope on the stack.
#[derive(Debug, Clone)]
pub(crate) struct GroupFrame {
    pub(crate) prefix: String,
    pub(crate) hooks: Vec<String>,
}

/// The merged attributes for the current stack state.
#[derive(Debug, Clone, Default)]
pub(crate) struct MergedAttributes {
    pub(crate) prefix: String,
    pub(crate) hooks: Vec<String>,
}

/// Stack of active group frames plus the memoized merge.
///
/// Not re-entrant: the stack and its cache must not be shared across
/// concurrently-executing registration calls.
#[derive(Debug, Default)]
pub(crate) struct GroupStack {
    frames: Vec<GroupFrame>,
    merged: Option<MergedAttributes>,
}

impl GroupStack {
    pub(crate) fn push(&mut self, frame: GroupFrame) {
        self.frames.push(frame);
        self.merged = None;
    }

    pub(crate) fn pop(&mut self) {
        self.frames.pop();
        self.merged = None;
    }

    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Returns the merged attributes for the current stack, computing and
    /// caching them on first use after a push or pop.
    pub(crate) fn merged(&mut self) -> &MergedAttributes {
        if self.merged.is_none() {
            let mut prefix = String::new();
            let mut hooks = Vec::new();
            for frame in &self.frames {
                prefix.push_str(&frame.prefix);
                hooks.extend(frame.hooks.iter().cloned());
            }
            self.merged = Some(MergedAttributes { prefix, hooks });
        }
        self.merged
            .as_ref()
            .expect("merged attributes computed above")
    }
}
