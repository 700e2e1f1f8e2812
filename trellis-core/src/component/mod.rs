//! Components
//!
//! A [`Component`] is the unit every container produces and consumes: an
//! optional tree node plus an `update` effect and a `dispose` effect.
//!
//! # Lifecycle
//!
//! 1. A component is built, usually by nesting calls on [`Containers`].
//!
//! 2. The host calls `update` once per cycle. Dynamic containers first
//!    apply structural changes (mount, unmount, reorder), then forward the
//!    call to every child that is currently mounted.
//!
//! 3. The host calls `dispose` once. Containers dispose their mounted
//!    children recursively. A disposed dynamic container refuses further
//!    updates with [`Error::Disposed`](crate::Error::Disposed).
//!
//! # Wrapping
//!
//! The `before_*`/`after_*` helpers return a new component with an extra
//! effect composed around one of the lifecycle effects. The node is kept
//! as is.

mod containers;
mod factory;
mod list;
mod root;

pub use containers::{create_container_components, Containers, ReconcileOrder};
pub use factory::Factory;
pub use root::Root;

use std::fmt;

use crate::error::Result;
use crate::reactive::{compose, Effect};

/// A node-bearing unit with an update and a dispose lifecycle.
#[derive(Clone)]
pub struct Component<N> {
    node: Option<N>,
    update: Effect,
    dispose: Effect,
}

impl<N> Component<N> {
    /// Assemble a component from its parts.
    pub fn new(node: Option<N>, update: Effect, dispose: Effect) -> Self {
        Self {
            node,
            update,
            dispose,
        }
    }

    /// A component with no node whose effects do nothing.
    pub fn empty() -> Self {
        Self::new(None, Effect::noop(), Effect::noop())
    }

    /// A static node with no-op effects.
    pub fn leaf(node: N) -> Self {
        Self::new(Some(node), Effect::noop(), Effect::noop())
    }

    /// The node this component contributes, if any.
    pub fn node(&self) -> Option<&N> {
        self.node.as_ref()
    }

    pub fn update_effect(&self) -> &Effect {
        &self.update
    }

    pub fn dispose_effect(&self) -> &Effect {
        &self.dispose
    }

    /// Run one update cycle.
    pub fn update(&self) -> Result<()> {
        self.update.run()
    }

    /// Release the component and everything mounted under it.
    pub fn dispose(&self) -> Result<()> {
        self.dispose.run()
    }

    pub fn into_parts(self) -> (Option<N>, Effect, Effect) {
        (self.node, self.update, self.dispose)
    }

    /// Run `effect` before every update.
    pub fn before_update(self, effect: Effect) -> Self {
        Self {
            update: compose([effect, self.update]),
            ..self
        }
    }

    /// Run `effect` after every update.
    pub fn after_update(self, effect: Effect) -> Self {
        Self {
            update: compose([self.update, effect]),
            ..self
        }
    }

    /// Run `effect` before disposal.
    pub fn before_dispose(self, effect: Effect) -> Self {
        Self {
            dispose: compose([effect, self.dispose]),
            ..self
        }
    }

    /// Run `effect` after disposal.
    pub fn after_dispose(self, effect: Effect) -> Self {
        Self {
            dispose: compose([self.dispose, effect]),
            ..self
        }
    }
}

impl<N> Default for Component<N> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<N> fmt::Debug for Component<N>
where
    N: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("node", &self.node)
            .field("update", &self.update)
            .field("dispose", &self.dispose)
            .finish()
    }
}

/// Wrap `component` so that `effect` runs before its update.
pub fn before_update<N: Clone>(component: &Component<N>, effect: Effect) -> Component<N> {
    component.clone().before_update(effect)
}

/// Wrap `component` so that `effect` runs after its update.
pub fn after_update<N: Clone>(component: &Component<N>, effect: Effect) -> Component<N> {
    component.clone().after_update(effect)
}

/// Wrap `component` so that `effect` runs before its disposal.
pub fn before_dispose<N: Clone>(component: &Component<N>, effect: Effect) -> Component<N> {
    component.clone().before_dispose(effect)
}

/// Wrap `component` so that `effect` runs after its disposal.
pub fn after_dispose<N: Clone>(component: &Component<N>, effect: Effect) -> Component<N> {
    component.clone().after_dispose(effect)
}

/// Dispose every component, even after a failure, and return the first
/// error.
pub(crate) fn dispose_all<'a, N: 'a>(
    components: impl IntoIterator<Item = &'a Component<N>>,
) -> Result<()> {
    let mut first = None;
    for component in components {
        if let Err(err) = component.dispose() {
            first.get_or_insert(err);
        }
    }
    first.map_or(Ok(()), Err)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
