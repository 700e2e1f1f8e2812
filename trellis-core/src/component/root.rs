//! Top-level driver for a component tree.
//!
//! The host owns the update loop. `Root` is the handle it drives: one
//! `update` per cycle, then a final `dispose` that consumes the root so the
//! tree cannot be updated afterwards.

use tracing::debug_span;

use super::factory::Factory;
use super::Component;
use crate::error::{Error, Result};

/// Owner of a mounted component tree.
#[derive(Debug)]
pub struct Root<N> {
    component: Component<N>,
    ticks: u64,
}

impl<N> Root<N> {
    pub fn new(component: Component<N>) -> Self {
        Self {
            component,
            ticks: 0,
        }
    }

    /// Append the component's node under a host-owned `parent` and take
    /// ownership of the tree.
    pub fn mount<F>(factory: &F, parent: &N, component: Component<N>) -> Result<Self>
    where
        F: Factory<Node = N>,
    {
        if let Some(node) = component.node() {
            factory
                .append(parent, node)
                .map_err(Error::factory("append"))?;
        }
        Ok(Self::new(component))
    }

    pub fn node(&self) -> Option<&N> {
        self.component.node()
    }

    /// Number of update cycles that completed successfully.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run one update cycle over the whole tree.
    pub fn update(&mut self) -> Result<()> {
        let span = debug_span!("update", tick = self.ticks);
        let _enter = span.enter();

        self.component.update()?;
        self.ticks += 1;
        Ok(())
    }

    /// Dispose the tree.
    pub fn dispose(self) -> Result<()> {
        let _enter = debug_span!("dispose", ticks = self.ticks).entered();
        self.component.dispose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Containers;
    use crate::reactive::Signal;
    use crate::tree::{TreeFactory, TreeNode};

    #[test]
    fn mount_appends_under_parent() {
        let factory = TreeFactory::new();
        let parent = TreeNode::element("app");

        let root = Root::mount(&factory, &parent, Component::leaf(TreeNode::element("body"))).unwrap();
        assert_eq!(parent.render(), "app[body]");
        assert!(root.node().is_some());
    }

    #[test]
    fn mount_fails_on_leaf_parent() {
        let factory = TreeFactory::new();
        let parent = TreeNode::none();

        let result = Root::mount(&factory, &parent, Component::leaf(TreeNode::element("body")));
        assert!(matches!(result, Err(Error::Factory { op: "append", .. })));
    }

    #[test]
    fn update_counts_ticks() {
        let containers = Containers::new(TreeFactory::new());
        let visible = Signal::new(false);
        let mut root = Root::new(containers.optional(visible.param(), || {
            Component::leaf(TreeNode::element("shown"))
        }));

        root.update().unwrap();
        visible.set(true);
        root.update().unwrap();

        assert_eq!(root.ticks(), 2);
        assert_eq!(root.node().unwrap().render(), "[shown]");
        root.dispose().unwrap();
    }
}
