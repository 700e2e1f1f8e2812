//! In-Memory Tree Backend
//!
//! A reference [`Factory`] that keeps nodes in memory. It is what the tests
//! and benchmarks run against, and it works as a headless backend for hosts
//! that only need the resulting tree shape.
//!
//! # Semantics
//!
//! - `merge` treats the neutral node as identity and otherwise flattens
//!   both operands into one fragment.
//! - `append` mounts every part of the child, moving parts that are
//!   mounted elsewhere. Only containers and elements accept children.
//! - `order` replaces the parent's children with exactly the given
//!   sequence. Every node in it must already be mounted under the parent;
//!   nodes left out are unmounted.
//!
//! Mutating operations are recorded in a journal so tests can check what
//! the containers asked for.

mod node;

pub use node::{NodeId, NodeKind, TreeNode};

use std::cell::RefCell;

use thiserror::Error;

use crate::component::Factory;

/// Failure of a tree operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("node {0} cannot hold children")]
    NotAContainer(NodeId),

    #[error("node {child} is not mounted under {parent}")]
    NotMounted { parent: NodeId, child: NodeId },
}

/// A recorded mutating operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeOp {
    Container(NodeId),
    Append { parent: NodeId, child: NodeId },
    Order { parent: NodeId, children: Vec<NodeId> },
}

/// In-memory [`Factory`] producing [`TreeNode`]s.
#[derive(Debug, Default)]
pub struct TreeFactory {
    journal: RefCell<Vec<TreeOp>>,
}

impl TreeFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Operations performed so far, oldest first.
    pub fn journal(&self) -> Vec<TreeOp> {
        self.journal.borrow().clone()
    }

    pub fn clear_journal(&self) {
        self.journal.borrow_mut().clear();
    }

    fn record(&self, op: TreeOp) {
        self.journal.borrow_mut().push(op);
    }
}

impl Factory for TreeFactory {
    type Node = TreeNode;
    type Error = TreeError;

    fn none(&self) -> TreeNode {
        TreeNode::none()
    }

    fn container(&self) -> TreeNode {
        let node = TreeNode::container();
        self.record(TreeOp::Container(node.id()));
        node
    }

    fn append(&self, parent: &TreeNode, child: &TreeNode) -> Result<(), TreeError> {
        if !parent.accepts_children() {
            return Err(TreeError::NotAContainer(parent.id()));
        }

        for part in child.parts() {
            parent.push_child(&part);
        }
        self.record(TreeOp::Append {
            parent: parent.id(),
            child: child.id(),
        });
        Ok(())
    }

    fn order(&self, parent: &TreeNode, children: &[TreeNode]) -> Result<(), TreeError> {
        if !parent.accepts_children() {
            return Err(TreeError::NotAContainer(parent.id()));
        }

        let parts: Vec<TreeNode> = children.iter().flat_map(TreeNode::parts).collect();
        if let Some(stray) = parts.iter().find(|part| !part.is_child_of(parent)) {
            return Err(TreeError::NotMounted {
                parent: parent.id(),
                child: stray.id(),
            });
        }

        self.record(TreeOp::Order {
            parent: parent.id(),
            children: parts.iter().map(TreeNode::id).collect(),
        });
        parent.replace_children(parts);
        Ok(())
    }

    fn merge(&self, a: TreeNode, b: TreeNode) -> TreeNode {
        if a.is_none() {
            return b;
        }
        if b.is_none() {
            return a;
        }

        let mut parts = a.parts();
        parts.extend(b.parts());
        TreeNode::fragment(parts)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
