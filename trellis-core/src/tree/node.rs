//! Tree Nodes
//!
//! This module defines the node handle used by the in-memory backend.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Generate a new unique node ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a node stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The neutral node. Merging with it is the identity and mounting it
    /// does nothing.
    None,

    /// A grouping node created by the factory.
    Container,

    /// A host element with a label. Elements can hold children.
    Element(String),

    /// Several sibling nodes acting as one. Its parts are never mounted
    /// under the fragment itself; mounting a fragment mounts each part.
    Fragment,
}

struct Inner {
    id: NodeId,
    kind: NodeKind,

    /// Mounted children, or the parts of a fragment.
    children: RefCell<Vec<TreeNode>>,

    parent: RefCell<Weak<Inner>>,
}

/// Shared handle to a node of the in-memory tree.
///
/// Clones refer to the same node.
#[derive(Clone)]
pub struct TreeNode(Rc<Inner>);

impl TreeNode {
    fn with_kind(kind: NodeKind, children: Vec<TreeNode>) -> Self {
        Self(Rc::new(Inner {
            id: NodeId::new(),
            kind,
            children: RefCell::new(children),
            parent: RefCell::new(Weak::new()),
        }))
    }

    pub fn none() -> Self {
        Self::with_kind(NodeKind::None, Vec::new())
    }

    pub fn container() -> Self {
        Self::with_kind(NodeKind::Container, Vec::new())
    }

    pub fn element(label: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::Element(label.into()), Vec::new())
    }

    pub(super) fn fragment(parts: Vec<TreeNode>) -> Self {
        Self::with_kind(NodeKind::Fragment, parts)
    }

    pub fn id(&self) -> NodeId {
        self.0.id
    }

    pub fn kind(&self) -> &NodeKind {
        &self.0.kind
    }

    pub fn is_none(&self) -> bool {
        self.0.kind == NodeKind::None
    }

    /// Whether this node can have children mounted under it.
    pub fn accepts_children(&self) -> bool {
        matches!(self.0.kind, NodeKind::Container | NodeKind::Element(_))
    }

    /// Whether both handles refer to the same node.
    pub fn same(&self, other: &TreeNode) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn children(&self) -> Vec<TreeNode> {
        self.0.children.borrow().clone()
    }

    pub fn parent(&self) -> Option<TreeNode> {
        self.0.parent.borrow().upgrade().map(TreeNode)
    }

    /// The nodes that get mounted when this node is mounted.
    pub fn parts(&self) -> Vec<TreeNode> {
        match self.0.kind {
            NodeKind::None => Vec::new(),
            NodeKind::Fragment => self.children(),
            _ => vec![self.clone()],
        }
    }

    /// Whether `self` is currently mounted directly under `parent`.
    pub fn is_child_of(&self, parent: &TreeNode) -> bool {
        self.parent().is_some_and(|p| p.same(parent))
    }

    /// Remove this node from its parent, if it has one.
    pub fn detach(&self) {
        let parent = self.0.parent.replace(Weak::new()).upgrade();
        if let Some(parent) = parent {
            parent
                .children
                .borrow_mut()
                .retain(|child| !child.same(self));
        }
    }

    /// Mount `child` as the last child of `self`, moving it if it is
    /// mounted elsewhere.
    pub(super) fn push_child(&self, child: &TreeNode) {
        child.detach();
        *child.0.parent.borrow_mut() = Rc::downgrade(&self.0);
        self.0.children.borrow_mut().push(child.clone());
    }

    /// Replace the mounted children with `children`, unmounting the rest.
    pub(super) fn replace_children(&self, children: Vec<TreeNode>) {
        let previous = self.0.children.replace(children);
        for node in previous {
            if !self.0.children.borrow().iter().any(|kept| kept.same(&node)) {
                *node.0.parent.borrow_mut() = Weak::new();
            }
        }
    }

    /// Compact text form: elements by label, containers in `[...]`,
    /// fragments in `{...}`, the neutral node as nothing.
    pub fn render(&self) -> String {
        let inner = || {
            self.0
                .children
                .borrow()
                .iter()
                .map(TreeNode::render)
                .collect::<Vec<_>>()
                .join(" ")
        };

        match &self.0.kind {
            NodeKind::None => String::new(),
            NodeKind::Container => format!("[{}]", inner()),
            NodeKind::Fragment => format!("{{{}}}", inner()),
            NodeKind::Element(label) if self.0.children.borrow().is_empty() => label.clone(),
            NodeKind::Element(label) => format!("{label}[{}]", inner()),
        }
    }
}

impl fmt::Debug for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeNode")
            .field("id", &self.0.id)
            .field("kind", &self.0.kind)
            .field("children", &self.0.children.borrow().len())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
