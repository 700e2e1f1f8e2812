//! Trellis Core
//!
//! This crate provides the container components of the Trellis reactive
//! view-composition layer. It implements:
//!
//! - Reactive primitives (effects, params, signals)
//! - The `Component` lifecycle and its wrapping helpers
//! - Container combinators: `optional`, `cond`, `list`, `group`
//! - An in-memory tree backend
//!
//! The crate never renders anything itself. A host supplies a [`Factory`]
//! that creates, merges and orders its own node type, and drives the
//! resulting component tree by calling `update` once per cycle.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `reactive`: effects, reactive params and writable signals
//! - `component`: the component type, the factory contract and the
//!   container combinators
//! - `tree`: a reference `Factory` over in-memory nodes
//!
//! # Example
//!
//! ```rust
//! use trellis_core::reactive::Signal;
//! use trellis_core::tree::{TreeFactory, TreeNode};
//! use trellis_core::{Component, Containers};
//!
//! let containers = Containers::new(TreeFactory::new());
//! let logged_in = Signal::new(false);
//!
//! let header = containers.cond(
//!     logged_in.param(),
//!     || Component::leaf(TreeNode::element("profile")),
//!     || Component::leaf(TreeNode::element("login")),
//! );
//!
//! header.update().unwrap();
//! assert_eq!(header.node().unwrap().render(), "{[] [login]}");
//! ```

pub mod component;
pub mod error;
pub mod reactive;
pub mod tree;

pub use component::{
    after_dispose, after_update, before_dispose, before_update, create_container_components,
    Component, Containers, Factory, ReconcileOrder, Root,
};
pub use error::{Error, Result};
