//! Host backend contract.

/// Node-tree primitives supplied by the host (DOM, native widgets, a
/// terminal buffer, ...).
///
/// Nodes are opaque handles. They are cloned freely, so a backend should
/// make `Node` a cheap reference type.
///
/// Expectations:
///
/// - `merge` can be folded left to right starting from `none()`.
/// - `order` called twice with the same sequence leaves the tree unchanged.
/// - `none()` is safe to pass to `merge` and `append`.
pub trait Factory: 'static {
    /// Opaque tree node.
    type Node: Clone + 'static;

    /// Failure reported by `append` or `order`.
    type Error: std::error::Error + 'static;

    /// A neutral node, usable as a `merge` operand.
    fn none(&self) -> Self::Node;

    /// A new, empty grouping node.
    fn container(&self) -> Self::Node;

    /// Mount `child` under `parent`.
    fn append(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), Self::Error>;

    /// Rearrange the children of `parent` to exactly match `children`.
    fn order(&self, parent: &Self::Node, children: &[Self::Node]) -> Result<(), Self::Error>;

    /// A single logical node standing for both `a` and `b`.
    fn merge(&self, a: Self::Node, b: Self::Node) -> Self::Node;
}
