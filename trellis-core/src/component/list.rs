//! Keyed List Reconciliation
//!
//! `list` keeps one child component per key of a reactive sequence. Keys
//! come from a caller-supplied function of `(value, index)` and decide
//! which children survive an update.
//!
//! # Algorithm
//!
//! Each time the items change:
//!
//! 1. Walk the snapshot in order, computing each item's key.
//! 2. Store the item in its key's slot. Existing slots are overwritten, so
//!    the latest value always wins.
//! 3. Create a child for every key without one. The child receives a live
//!    param reading its slot, so later value changes reach it without a
//!    rebuild. Its node is appended to the container right away.
//! 4. Remove and dispose every child whose key is no longer present.
//! 5. Hand the surviving nodes to `Factory::order`.
//!
//! Duplicate keys in one snapshot collapse into a single child holding the
//! last value, placed at the first occurrence.

use std::cell::RefCell;
use std::hash::Hash;
use std::rc::Rc;

use indexmap::map::Entry;
use indexmap::{IndexMap, IndexSet};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use super::containers::{Containers, ReconcileOrder};
use super::factory::Factory;
use super::{dispose_all, Component};
use crate::error::{Error, Result};
use crate::reactive::{Effect, Param};

/// Latest value for one key, shared with that key's child.
type Slot<T> = Rc<RefCell<T>>;

/// Reconciliation state owned by one `list` component.
pub(super) struct ListState<K, T, N> {
    container: N,
    children: IndexMap<K, Component<N>>,
    values: IndexMap<K, Slot<T>>,
    disposed: bool,
}

/// What one reconciliation pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct Reconciled {
    pub live: usize,
    pub created: usize,
    pub removed: usize,
}

impl<K, T, N> ListState<K, T, N>
where
    K: Hash + Eq + Clone,
    T: Clone + 'static,
    N: Clone,
{
    pub fn new(container: N) -> Self {
        Self {
            container,
            children: IndexMap::new(),
            values: IndexMap::new(),
            disposed: false,
        }
    }

    /// Bring the children in line with `items`.
    pub fn reconcile<F, KF, C>(
        &mut self,
        factory: &F,
        order: ReconcileOrder,
        items: &[T],
        key: &KF,
        create: &C,
    ) -> Result<Reconciled>
    where
        F: Factory<Node = N>,
        KF: Fn(&T, usize) -> K,
        C: Fn(Param<T>) -> Component<N>,
    {
        let mut live: IndexSet<K> = IndexSet::with_capacity(items.len());
        let mut created = 0;

        for (index, value) in items.iter().enumerate() {
            let k = key(value, index);
            live.insert(k.clone());

            let slot = match self.values.entry(k.clone()) {
                Entry::Occupied(entry) => {
                    *entry.get().borrow_mut() = value.clone();
                    Rc::clone(entry.get())
                }
                Entry::Vacant(entry) => Rc::clone(entry.insert(Rc::new(RefCell::new(value.clone())))),
            };

            if !self.children.contains_key(&k) {
                trace!(index, "creating keyed child");
                let child = create(Param::live(move || slot.borrow().clone()));
                let node = child.node().cloned();
                self.children.insert(k, child);
                created += 1;
                if let Some(node) = node {
                    factory
                        .append(&self.container, &node)
                        .map_err(Error::factory("append"))?;
                }
            }
        }

        let stale: Vec<K> = self
            .children
            .keys()
            .filter(|k| !live.contains(*k))
            .cloned()
            .collect();

        let mut removed = Vec::with_capacity(stale.len());
        for k in &stale {
            self.values.shift_remove(k);
            if let Some(child) = self.children.shift_remove(k) {
                removed.push(child);
            }
        }
        trace!(count = removed.len(), "disposing keyed children");
        dispose_all(&removed)?;

        if order == ReconcileOrder::Declared {
            self.children
                .sort_by(|a, _, b, _| live.get_index_of(a).cmp(&live.get_index_of(b)));
        }

        let nodes: SmallVec<[N; 8]> = self
            .children
            .values()
            .filter_map(|child| child.node().cloned())
            .collect();
        factory
            .order(&self.container, &nodes)
            .map_err(Error::factory("order"))?;

        Ok(Reconciled {
            live: self.children.len(),
            created,
            removed: stale.len(),
        })
    }

    /// Update effects of the live children, in map order.
    pub fn child_updates(&self) -> SmallVec<[Effect; 8]> {
        self.children
            .values()
            .map(|child| child.update_effect().clone())
            .collect()
    }

    /// Mark the list disposed and hand back every live child.
    pub fn take_children(&mut self) -> IndexMap<K, Component<N>> {
        self.disposed = true;
        self.values.clear();
        std::mem::take(&mut self.children)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    #[cfg(test)]
    fn keys(&self) -> Vec<K> {
        self.children.keys().cloned().collect()
    }
}

impl<F: Factory> Containers<F> {
    /// Keep one child per key of `items`.
    ///
    /// `key` maps each item and its index to a stable identity. `create`
    /// builds the child for a new key; the param it receives always reads
    /// the latest value stored under that key.
    ///
    /// # Example
    ///
    /// ```rust
    /// use trellis_core::reactive::Signal;
    /// use trellis_core::tree::{TreeFactory, TreeNode};
    /// use trellis_core::{Component, Containers};
    ///
    /// let containers = Containers::new(TreeFactory::new());
    /// let items = Signal::new(vec!["a", "b"]);
    ///
    /// let list = containers.list(items.param(), |item, _| *item, |item| {
    ///     Component::leaf(TreeNode::element(item.get()))
    /// });
    /// list.update().unwrap();
    /// assert_eq!(list.node().unwrap().render(), "[a b]");
    ///
    /// items.set(vec!["b", "c"]);
    /// list.update().unwrap();
    /// assert_eq!(list.node().unwrap().render(), "[b c]");
    /// ```
    pub fn list<T, K, KF, C>(&self, items: Param<Vec<T>>, key: KF, create: C) -> Component<F::Node>
    where
        T: Clone + PartialEq + 'static,
        K: Hash + Eq + Clone + 'static,
        KF: Fn(&T, usize) -> K + 'static,
        C: Fn(Param<T>) -> Component<F::Node> + 'static,
    {
        let container = self.factory.container();
        let state: Rc<RefCell<ListState<K, T, F::Node>>> =
            Rc::new(RefCell::new(ListState::new(container.clone())));

        let subscription = {
            let factory = Rc::clone(&self.factory);
            let state = Rc::clone(&state);
            let order = self.order;

            items.changes(move |_, items| {
                let outcome = state
                    .borrow_mut()
                    .reconcile(&*factory, order, items, &key, &create)?;
                debug!(
                    live = outcome.live,
                    created = outcome.created,
                    removed = outcome.removed,
                    "reconciled keyed list"
                );
                Ok(())
            })
        };

        let update = {
            let state = Rc::clone(&state);
            Effect::new(move || {
                if state.borrow().is_disposed() {
                    warn!("update called on a disposed list component");
                    return Err(Error::Disposed);
                }
                subscription.run()?;

                let updates = state.borrow().child_updates();
                updates.iter().try_for_each(Effect::run)
            })
        };

        let dispose = Effect::new(move || {
            let children = state.borrow_mut().take_children();
            dispose_all(children.values())
        });

        Component::new(Some(container), update, dispose)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::Signal;
    use crate::tree::{TreeFactory, TreeNode, TreeOp};
    use std::cell::Cell;
    use std::collections::HashMap;

    #[derive(Clone, Debug, PartialEq)]
    struct Item {
        id: u32,
        label: &'static str,
    }

    fn item(id: u32, label: &'static str) -> Item {
        Item { id, label }
    }

    /// Per-id creation and disposal counters.
    #[derive(Default)]
    struct Tally {
        created: RefCell<HashMap<u32, usize>>,
        disposed: RefCell<HashMap<u32, usize>>,
        seen: RefCell<HashMap<u32, &'static str>>,
    }

    impl Tally {
        fn created(&self, id: u32) -> usize {
            self.created.borrow().get(&id).copied().unwrap_or(0)
        }

        fn disposed(&self, id: u32) -> usize {
            self.disposed.borrow().get(&id).copied().unwrap_or(0)
        }
    }

    fn child(tally: &Rc<Tally>, value: Param<Item>) -> Component<TreeNode> {
        let first = value.get();
        *tally.created.borrow_mut().entry(first.id).or_default() += 1;

        let node = TreeNode::element(first.label);
        let on_update = Rc::clone(tally);
        let on_dispose = Rc::clone(tally);
        let handle = node.clone();

        Component::new(
            Some(node),
            Effect::from_fn(move || {
                let current = value.get();
                on_update.seen.borrow_mut().insert(current.id, current.label);
            }),
            Effect::from_fn(move || {
                *on_dispose.disposed.borrow_mut().entry(first.id).or_default() += 1;
                handle.detach();
            }),
        )
    }

    fn keyed(containers: &Containers<TreeFactory>, items: &Signal<Vec<Item>>, tally: &Rc<Tally>) -> Component<TreeNode> {
        let tally = Rc::clone(tally);
        containers.list(items.param(), |item: &Item, _| item.id, move |value| child(&tally, value))
    }

    #[test]
    fn removed_keys_are_disposed_and_survivors_kept() {
        let containers = Containers::new(TreeFactory::new());
        let tally = Rc::new(Tally::default());
        let items = Signal::new(vec![item(1, "x1"), item(2, "x2"), item(3, "x3")]);
        let list = keyed(&containers, &items, &tally);
        let container = list.node().cloned().unwrap();

        list.update().unwrap();
        assert_eq!(container.render(), "[x1 x2 x3]");

        items.set(vec![item(2, "x2'"), item(4, "x4")]);
        list.update().unwrap();

        assert_eq!(tally.disposed(1), 1);
        assert_eq!(tally.disposed(3), 1);
        assert_eq!(tally.disposed(2), 0);
        assert_eq!(tally.created(2), 1);
        assert_eq!(tally.created(4), 1);
        assert_eq!(tally.seen.borrow().get(&2), Some(&"x2'"));
        // The node keeps the label it was created with.
        assert_eq!(container.render(), "[x2 x4]");
    }

    #[test]
    fn update_without_change_only_propagates() {
        let containers = Containers::new(TreeFactory::new());
        let tally = Rc::new(Tally::default());
        let items = Signal::new(vec![item(1, "a"), item(2, "b")]);
        let list = keyed(&containers, &items, &tally);

        list.update().unwrap();
        let ops = containers.factory().journal().len();

        list.update().unwrap();
        list.update().unwrap();
        assert_eq!(containers.factory().journal().len(), ops);
        assert_eq!(tally.created(1), 1);
        assert_eq!(tally.disposed(1), 0);
    }

    #[test]
    fn empty_items_dispose_everything() {
        let containers = Containers::new(TreeFactory::new());
        let tally = Rc::new(Tally::default());
        let items = Signal::new(vec![item(1, "a"), item(2, "b")]);
        let list = keyed(&containers, &items, &tally);

        list.update().unwrap();
        items.set(Vec::new());
        list.update().unwrap();

        assert_eq!(tally.disposed(1), 1);
        assert_eq!(tally.disposed(2), 1);
        assert_eq!(list.node().unwrap().render(), "[]");
    }

    #[test]
    fn duplicate_keys_collapse_to_last_value() {
        let containers = Containers::new(TreeFactory::new());
        let tally = Rc::new(Tally::default());
        let items = Signal::new(vec![item(1, "first"), item(2, "b"), item(1, "last")]);
        let list = keyed(&containers, &items, &tally);

        list.update().unwrap();
        assert_eq!(tally.created(1), 1);
        assert_eq!(tally.seen.borrow().get(&1), Some(&"last"));
        assert_eq!(list.node().unwrap().render(), "[first b]");
    }

    #[test]
    fn declared_order_follows_items() {
        let containers = Containers::new(TreeFactory::new());
        let tally = Rc::new(Tally::default());
        let items = Signal::new(vec![item(1, "a"), item(2, "b"), item(3, "c")]);
        let list = keyed(&containers, &items, &tally);

        list.update().unwrap();
        items.set(vec![item(3, "c"), item(4, "d"), item(1, "a")]);
        list.update().unwrap();

        assert_eq!(list.node().unwrap().render(), "[c d a]");
        let last_order = containers
            .factory()
            .journal()
            .into_iter()
            .rev()
            .find(|op| matches!(op, TreeOp::Order { .. }));
        assert!(last_order.is_some());
    }

    #[test]
    fn insertion_order_keeps_survivors_first() {
        let containers = Containers::new(TreeFactory::new()).with_order(ReconcileOrder::Insertion);
        let tally = Rc::new(Tally::default());
        let items = Signal::new(vec![item(1, "a"), item(2, "b"), item(3, "c")]);
        let list = keyed(&containers, &items, &tally);

        list.update().unwrap();
        items.set(vec![item(3, "c"), item(4, "d"), item(1, "a")]);
        list.update().unwrap();

        assert_eq!(list.node().unwrap().render(), "[a c d]");
    }

    #[test]
    fn dispose_releases_live_children_once() {
        let containers = Containers::new(TreeFactory::new());
        let tally = Rc::new(Tally::default());
        let items = Signal::new(vec![item(1, "a"), item(2, "b"), item(3, "c")]);
        let list = keyed(&containers, &items, &tally);

        list.update().unwrap();
        items.set(vec![item(2, "b")]);
        list.update().unwrap();

        list.dispose().unwrap();
        list.dispose().unwrap();
        assert_eq!(tally.disposed(1), 1);
        assert_eq!(tally.disposed(2), 1);
        assert_eq!(tally.disposed(3), 1);
        assert!(matches!(list.update(), Err(Error::Disposed)));
    }

    fn failing_on(tally: &Rc<Tally>, broken: u32) -> impl Fn(Param<Item>) -> Component<TreeNode> {
        let tally = Rc::clone(tally);
        move |value| {
            let id = value.get().id;
            let component = child(&tally, value);
            if id == broken {
                component.after_dispose(Effect::new(|| Err(Error::Reentrant)))
            } else {
                component
            }
        }
    }

    #[test]
    fn dispose_continues_past_failing_child() {
        let containers = Containers::new(TreeFactory::new());
        let tally = Rc::new(Tally::default());
        let items = Signal::new(vec![item(1, "a"), item(2, "b"), item(3, "c")]);
        let list = containers.list(items.param(), |item: &Item, _| item.id, failing_on(&tally, 1));

        list.update().unwrap();
        assert!(matches!(list.dispose(), Err(Error::Reentrant)));
        assert_eq!(tally.disposed(1), 1);
        assert_eq!(tally.disposed(2), 1);
        assert_eq!(tally.disposed(3), 1);
    }

    #[test]
    fn stale_removal_continues_past_failing_child() {
        let containers = Containers::new(TreeFactory::new());
        let tally = Rc::new(Tally::default());
        let items = Signal::new(vec![item(1, "a"), item(2, "b"), item(3, "c")]);
        let list = containers.list(items.param(), |item: &Item, _| item.id, failing_on(&tally, 1));

        list.update().unwrap();
        items.set(Vec::new());
        assert!(matches!(list.update(), Err(Error::Reentrant)));
        assert_eq!(tally.disposed(1), 1);
        assert_eq!(tally.disposed(2), 1);
        assert_eq!(tally.disposed(3), 1);
        assert_eq!(list.node().unwrap().render(), "[]");
    }

    #[test]
    fn reconcile_reports_counts() {
        let factory = TreeFactory::new();
        let mut state: ListState<u32, Item, TreeNode> = ListState::new(factory.container());
        let created = Rc::new(Cell::new(0));
        let counter = Rc::clone(&created);
        let create = move |value: Param<Item>| {
            counter.set(counter.get() + 1);
            Component::leaf(TreeNode::element(value.get().label))
        };
        let key = |item: &Item, _: usize| item.id;

        let first = state
            .reconcile(&factory, ReconcileOrder::Declared, &[item(1, "a"), item(2, "b")], &key, &create)
            .unwrap();
        assert_eq!(first, Reconciled { live: 2, created: 2, removed: 0 });

        let second = state
            .reconcile(&factory, ReconcileOrder::Declared, &[item(2, "b"), item(5, "e")], &key, &create)
            .unwrap();
        assert_eq!(second, Reconciled { live: 2, created: 1, removed: 1 });
        assert_eq!(state.keys(), vec![2, 5]);
        assert_eq!(created.get(), 3);
    }

    #[test]
    fn index_keys_reuse_children_by_position() {
        let containers = Containers::new(TreeFactory::new());
        let items = Signal::new(vec!["a", "b"]);
        let created = Rc::new(Cell::new(0));
        let counter = Rc::clone(&created);

        let list = containers.list(items.param(), |_, index| index, move |value| {
            counter.set(counter.get() + 1);
            Component::leaf(TreeNode::element(value.get()))
        });

        list.update().unwrap();
        items.set(vec!["z", "b", "c"]);
        list.update().unwrap();

        assert_eq!(created.get(), 3);
    }
}
