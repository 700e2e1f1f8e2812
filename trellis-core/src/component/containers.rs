//! Container Components
//!
//! [`Containers`] binds a [`Factory`] and hands out the four container
//! combinators:
//!
//! - `optional`: mount a subtree while a flag is true
//! - `cond`: switch between two subtrees on a flag
//! - `list`: keep one subtree per key of a reactive sequence
//! - `group`: merge several components into one
//!
//! # Constant Inputs
//!
//! When a flag is a constant, `optional` resolves it once at construction
//! and returns either the child itself or an empty component. No container
//! node is allocated and no subscription is installed.
//!
//! # Update Order
//!
//! Dynamic containers run their change subscription before forwarding
//! `update` to their children. A child mounted by a change therefore gets
//! its first update in the same cycle that mounted it.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{trace, warn};

use super::factory::Factory;
use super::Component;
use crate::error::Error;
use crate::reactive::{compose, Effect, Param};

/// Order in which a keyed list hands its children to [`Factory::order`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReconcileOrder {
    /// Follow the order of keys in the latest `items` snapshot.
    #[default]
    Declared,

    /// Keep surviving keys where they were first inserted and append new
    /// keys at the end.
    Insertion,
}

/// The container combinators for one backend.
pub struct Containers<F: Factory> {
    pub(super) factory: Rc<F>,
    pub(super) order: ReconcileOrder,
}

/// Build the container combinators for `factory`.
pub fn create_container_components<F: Factory>(factory: F) -> Containers<F> {
    Containers::new(factory)
}

impl<F: Factory> Containers<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory: Rc::new(factory),
            order: ReconcileOrder::default(),
        }
    }

    /// Choose how keyed lists order their children.
    pub fn with_order(mut self, order: ReconcileOrder) -> Self {
        self.order = order;
        self
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn reconcile_order(&self) -> ReconcileOrder {
        self.order
    }

    /// Mount the component built by `create` while `flag` is true.
    ///
    /// A live flag gets a container node that stays in place whether or not
    /// the child is mounted. Disposing the result disposes the mounted
    /// child but leaves the container to whoever mounted it.
    pub fn optional<C>(&self, flag: Param<bool>, create: C) -> Component<F::Node>
    where
        C: Fn() -> Component<F::Node> + 'static,
    {
        if flag.is_value() {
            return if flag.get() {
                create()
            } else {
                Component::empty()
            };
        }

        let container = self.factory.container();
        let state = Rc::new(RefCell::new(OptionalState {
            child: None,
            disposed: false,
        }));

        let subscription = {
            let factory = Rc::clone(&self.factory);
            let container = container.clone();
            let state = Rc::clone(&state);

            flag.changes(move |_, &mounted| {
                if mounted {
                    trace!("mounting optional child");
                    let child = create();
                    let node = child.node().cloned();
                    state.borrow_mut().child = Some(child);
                    match node {
                        Some(node) => factory
                            .append(&container, &node)
                            .map_err(Error::factory("append")),
                        None => Ok(()),
                    }
                } else {
                    let previous = state.borrow_mut().child.take();
                    match previous {
                        Some(child) => {
                            trace!("unmounting optional child");
                            child.dispose()
                        }
                        None => Ok(()),
                    }
                }
            })
        };

        let update = {
            let state = Rc::clone(&state);
            Effect::new(move || {
                if state.borrow().disposed {
                    warn!("update called on a disposed optional component");
                    return Err(Error::Disposed);
                }
                subscription.run()?;

                let child_update = state
                    .borrow()
                    .child
                    .as_ref()
                    .map(|child| child.update_effect().clone());
                child_update.map_or(Ok(()), |update| update.run())
            })
        };

        let dispose = Effect::new(move || {
            let child = {
                let mut state = state.borrow_mut();
                state.disposed = true;
                state.child.take()
            };
            child.map_or(Ok(()), |child| child.dispose())
        });

        Component::new(Some(container), update, dispose)
    }

    /// Mount `if_true` while `flag` holds and `if_false` otherwise.
    ///
    /// The branches are two `optional`s on complementary flags, so at most
    /// one of them is mounted at any time.
    pub fn cond<T, E>(&self, flag: Param<bool>, if_true: T, if_false: E) -> Component<F::Node>
    where
        T: Fn() -> Component<F::Node> + 'static,
        E: Fn() -> Component<F::Node> + 'static,
    {
        let negated = flag.map(|value| !value);
        self.group([
            self.optional(flag, if_true),
            self.optional(negated, if_false),
        ])
    }

    /// Merge components into one, in argument order.
    ///
    /// The node is the left fold of the children's nodes through
    /// `Factory::merge`, starting from `Factory::none`. Updates and
    /// disposals run through the children in order.
    pub fn group<I>(&self, components: I) -> Component<F::Node>
    where
        I: IntoIterator<Item = Component<F::Node>>,
    {
        let mut node = self.factory.none();
        let mut updates = Vec::new();
        let mut disposals = Vec::new();

        for component in components {
            let (child, update, dispose) = component.into_parts();
            if let Some(child) = child {
                node = self.factory.merge(node, child);
            }
            updates.push(update);
            disposals.push(dispose);
        }

        Component::new(Some(node), compose(updates), compose(disposals))
    }
}

impl<F: Factory> Clone for Containers<F> {
    fn clone(&self) -> Self {
        Self {
            factory: Rc::clone(&self.factory),
            order: self.order,
        }
    }
}

/// Mount state of a live `optional`.
struct OptionalState<N> {
    child: Option<Component<N>>,
    disposed: bool,
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
