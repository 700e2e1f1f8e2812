//! Reactive Parameters
//!
//! A `Param` is an input that may vary over time. It is either a constant
//! fixed at construction, or a live getter that is read on demand.
//!
//! # Change Subscriptions
//!
//! Components do not get pushed notifications. Instead, `changes` wraps a
//! callback into an [`Effect`] that the component runs on each update
//! cycle. When run, the effect reads the current value, compares it with
//! the last delivered value, and invokes the callback only if it differs.
//! The very first run always delivers.
//!
//! This keeps all structural work inside the component's own `update`,
//! which is what lets containers guarantee that mounting happens before
//! updates are propagated to children.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::effect::Effect;
use crate::error::{Error, Result};

/// A constant or live reactive value.
pub enum Param<T> {
    /// A value that never changes.
    Value(T),

    /// A getter read every time the value is needed.
    Live(Rc<dyn Fn() -> T>),
}

impl<T> Param<T>
where
    T: Clone + 'static,
{
    /// Create a constant parameter.
    pub fn value(value: T) -> Self {
        Self::Value(value)
    }

    /// Create a live parameter backed by a getter.
    pub fn live<F>(get: F) -> Self
    where
        F: Fn() -> T + 'static,
    {
        Self::Live(Rc::new(get))
    }

    /// Whether this parameter is a constant.
    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Read the current value.
    pub fn get(&self) -> T {
        match self {
            Self::Value(value) => value.clone(),
            Self::Live(get) => get(),
        }
    }

    /// Derive a new parameter by mapping every value.
    ///
    /// Mapping a constant yields a constant, so `is_value` survives
    /// derivation.
    pub fn map<U, F>(&self, f: F) -> Param<U>
    where
        U: Clone + 'static,
        F: Fn(T) -> U + 'static,
    {
        match self {
            Self::Value(value) => Param::Value(f(value.clone())),
            Self::Live(get) => {
                let get = Rc::clone(get);
                Param::Live(Rc::new(move || f(get())))
            }
        }
    }
}

impl<T> Param<T>
where
    T: Clone + PartialEq + 'static,
{
    /// Subscribe to changes of this parameter.
    ///
    /// The returned effect delivers `(previous, current)` to `on_change`
    /// once per actual change. `previous` is `None` on the first delivery.
    /// Errors returned by the callback propagate out of the effect; the new
    /// value is still recorded as delivered.
    ///
    /// # Example
    ///
    /// ```rust
    /// use trellis_core::reactive::Signal;
    ///
    /// let count = Signal::new(1);
    /// let tick = count.param().changes(|prev, current| {
    ///     println!("{prev:?} -> {current}");
    ///     Ok(())
    /// });
    ///
    /// tick.run().unwrap(); // prints "None -> 1"
    /// tick.run().unwrap(); // no change, prints nothing
    /// count.set(2);
    /// tick.run().unwrap(); // prints "Some(1) -> 2"
    /// ```
    pub fn changes<F>(&self, on_change: F) -> Effect
    where
        F: FnMut(Option<&T>, &T) -> Result<()> + 'static,
    {
        let subscription = Rc::new(Subscription {
            source: self.clone(),
            last: RefCell::new(None),
            on_change: RefCell::new(on_change),
        });

        Effect::new(move || subscription.poll())
    }
}

impl<T> Clone for Param<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        match self {
            Self::Value(value) => Self::Value(value.clone()),
            Self::Live(get) => Self::Live(Rc::clone(get)),
        }
    }
}

impl<T> fmt::Debug for Param<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Live(_) => f.write_str("Live(..)"),
        }
    }
}

/// State behind a `changes` effect.
struct Subscription<T, F> {
    source: Param<T>,

    /// Last value handed to the callback.
    last: RefCell<Option<T>>,

    on_change: RefCell<F>,
}

impl<T, F> Subscription<T, F>
where
    T: Clone + PartialEq + 'static,
    F: FnMut(Option<&T>, &T) -> Result<()>,
{
    fn poll(&self) -> Result<()> {
        let current = self.source.get();

        let previous = {
            let mut last = self.last.try_borrow_mut().map_err(|_| Error::Reentrant)?;
            if last.as_ref() == Some(&current) {
                return Ok(());
            }
            last.replace(current.clone())
        };

        let mut on_change = self
            .on_change
            .try_borrow_mut()
            .map_err(|_| Error::Reentrant)?;
        on_change(previous.as_ref(), &current)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
