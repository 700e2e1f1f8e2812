//! Signal Implementation
//!
//! A Signal is a writable source of reactive values. Reading a signal
//! through a [`Param`] always observes the latest `set`.
//!
//! # Threading
//!
//! Signals are single-threaded. The value lives behind `Rc<RefCell<_>>`
//! and clones of a signal share it. Component trees are driven from one
//! thread, so no locking is involved.

use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::param::Param;

/// Counter for generating unique signal IDs.
static SIGNAL_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a new unique signal ID.
fn next_signal_id() -> u64 {
    SIGNAL_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// A writable reactive value.
///
/// # Example
///
/// ```rust
/// use trellis_core::reactive::Signal;
///
/// let visible = Signal::new(false);
/// let flag = visible.param();
///
/// visible.set(true);
/// assert!(flag.get());
/// ```
pub struct Signal<T> {
    /// Unique identifier for this signal.
    id: u64,

    /// The current value.
    value: Rc<RefCell<T>>,
}

impl<T> Signal<T>
where
    T: Clone + 'static,
{
    /// Create a new signal with the given initial value.
    pub fn new(value: T) -> Self {
        Self {
            id: next_signal_id(),
            value: Rc::new(RefCell::new(value)),
        }
    }

    /// Get the signal's unique ID.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Get the current value.
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Read the current value by reference.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.borrow())
    }

    /// Replace the value.
    pub fn set(&self, value: T) {
        *self.value.borrow_mut() = value;
    }

    /// Update the value in place.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        f(&mut self.value.borrow_mut());
    }

    /// A live parameter that reads this signal.
    pub fn param(&self) -> Param<T> {
        let value = Rc::clone(&self.value);
        Param::live(move || value.borrow().clone())
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            value: Rc::clone(&self.value),
        }
    }
}

impl<T> Debug for Signal<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.id)
            .field("value", &*self.value.borrow())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
