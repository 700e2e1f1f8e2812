//! Effect Implementation
//!
//! An Effect is a zero-argument side-effecting operation. Components are
//! built from two of them: `update` and `dispose`.
//!
//! # Composition
//!
//! Effects compose sequentially. `compose([a, b, c])` runs `a`, then `b`,
//! then `c`. The no-op effect is the identity of composition and is dropped
//! when composing, so wrapping a component many times does not build up
//! chains of empty calls.
//!
//! # Failure
//!
//! Effects are fallible. A composed effect stops at the first failing step
//! and returns its error; later steps do not run.
//!
//! # Sharing
//!
//! Effects are reference counted. Cloning an effect is cheap and both clones
//! run the same closure.

use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::error::Result;

type Run = Rc<dyn Fn() -> Result<()>>;

/// A shareable, fallible, zero-argument operation.
///
/// # Example
///
/// ```rust
/// use trellis_core::reactive::{compose, Effect};
///
/// let first = Effect::from_fn(|| println!("first"));
/// let second = Effect::from_fn(|| println!("second"));
///
/// // Prints "first" then "second"
/// compose([first, second]).run().unwrap();
/// ```
#[derive(Clone, Default)]
pub struct Effect {
    /// `None` is the no-op effect.
    run: Option<Run>,
}

impl Effect {
    /// Create an effect from a fallible closure.
    pub fn new<F>(run: F) -> Self
    where
        F: Fn() -> Result<()> + 'static,
    {
        Self {
            run: Some(Rc::new(run)),
        }
    }

    /// Create an effect from a closure that cannot fail.
    pub fn from_fn<F>(run: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self::new(move || {
            run();
            Ok(())
        })
    }

    /// The effect that does nothing.
    pub fn noop() -> Self {
        Self { run: None }
    }

    /// Whether this is the no-op effect.
    pub fn is_noop(&self) -> bool {
        self.run.is_none()
    }

    /// Run the effect.
    pub fn run(&self) -> Result<()> {
        match &self.run {
            Some(run) => run(),
            None => Ok(()),
        }
    }

    /// Run `self`, then `next`.
    pub fn then(self, next: Effect) -> Effect {
        compose([self, next])
    }
}

/// Sequentially compose effects, in iteration order.
///
/// No-op effects are skipped. Composing nothing yields the no-op effect and
/// composing a single effect yields that effect unchanged.
pub fn compose<I>(effects: I) -> Effect
where
    I: IntoIterator<Item = Effect>,
{
    let mut steps: SmallVec<[Run; 4]> = effects.into_iter().filter_map(|e| e.run).collect();

    match steps.len() {
        0 => Effect::noop(),
        1 => Effect { run: steps.pop() },
        _ => Effect::new(move || {
            for step in steps.iter() {
                step()?;
            }
            Ok(())
        }),
    }
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("noop", &self.is_noop())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
