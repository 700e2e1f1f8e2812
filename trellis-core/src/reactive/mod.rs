//! Reactive Primitives
//!
//! The pieces the container components are built on: effects, reactive
//! parameters, and writable signals.
//!
//! # Concepts
//!
//! ## Effects
//!
//! An [`Effect`] is a shareable, fallible, zero-argument operation. Effects
//! compose sequentially with [`compose`]; the no-op effect is the identity.
//!
//! ## Params
//!
//! A [`Param`] is either a constant or a live getter. Containers check
//! `is_value` to skip all reactive machinery for constant inputs, and use
//! `changes` to turn a live input into an effect that delivers each new
//! value once.
//!
//! ## Signals
//!
//! A [`Signal`] is a writable cell that hands out live params.
//!
//! # Implementation Notes
//!
//! Propagation is pull-based. Nothing runs when a signal is written; the
//! change is observed the next time a component's `update` polls its
//! subscriptions. The host owns the update loop and decides when that is.

mod effect;
mod param;
mod signal;

pub use effect::{compose, Effect};
pub use param::Param;
pub use signal::Signal;
