//! Error types for component lifecycles.
//!
//! The container combinators never fail on their own. Errors come from
//! misuse of a component (updating it after disposal, re-entering a
//! subscription) or from the host backend.

use thiserror::Error;

/// Errors raised while updating or disposing a component tree.
#[derive(Debug, Error)]
pub enum Error {
    /// `update` was called on a component that has already been disposed.
    #[error("component was updated after it was disposed")]
    Disposed,

    /// A change subscription was invoked while it was already running.
    #[error("change subscription re-entered while delivering a change")]
    Reentrant,

    /// A host backend operation failed.
    #[error("factory operation `{op}` failed: {source}")]
    Factory {
        /// Name of the failing `Factory` method.
        op: &'static str,
        #[source]
        source: Box<dyn std::error::Error + 'static>,
    },
}

impl Error {
    /// Wrap a backend error, tagging it with the operation that produced it.
    pub fn factory<E>(op: &'static str) -> impl FnOnce(E) -> Self
    where
        E: std::error::Error + 'static,
    {
        move |source| Self::Factory {
            op,
            source: Box::new(source),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
