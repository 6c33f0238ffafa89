//! Re-iterable sequence definitions.
//!
//! A [`Sequence`] is the body of a generator: ordinary blocking code that
//! calls [`Yielder::emit`] whenever it has a value. [`Yielderable`] wraps a
//! definition and hands out a fresh [`LazyIter`] per iteration, each backed by
//! its own producer thread.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::config::SessionConfig;
use crate::error::{Halt, YieldError};
use crate::iter::LazyIter;
use crate::producer::Yielder;
use crate::session;

/// The body of a generator.
///
/// Implemented for every `Fn(&mut Yielder<T>) -> Result<(), Halt>` closure
/// that can be shared across threads.
pub trait Sequence<T>: Send + Sync + 'static {
    /// Produce the sequence into `yielder`.
    fn execute(&self, yielder: &mut Yielder<T>) -> Result<(), Halt>;
}

impl<T, F> Sequence<T> for F
where
    F: Fn(&mut Yielder<T>) -> Result<(), Halt> + Send + Sync + 'static,
{
    fn execute(&self, yielder: &mut Yielder<T>) -> Result<(), Halt> {
        self(yielder)
    }
}

/// A lazily produced sequence that can be iterated any number of times.
///
/// Every call to [`iter`](Self::iter) starts an independent session from the
/// beginning of the definition. The factory itself is immutable and can be
/// shared and iterated from several threads at once.
///
/// ```rust
/// use yielder::prelude::*;
///
/// let words = from_fn(|y| {
///     y.emit("foo")?;
///     y.emit("bar")
/// });
///
/// assert_eq!(words.iter().collect::<Vec<_>>(), ["foo", "bar"]);
/// // a second pass starts over
/// assert_eq!(words.iter().next(), Some("foo"));
/// ```
pub struct Yielderable<T, S: ?Sized> {
    config: SessionConfig,
    _marker: PhantomData<fn() -> T>,
    definition: Arc<S>,
}

/// Build a [`Yielderable`] from a closure.
pub fn from_fn<T, F>(definition: F) -> Yielderable<T, F>
where
    T: Send + 'static,
    F: Fn(&mut Yielder<T>) -> Result<(), Halt> + Send + Sync + 'static,
{
    Yielderable::new(definition)
}

impl<T, S> Yielderable<T, S>
where
    T: Send + 'static,
    S: Sequence<T>,
{
    pub fn new(definition: S) -> Self {
        Self::from_arc(Arc::new(definition))
    }
}

impl<T, S> Yielderable<T, S>
where
    T: Send + 'static,
    S: Sequence<T> + ?Sized,
{
    /// Share an existing definition, possibly a trait object.
    pub fn from_arc(definition: Arc<S>) -> Self {
        Self {
            config: SessionConfig::default(),
            _marker: PhantomData,
            definition,
        }
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Start a new session.
    ///
    /// # Panics
    ///
    /// Panics if the producer thread cannot be spawned. Use
    /// [`try_iter`](Self::try_iter) to handle that case.
    pub fn iter(&self) -> LazyIter<T> {
        match self.try_iter() {
            Ok(iter) => iter,
            Err(error) => panic!("{error}"),
        }
    }

    /// Start a new session, reporting a failed thread spawn.
    pub fn try_iter(&self) -> Result<LazyIter<T>, YieldError> {
        let spawned =
            session::spawn(Arc::clone(&self.definition), &self.config).map_err(YieldError::Spawn)?;

        let cancel = spawned.cancel;
        let mut iter = LazyIter::from_sans(spawned.session);
        iter.on_close(move || cancel.cancel());
        if self.config.joins_on_close() {
            let thread = spawned.thread;
            iter.on_close(move || {
                // panics inside the definition are caught on the producer thread
                let _ = thread.join();
            });
        }
        Ok(iter)
    }
}

impl<T, S: ?Sized> Clone for Yielderable<T, S> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            _marker: PhantomData,
            definition: Arc::clone(&self.definition),
        }
    }
}

impl<T, S: ?Sized> fmt::Debug for Yielderable<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Yielderable")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<'a, T, S> IntoIterator for &'a Yielderable<T, S>
where
    T: Send + 'static,
    S: Sequence<T> + ?Sized,
{
    type Item = T;
    type IntoIter = LazyIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
