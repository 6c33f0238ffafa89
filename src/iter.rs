//! The consumer-facing cursor over a producer session.
//!
//! [`LazyIter`] drives any [`Sans<(), T>`](Sans) whose return value is
//! `Result<Finish, YieldError>`; in practice that is the consumer half of a
//! session spawned by [`Yielderable::iter`](crate::Yielderable::iter). It
//! buffers at most one value, so [`LazyIter::has_more`] can look ahead
//! without losing anything.
//!
//! ```rust
//! use yielder::prelude::*;
//!
//! let naturals = from_fn(|y| {
//!     let mut n = 1_u64;
//!     loop {
//!         y.emit(n)?;
//!         n += 1;
//!     }
//! });
//!
//! let mut iter = naturals.iter();
//! assert!(iter.has_more().unwrap());
//! assert!(iter.has_more().unwrap()); // still the same buffered value
//! assert_eq!(iter.take_next().unwrap(), 1);
//! assert_eq!(iter.take_next().unwrap(), 2);
//! iter.close();
//! assert!(!iter.has_more().unwrap());
//! ```

use std::iter::FusedIterator;
use std::panic;

use tracing::debug;

use crate::error::YieldError;
use crate::sans::Sans;
use crate::session::Finish;
use crate::step::Step;

type Source<T> = Box<dyn Sans<(), T, Return = Result<Finish, YieldError>> + Send>;

type CloseAction = Box<dyn FnOnce() + Send>;

/// Lazily advancing iterator over one session.
///
/// Nothing is produced until [`has_more`](Self::has_more),
/// [`take_next`](Self::take_next) or [`Iterator::next`] is first called.
/// Dropping the iterator closes it.
pub struct LazyIter<T> {
    state: LazyIterState<T>,
    on_close: Vec<CloseAction>,
    closed: bool,
}

enum LazyIterState<T> {
    Active {
        source: Source<T>,
        buffered: Option<T>,
    },
    Finished(Finish),
    Failed,
    Closed,
    Invalid,
}

impl<T> LazyIterState<T> {
    fn take(&mut self) -> Self {
        std::mem::replace(self, LazyIterState::Invalid)
    }
}

impl<T> LazyIter<T> {
    /// Iterate over a unit-input computation.
    pub fn from_sans<S>(source: S) -> Self
    where
        S: Sans<(), T, Return = Result<Finish, YieldError>> + Send + 'static,
    {
        Self {
            state: LazyIterState::Active {
                source: source.boxed(),
                buffered: None,
            },
            on_close: Vec::new(),
            closed: false,
        }
    }

    /// Whether another value is available, fetching it if necessary.
    ///
    /// Repeated calls without an intervening [`take_next`](Self::take_next)
    /// do not advance the producer. A producer failure is returned once, after
    /// which the iterator reports no more values.
    pub fn has_more(&mut self) -> Result<bool, YieldError> {
        match self.state.take() {
            LazyIterState::Active {
                mut source,
                buffered: None,
            } => match source.next(()) {
                Step::Yielded(value) => {
                    self.state = LazyIterState::Active {
                        source,
                        buffered: Some(value),
                    };
                    Ok(true)
                }
                Step::Complete(Ok(finish)) => {
                    self.state = LazyIterState::Finished(finish);
                    Ok(false)
                }
                Step::Complete(Err(error)) => {
                    self.state = LazyIterState::Failed;
                    Err(error)
                }
            },
            state @ LazyIterState::Active { .. } => {
                self.state = state;
                Ok(true)
            }
            state => {
                self.state = state;
                Ok(false)
            }
        }
    }

    /// Take the next value, fetching it if necessary.
    ///
    /// Fails with [`YieldError::Exhausted`] once the sequence has ended.
    pub fn take_next(&mut self) -> Result<T, YieldError> {
        if !self.has_more()? {
            return Err(YieldError::Exhausted);
        }
        match &mut self.state {
            LazyIterState::Active { buffered, .. } => buffered.take().ok_or(YieldError::Exhausted),
            _ => Err(YieldError::Exhausted),
        }
    }

    /// How the sequence ended, if it ended without error.
    pub fn finish(&self) -> Option<Finish> {
        match self.state {
            LazyIterState::Finished(finish) => Some(finish),
            _ => None,
        }
    }

    /// Whether the sequence has ended, failed, or been closed.
    pub fn is_finished(&self) -> bool {
        !matches!(self.state, LazyIterState::Active { .. })
    }

    /// Iterate with errors as items instead of panics.
    pub fn try_iter(&mut self) -> TryIter<'_, T> {
        TryIter { inner: self }
    }

    /// Run `action` when the iterator is closed. If it already is, run it now.
    pub fn on_close<F>(&mut self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.closed {
            action();
        } else {
            self.on_close.push(Box::new(action));
        }
    }

    /// Release the session: drop the channel to the producer and run every
    /// close action in registration order. Later calls do nothing.
    ///
    /// A buffered value that was not taken is discarded.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let LazyIterState::Active { .. } = self.state {
            self.state = LazyIterState::Closed;
        }

        debug!(actions = self.on_close.len(), "closing sequence iterator");
        for action in self.on_close.drain(..) {
            action();
        }
    }
}

impl<T> Iterator for LazyIter<T> {
    type Item = T;

    /// # Panics
    ///
    /// Re-raises a panic from the sequence definition with its original
    /// payload. Any other failure panics with the [`YieldError`] itself as
    /// the payload, so the producer's error and its source chain can be
    /// recovered with `downcast`.
    fn next(&mut self) -> Option<Self::Item> {
        match self.take_next() {
            Ok(value) => Some(value),
            Err(YieldError::Exhausted) => None,
            Err(YieldError::Panicked { payload, .. }) => panic::resume_unwind(payload),
            Err(error) => {
                debug!(%error, "sequence failed during iteration");
                panic::panic_any(error)
            }
        }
    }
}

impl<T> FusedIterator for LazyIter<T> {}

impl<T> Drop for LazyIter<T> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Fallible view of a [`LazyIter`], see [`LazyIter::try_iter`].
///
/// Yields `Err` at most once, then ends.
pub struct TryIter<'a, T> {
    inner: &'a mut LazyIter<T>,
}

impl<T> Iterator for TryIter<'_, T> {
    type Item = Result<T, YieldError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.take_next() {
            Err(YieldError::Exhausted) => None,
            other => Some(other),
        }
    }
}
