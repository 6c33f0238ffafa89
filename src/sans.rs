//! Core trait for resumable computations.
//!
//! A [`Sans`] is a stateful computation that is driven one step at a time:
//! each call to [`Sans::next`] feeds it an input and gets back either a
//! yielded value or its final return value.
//!
//! The consumer half of every producer session is a `Sans<(), T>`: calling
//! `next(())` asks the producer thread for one more value and blocks until it
//! answers. [`LazyIter`](crate::LazyIter) is an iterator over any such
//! computation, which also makes it possible to drive one from a
//! plain in-thread closure via [`from_fn`].
//!
//! ```rust
//! use yielder::prelude::*;
//!
//! let mut left = 2;
//! let mut countdown = yielder::sans::from_fn(move |()| {
//!     if left == 0 {
//!         Step::Complete(Ok::<_, YieldError>(Finish::Completed))
//!     } else {
//!         left -= 1;
//!         Step::Yielded(left)
//!     }
//! });
//! assert_eq!(countdown.next(()).unwrap_yielded(), 1);
//! assert_eq!(countdown.next(()).unwrap_yielded(), 0);
//! assert!(countdown.next(()).is_complete());
//! ```

use crate::step::Step;

/// Stateful computation that processes input and yields intermediate values.
///
/// Each call to `next()` either yields an intermediate result or signals
/// completion with [`Sans::Return`].
pub trait Sans<I, O> {
    /// Type of final result when computation completes
    type Return;

    /// Process input, returning `Yielded` to continue or `Complete` to finish.
    fn next(&mut self, input: I) -> Step<O, Self::Return>;

    /// Erase the concrete type.
    fn boxed(self) -> Box<dyn Sans<I, O, Return = Self::Return> + Send>
    where
        Self: Sized + Send + 'static,
    {
        Box::new(self)
    }
}

impl<I, O, D> Sans<I, O> for Box<dyn Sans<I, O, Return = D> + Send> {
    type Return = D;

    fn next(&mut self, input: I) -> Step<O, Self::Return> {
        (**self).next(input)
    }
}

impl<I, O, S> Sans<I, O> for &'_ mut S
where
    S: Sans<I, O> + ?Sized,
{
    type Return = S::Return;

    fn next(&mut self, input: I) -> Step<O, Self::Return> {
        (**self).next(input)
    }
}

/// A computation built from a closure returning [`Step`]s.
pub struct FromFn<F>(F);

impl<I, O, D, F> Sans<I, O> for FromFn<F>
where
    F: FnMut(I) -> Step<O, D>,
{
    type Return = D;

    fn next(&mut self, input: I) -> Step<O, Self::Return> {
        (self.0)(input)
    }
}

/// Create a computation from a closure.
pub fn from_fn<F>(f: F) -> FromFn<F> {
    FromFn(f)
}
