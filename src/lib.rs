//! # Yielder: generator-style sequences on a producer thread
//!
//! Write a sequence as ordinary blocking code that calls `emit` whenever it
//! has a value, and consume it as a lazy, pull-based iterator.
//!
//! ## Core Types
//!
//! - **[`Yielderable`]**: re-iterable sequence; every [`iter()`](Yielderable::iter)
//!   starts a fresh, independent session
//! - **[`Yielder`]**: handed to the definition; [`emit`](Yielder::emit) and
//!   [`stop`](Yielder::stop)
//! - **[`LazyIter`]**: the consumer cursor; buffers at most one value and
//!   closes its session on drop
//!
//! ## How it runs
//!
//! Each session runs the definition on its own thread. The consumer and the
//! producer meet on two zero-capacity channels: the consumer sends "compute
//! next", the producer answers with one value or with how it ended. The
//! producer is suspended inside `emit` until the next value is requested, so
//! at most one value is ever in flight and unbounded sequences cost constant
//! memory.
//!
//! ## Example
//!
//! ```
//! use yielder::prelude::*;
//!
//! let numbers = from_fn(|y| {
//!     for n in 1..10 {
//!         if n == 6 {
//!             return y.stop();
//!         }
//!         y.emit(n)?;
//!     }
//!     Ok(())
//! });
//!
//! let mut iter = numbers.iter();
//! assert_eq!(iter.by_ref().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
//! assert_eq!(iter.finish(), Some(Finish::Stopped));
//! ```
//!
//! Dropping a [`LazyIter`] early cancels its producer, which is how unbounded
//! sequences are abandoned:
//!
//! ```
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
//! let first: Vec<_> = naturals.iter().take(3).collect();
//! assert_eq!(first, vec![1, 2, 3]);
//! ```

mod channel;
mod config;
mod error;
mod iter;
mod producer;
pub mod prelude;
pub mod sans;
mod sequence;
mod session;
mod step;

pub use config::SessionConfig;
pub use error::{BoxError, Halt, YieldError};
pub use iter::{LazyIter, TryIter};
pub use producer::Yielder;
pub use sans::Sans;
pub use sequence::{from_fn, Sequence, Yielderable};
pub use session::Finish;
pub use step::Step;
