//! Commonly used imports
//!
//! Use `use yielder::prelude::*;` for quick access to the most common types and functions.

// Core types
pub use crate::{Finish, Halt, LazyIter, Sans, Sequence, Step, YieldError, Yielder, Yielderable};

// Constructors
pub use crate::sequence::from_fn;

// Configuration
pub use crate::SessionConfig;
