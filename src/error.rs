//! Errors on both sides of a session.
//!
//! The producer side speaks [`Halt`]: the three ways a sequence definition can
//! unwind early. The consumer side speaks [`YieldError`]. [`Failure`] is the
//! payload that carries a producer failure across the data channel.

use std::any::Any;

use thiserror::Error;

/// Boxed error type accepted by [`Yielder::fail`](crate::Yielder::fail).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Early exit from a sequence definition.
///
/// Sequence definitions return `Result<(), Halt>` and propagate it with `?`.
/// Only `Failed` is ever reported to the consumer.
#[derive(Debug, Error)]
pub enum Halt {
    /// The definition asked to end the sequence here.
    #[error("sequence stopped")]
    Stopped,

    /// The consumer closed the session while the producer was suspended.
    #[error("sequence cancelled by consumer")]
    Cancelled,

    /// The definition failed; the error is handed to the consumer.
    #[error("sequence failed: {0}")]
    Failed(#[source] BoxError),
}

impl Halt {
    /// Wraps an arbitrary error as a producer failure.
    pub fn failed<E>(error: E) -> Self
    where
        E: Into<BoxError>,
    {
        Halt::Failed(error.into())
    }
}

/// Error seen by the consumer of a [`LazyIter`](crate::LazyIter).
#[derive(Debug, Error)]
pub enum YieldError {
    /// `take_next` was called after the sequence ended.
    #[error("no more elements in sequence")]
    Exhausted,

    /// The sequence definition returned [`Halt::Failed`].
    #[error("sequence producer failed: {0}")]
    Producer(#[source] BoxError),

    /// The sequence definition panicked.
    #[error("sequence producer panicked: {message}")]
    Panicked {
        message: String,
        payload: Box<dyn Any + Send + 'static>,
    },

    /// The producer went away without sending a terminal message.
    #[error("sequence producer disconnected before finishing")]
    Disconnected,

    /// The producer thread could not be spawned.
    #[error("failed to spawn sequence producer thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// A producer failure in transit over the data channel.
#[derive(Debug)]
pub(crate) enum Failure {
    Error(BoxError),
    Panic(Box<dyn Any + Send + 'static>),
}

impl From<Failure> for YieldError {
    fn from(failure: Failure) -> Self {
        match failure {
            Failure::Error(source) => YieldError::Producer(source),
            Failure::Panic(payload) => YieldError::Panicked {
                message: panic_message(payload.as_ref()),
                payload,
            },
        }
    }
}

/// Producer-side channel failure: the session was cancelled, or the consumer
/// half is gone. Never reported to the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rendezvous interrupted")]
pub(crate) struct Interrupted;

impl From<Interrupted> for Halt {
    fn from(_: Interrupted) -> Self {
        Halt::Cancelled
    }
}

/// Consumer-side channel failure: the producer half is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rendezvous peer disconnected")]
pub(crate) struct Disconnected;

impl From<Disconnected> for YieldError {
    fn from(_: Disconnected) -> Self {
        YieldError::Disconnected
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
