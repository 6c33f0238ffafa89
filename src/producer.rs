//! The handle a sequence definition produces values through.

use tracing::trace;

use crate::channel::{Message, ProducerEnd};
use crate::error::{BoxError, Failure, Halt, Interrupted};
use crate::session::Finish;
use crate::step::Step;

/// Producer side of one session, passed to the sequence definition.
///
/// Every [`emit`](Self::emit) hands one value to the consumer and suspends
/// the definition until the consumer asks for another. The definition is
/// expected to propagate the returned [`Halt`] with `?`.
///
/// ```rust
/// use yielder::prelude::*;
///
/// let evens = from_fn(|y: &mut Yielder<u32>| {
///     for n in 0.. {
///         if n > 6 {
///             return y.stop();
///         }
///         if n % 2 == 0 {
///             y.emit(n)?;
///         }
///     }
///     Ok(())
/// });
/// assert_eq!(evens.iter().collect::<Vec<_>>(), vec![0, 2, 4, 6]);
/// ```
pub struct Yielder<T> {
    channel: ProducerEnd<T>,
    emitted: u64,
    cancelled: bool,
}

impl<T> Yielder<T> {
    pub(crate) fn new(channel: ProducerEnd<T>) -> Self {
        Self {
            channel,
            emitted: 0,
            cancelled: false,
        }
    }

    /// Hand `value` to the consumer and suspend until the next value is
    /// requested.
    ///
    /// Returns [`Halt::Cancelled`] if the consumer closed the iterator in the
    /// meantime; from then on every call fails the same way without blocking.
    pub fn emit(&mut self, value: T) -> Result<(), Halt> {
        self.exchange(Step::Yielded(value))?;
        self.emitted += 1;
        trace!(emitted = self.emitted, "value consumed, next one requested");
        Ok(())
    }

    /// End the sequence here. The consumer sees a normal end of iteration.
    pub fn stop(&self) -> Result<(), Halt> {
        Err(Halt::Stopped)
    }

    /// End the sequence with an error that the consumer will receive.
    pub fn fail<E>(&self, error: E) -> Result<(), Halt>
    where
        E: Into<BoxError>,
    {
        Err(Halt::failed(error))
    }

    /// Whether the consumer has closed the session.
    ///
    /// Definitions that compute for a long time between values can poll this
    /// to bail out early instead of waiting for the next `emit` to fail.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled || self.channel.is_cancelled()
    }

    /// How many values the consumer has taken so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    pub(crate) fn await_first_request(&mut self) -> Result<(), Interrupted> {
        self.channel
            .await_request()
            .map(|_| ())
            .map_err(|interrupted| self.interrupted(interrupted))
    }

    /// Send the terminal message. Nothing is awaited afterwards.
    pub(crate) fn finish(mut self, outcome: Result<Finish, Failure>) -> Result<(), Interrupted> {
        if self.cancelled {
            return Err(Interrupted);
        }
        self.channel
            .deliver(Step::Complete(outcome))
            .map_err(|interrupted| self.interrupted(interrupted))
    }

    fn exchange(&mut self, message: Message<T>) -> Result<(), Interrupted> {
        if self.cancelled {
            return Err(Interrupted);
        }
        self.channel
            .deliver(message)
            .and_then(|()| self.channel.await_request().map(|_| ()))
            .map_err(|interrupted| self.interrupted(interrupted))
    }

    fn interrupted(&mut self, interrupted: Interrupted) -> Interrupted {
        self.cancelled = true;
        interrupted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::rendezvous;
    use std::thread;

    #[test]
    fn test_emit_waits_for_next_request() {
        let (consumer, producer, _cancel) = rendezvous::<&str>();

        let worker = thread::spawn(move || {
            let mut yielder = Yielder::new(producer);
            yielder.await_first_request().unwrap();
            yielder.emit("foo").unwrap();
            yielder.emit("bar").unwrap();
            yielder.emitted()
        });

        consumer.request().unwrap();
        assert_eq!(consumer.receive().unwrap().unwrap_yielded(), "foo");
        consumer.request().unwrap();
        assert_eq!(consumer.receive().unwrap().unwrap_yielded(), "bar");
        // the second emit only returns once a third value is requested
        consumer.request().unwrap();

        assert_eq!(worker.join().unwrap(), 2);
    }

    #[test]
    fn test_emit_after_cancel_fails_fast() {
        let (consumer, producer, cancel) = rendezvous::<u8>();

        let worker = thread::spawn(move || {
            let mut yielder = Yielder::new(producer);
            yielder.await_first_request().unwrap();
            let first = yielder.emit(1);
            let second = yielder.emit(2);
            (first, second, yielder.is_cancelled())
        });

        consumer.request().unwrap();
        assert_eq!(consumer.receive().unwrap().unwrap_yielded(), 1);
        cancel.cancel();

        let (first, second, cancelled) = worker.join().unwrap();
        assert!(matches!(first, Err(Halt::Cancelled)));
        assert!(matches!(second, Err(Halt::Cancelled)));
        assert!(cancelled);
    }

    #[test]
    fn test_stop_and_fail_are_halts() {
        let (_consumer, producer, _cancel) = rendezvous::<u8>();
        let yielder = Yielder::new(producer);

        assert!(matches!(yielder.stop(), Err(Halt::Stopped)));
        assert!(matches!(yielder.fail("nope"), Err(Halt::Failed(e)) if e.to_string() == "nope"));
    }
}
