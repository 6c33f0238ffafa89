//! The rendezvous pair between a session's consumer and its producer.
//!
//! Both channels are zero-capacity, so every send waits for a matching
//! receive. The consumer sends a [`FlowToken`] on the flow channel, then
//! receives exactly one [`Message`] on the data channel. The producer mirrors
//! that: it waits for a token, computes, and delivers one message. Neither side
//! can run ahead by more than one value.
//!
//! A third, never-used channel acts as the cancel signal: dropping its only
//! sender disconnects the receiver, which wakes a producer blocked in either
//! [`ProducerEnd::await_request`] or [`ProducerEnd::deliver`].

use crossbeam_channel::{bounded, select, Receiver, Sender};

use crate::error::{Disconnected, Failure, Interrupted};
use crate::session::Finish;
use crate::step::Step;

/// "Compute the next value now."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FlowToken;

/// A value, or how the session ended.
pub(crate) type Message<T> = Step<T, Result<Finish, Failure>>;

enum Never {}

/// Create a fresh channel pair plus the handle that cancels its producer.
pub(crate) fn rendezvous<T>() -> (ConsumerEnd<T>, ProducerEnd<T>, CancelHandle) {
    let (flow_tx, flow_rx) = bounded(0);
    let (data_tx, data_rx) = bounded(0);
    let (cancel_tx, cancel_rx) = bounded(0);

    (
        ConsumerEnd {
            flow: flow_tx,
            data: data_rx,
        },
        ProducerEnd {
            flow: flow_rx,
            data: data_tx,
            cancelled: cancel_rx,
        },
        CancelHandle { _signal: cancel_tx },
    )
}

pub(crate) struct ConsumerEnd<T> {
    flow: Sender<FlowToken>,
    data: Receiver<Message<T>>,
}

impl<T> ConsumerEnd<T> {
    /// Ask the producer for its next message. Blocks until it is listening.
    pub(crate) fn request(&self) -> Result<(), Disconnected> {
        self.flow.send(FlowToken).map_err(|_| Disconnected)
    }

    /// Wait for the message answering the last request.
    pub(crate) fn receive(&self) -> Result<Message<T>, Disconnected> {
        self.data.recv().map_err(|_| Disconnected)
    }
}

pub(crate) struct ProducerEnd<T> {
    flow: Receiver<FlowToken>,
    data: Sender<Message<T>>,
    cancelled: Receiver<Never>,
}

impl<T> ProducerEnd<T> {
    /// Block until the consumer asks for a value.
    pub(crate) fn await_request(&self) -> Result<FlowToken, Interrupted> {
        select! {
            recv(self.flow) -> token => token.map_err(|_| Interrupted),
            recv(self.cancelled) -> _ => Err(Interrupted),
        }
    }

    /// Hand one message to the consumer. On interruption the message is
    /// dropped undelivered.
    pub(crate) fn deliver(&self, message: Message<T>) -> Result<(), Interrupted> {
        select! {
            send(self.data, message) -> sent => sent.map_err(|_| Interrupted),
            recv(self.cancelled) -> _ => Err(Interrupted),
        }
    }

    /// Non-blocking check of the cancel signal.
    pub(crate) fn is_cancelled(&self) -> bool {
        matches!(
            self.cancelled.try_recv(),
            Err(crossbeam_channel::TryRecvError::Disconnected)
        )
    }
}

/// Owns the cancel signal of one session. Dropping or calling
/// [`cancel`](Self::cancel) interrupts the producer.
pub(crate) struct CancelHandle {
    _signal: Sender<Never>,
}

impl CancelHandle {
    pub(crate) fn cancel(self) {
        drop(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_strict_alternation() {
        let (consumer, producer, _cancel) = rendezvous::<u32>();

        let worker = thread::spawn(move || {
            for i in 0..3 {
                producer.await_request().unwrap();
                producer.deliver(Step::Yielded(i)).unwrap();
            }
            producer.await_request().unwrap();
            producer.deliver(Step::Complete(Ok(Finish::Completed))).unwrap();
        });

        let mut seen = Vec::new();
        loop {
            consumer.request().unwrap();
            match consumer.receive().unwrap() {
                Step::Yielded(v) => seen.push(v),
                Step::Complete(done) => {
                    assert!(matches!(done, Ok(Finish::Completed)));
                    break;
                }
            }
        }

        worker.join().unwrap();
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[test]
    fn test_cancel_unblocks_waiting_producer() {
        let (_consumer, producer, cancel) = rendezvous::<u32>();

        let worker = thread::spawn(move || producer.await_request());
        thread::sleep(Duration::from_millis(20));
        cancel.cancel();

        assert_eq!(worker.join().unwrap(), Err(Interrupted));
    }

    #[test]
    fn test_cancel_drops_undelivered_message() {
        let (consumer, producer, cancel) = rendezvous::<String>();

        let worker = thread::spawn(move || producer.deliver(Step::Yielded("lost".to_string())));
        thread::sleep(Duration::from_millis(20));
        cancel.cancel();

        assert_eq!(worker.join().unwrap(), Err(Interrupted));
        assert!(consumer.data.try_recv().is_err());
    }

    #[test]
    fn test_consumer_sees_dropped_producer() {
        let (consumer, producer, _cancel) = rendezvous::<u32>();
        drop(producer);

        assert_eq!(consumer.request(), Err(Disconnected));
        assert!(consumer.receive().is_err());
    }

    #[test]
    fn test_is_cancelled() {
        let (_consumer, producer, cancel) = rendezvous::<u32>();
        assert!(!producer.is_cancelled());
        cancel.cancel();
        assert!(producer.is_cancelled());
    }
}
