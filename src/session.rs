//! One run of a sequence definition on its own thread.
//!
//! [`spawn`] creates the channel pair, starts the producer thread and returns
//! the consumer half as a [`Session`]. The producer thread waits for the
//! first request before it runs the definition, so nothing is produced until
//! the consumer asks.

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use tracing::{debug, debug_span, trace};

use crate::channel::{rendezvous, CancelHandle, ConsumerEnd};
use crate::config::SessionConfig;
use crate::error::{Failure, Halt, YieldError};
use crate::producer::Yielder;
use crate::sans::Sans;
use crate::sequence::Sequence;
use crate::step::Step;

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// How a sequence ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finish {
    /// The definition returned.
    Completed,
    /// The definition called [`Yielder::stop`].
    Stopped,
}

/// Consumer half of a running session.
///
/// Each `next(())` sends one flow token and blocks for the answer.
pub(crate) struct Session<T> {
    id: u64,
    channel: ConsumerEnd<T>,
}

impl<T> Sans<(), T> for Session<T> {
    type Return = Result<Finish, YieldError>;

    fn next(&mut self, _: ()) -> Step<T, Self::Return> {
        trace!(session = self.id, "requesting next value");
        match self.channel.request().and_then(|()| self.channel.receive()) {
            Ok(message) => message.map_complete(|end| end.map_err(YieldError::from)),
            Err(disconnected) => Step::Complete(Err(disconnected.into())),
        }
    }
}

pub(crate) struct Spawned<T> {
    pub(crate) session: Session<T>,
    pub(crate) cancel: CancelHandle,
    pub(crate) thread: JoinHandle<()>,
}

pub(crate) fn spawn<T, S>(definition: Arc<S>, config: &SessionConfig) -> io::Result<Spawned<T>>
where
    T: Send + 'static,
    S: Sequence<T> + ?Sized,
{
    let id = NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed);
    let (consumer, producer, cancel) = rendezvous();

    let thread = config
        .thread_builder(id)?
        .spawn(move || run(id, definition.as_ref(), Yielder::new(producer)))?;
    trace!(session = id, "spawned producer thread");

    Ok(Spawned {
        session: Session {
            id,
            channel: consumer,
        },
        cancel,
        thread,
    })
}

fn run<T, S>(id: u64, definition: &S, mut yielder: Yielder<T>)
where
    S: Sequence<T> + ?Sized,
{
    let span = debug_span!("session", id);
    let _entered = span.enter();

    if yielder.await_first_request().is_err() {
        debug!("closed before the first value was requested");
        return;
    }
    trace!("first value requested, running definition");

    let result = panic::catch_unwind(AssertUnwindSafe(|| definition.execute(&mut yielder)));
    let outcome = match result {
        Ok(Ok(())) => Ok(Finish::Completed),
        Ok(Err(Halt::Stopped)) => {
            debug!(emitted = yielder.emitted(), "definition stopped early");
            Ok(Finish::Stopped)
        }
        Ok(Err(Halt::Cancelled)) if yielder.is_cancelled() => {
            debug!(emitted = yielder.emitted(), "cancelled while suspended");
            return;
        }
        Ok(Err(Halt::Cancelled)) => Ok(Finish::Stopped),
        Ok(Err(Halt::Failed(error))) => {
            debug!(%error, "definition failed, handing error to consumer");
            Err(Failure::Error(error))
        }
        Err(payload) => {
            debug!("definition panicked, handing payload to consumer");
            Err(Failure::Panic(payload))
        }
    };

    let emitted = yielder.emitted();
    match yielder.finish(outcome) {
        Ok(()) => debug!(emitted, "session finished"),
        Err(_) => debug!(emitted, "closed before the outcome was delivered"),
    }
}
