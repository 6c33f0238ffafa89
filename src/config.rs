//! Per-session execution settings.

use std::io;
use std::thread;

const DEFAULT_THREAD_NAME: &str = "yielder";

/// How the producer thread of each session is created and torn down.
///
/// ```rust
/// use yielder::SessionConfig;
///
/// let config = SessionConfig::new()
///     .with_thread_name("numbers")
///     .with_stack_size(256 * 1024)
///     .with_join_on_close(false);
/// assert_eq!(config.thread_name(), "numbers");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    thread_name: String,
    stack_size: Option<usize>,
    join_on_close: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            thread_name: DEFAULT_THREAD_NAME.to_string(),
            stack_size: None,
            join_on_close: true,
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix for producer thread names; the session id is appended.
    pub fn with_thread_name(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name = prefix.into();
        self
    }

    /// Stack size for producer threads. Uses the platform default when unset.
    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    /// Whether closing an iterator waits for its producer thread to exit.
    ///
    /// Enabled by default. The consumer can only close while the producer is
    /// parked in `emit` or waiting for its first request, so the join is
    /// prompt unless the definition ignores [`Halt::Cancelled`](crate::Halt::Cancelled)
    /// and keeps running.
    pub fn with_join_on_close(mut self, join: bool) -> Self {
        self.join_on_close = join;
        self
    }

    pub fn thread_name(&self) -> &str {
        &self.thread_name
    }

    pub fn stack_size(&self) -> Option<usize> {
        self.stack_size
    }

    pub fn joins_on_close(&self) -> bool {
        self.join_on_close
    }

    /// Thread builder for one session, named `{prefix}-{session}`.
    ///
    /// Fails with `InvalidInput` if the prefix contains a NUL byte, which
    /// `std` would otherwise turn into a panic at spawn time.
    pub(crate) fn thread_builder(&self, session: u64) -> io::Result<thread::Builder> {
        if self.thread_name.contains('\0') {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "thread name may not contain interior null bytes",
            ));
        }
        let builder = thread::Builder::new().name(format!("{}-{}", self.thread_name, session));
        Ok(match self.stack_size {
            Some(bytes) => builder.stack_size(bytes),
            None => builder,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.thread_name(), "yielder");
        assert_eq!(config.stack_size(), None);
        assert!(config.joins_on_close());
    }

    #[test]
    fn test_thread_builder_names_thread_after_session() {
        let handle = SessionConfig::new()
            .with_thread_name("gen")
            .with_stack_size(128 * 1024)
            .thread_builder(17)
            .unwrap()
            .spawn(|| thread::current().name().map(str::to_string))
            .unwrap();

        assert_eq!(handle.join().unwrap().as_deref(), Some("gen-17"));
    }

    #[test]
    fn test_nul_in_thread_name_is_an_error() {
        let err = SessionConfig::new()
            .with_thread_name("ge\0n")
            .thread_builder(1)
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
