//! A minimal "result handle" abstraction for externally scheduled work.
//!
//! The store and scheduler interface hand callers a
//! `Box<dyn PipelineFuture<T>>` without committing to how the result was
//! produced. Two variants are provided: one already resolved, one that
//! polls a caller-supplied predicate.

use std::fmt;
use std::thread;
use std::time::Duration;

/// A handle to the result of work that may already be done, or may still
/// be running elsewhere.
pub trait PipelineFuture<T>: Send + Sync {
    /// Returns `true` without blocking if the result is available.
    fn is_result_ready(&self) -> bool;

    /// Blocks until the result is available, then returns it.
    fn wait_for_result(&self) -> T;
}

/// A future that is ready immediately.
pub struct CompletedFuture<T>(T);

impl<T> CompletedFuture<T> {
    /// Wraps an already-known value as a ready future.
    pub fn new(value: T) -> Self {
        CompletedFuture(value)
    }
}

impl<T: Clone + Send + Sync> PipelineFuture<T> for CompletedFuture<T> {
    fn is_result_ready(&self) -> bool {
        true
    }

    fn wait_for_result(&self) -> T {
        self.0.clone()
    }
}

impl<T: fmt::Debug> fmt::Debug for CompletedFuture<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CompletedFuture").field(&self.0).finish()
    }
}

/// A future that busy-polls a predicate at a fixed interval, then fetches
/// the result once the predicate reports readiness.
pub struct PollingFuture<T> {
    check: Box<dyn Fn() -> bool + Send + Sync>,
    getter: Box<dyn Fn() -> T + Send + Sync>,
    poll_interval: Duration,
}

impl<T> PollingFuture<T> {
    /// Builds a polling future from a readiness check and a result getter,
    /// polling `check` every `poll_interval` while waiting.
    pub fn new(
        check: impl Fn() -> bool + Send + Sync + 'static,
        getter: impl Fn() -> T + Send + Sync + 'static,
        poll_interval: Duration,
    ) -> Self {
        PollingFuture {
            check: Box::new(check),
            getter: Box::new(getter),
            poll_interval,
        }
    }
}

impl<T> PipelineFuture<T> for PollingFuture<T> {
    fn is_result_ready(&self) -> bool {
        (self.check)()
    }

    fn wait_for_result(&self) -> T {
        while !(self.check)() {
            thread::sleep(self.poll_interval);
        }
        (self.getter)()
    }
}
