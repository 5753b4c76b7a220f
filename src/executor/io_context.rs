//! The `IoContext` implementation.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use super::Executor;

type Handler = Box<dyn FnOnce() + Send + 'static>;

/// A deterministic handler queue.
///
/// Unlike a production runtime, `IoContext` never runs anything on its own.
/// Posted handlers wait in FIFO order until you drive the context with
/// [`poll_one`] or [`run`]. Clones share the same queue, so a stream can keep
/// one handle while the test keeps another.
///
/// # Example
///
/// ```rust
/// use fail_stream::executor::{Executor, IoContext};
///
/// let ctx = IoContext::new();
/// ctx.post(|| {});
/// ctx.post(|| {});
///
/// assert_eq!(ctx.pending_count(), 2);
///
/// // Run a single handler
/// assert!(ctx.poll_one());
/// assert_eq!(ctx.pending_count(), 1);
///
/// // Run the rest
/// assert_eq!(ctx.run(), 1);
/// assert!(ctx.is_empty());
/// ```
///
/// [`poll_one`]: IoContext::poll_one
/// [`run`]: IoContext::run
#[derive(Clone, Default)]
pub struct IoContext {
    inner: Arc<ContextInner>,
}

#[derive(Default)]
struct ContextInner {
    /// Handlers waiting to run.
    queue: Mutex<VecDeque<Handler>>,
    /// Total number of handlers executed.
    handled: AtomicU64,
}

impl IoContext {
    /// Creates a new, empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs at most one queued handler.
    ///
    /// Returns `true` if a handler ran, `false` if the queue was empty.
    #[must_use = "returns whether a handler ran"]
    pub fn poll_one(&self) -> bool {
        // The lock is released before the handler runs so it may post more work.
        let handler = self.inner.queue.lock().pop_front();

        match handler {
            Some(handler) => {
                handler();
                self.inner.handled.fetch_add(1, Ordering::SeqCst);
                true
            }
            None => false,
        }
    }

    /// Runs handlers until the queue is empty.
    ///
    /// Handlers posted by running handlers are executed in the same call.
    /// Returns the number of handlers that ran.
    pub fn run(&self) -> usize {
        let mut count = 0;
        while self.poll_one() {
            count += 1;
        }
        count
    }

    /// Returns the number of handlers waiting to run.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.inner.queue.lock().len()
    }

    /// Returns true if no handlers are waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending_count() == 0
    }

    /// Returns the total number of handlers this context has executed.
    #[must_use]
    pub fn handled_count(&self) -> u64 {
        self.inner.handled.load(Ordering::SeqCst)
    }

    /// Returns true if `other` is a handle onto the same queue.
    #[must_use]
    pub fn same_context(&self, other: &IoContext) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Executor for IoContext {
    fn post<F>(&self, handler: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.inner.queue.lock().push_back(Box::new(handler));
    }
}

impl fmt::Debug for IoContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IoContext")
            .field("pending", &self.pending_count())
            .field("handled", &self.handled_count())
            .finish()
    }
}
