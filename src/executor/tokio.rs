//! Tokio runtime integration.
//!
//! [`TokioExecutor`] lets a stream post its completion handlers onto a Tokio
//! runtime instead of an [`IoContext`](super::IoContext).
//!
//! # Example
//!
//! ```rust,ignore
//! use fail_stream::executor::{Executor, TokioExecutor};
//!
//! #[tokio::test]
//! async fn test_post() {
//!     let executor = TokioExecutor::current();
//!     executor.post(|| println!("runs on a tokio worker"));
//! }
//! ```

use ::tokio::runtime::Handle;

use super::Executor;

/// Posts handlers as tasks on a Tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioExecutor {
    handle: Handle,
}

impl TokioExecutor {
    /// Create an executor over the given runtime handle.
    #[must_use]
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Create an executor over the runtime the caller is running on.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    #[must_use]
    pub fn current() -> Self {
        Self::new(Handle::current())
    }

    /// Returns the underlying runtime handle.
    #[must_use]
    pub fn handle(&self) -> &Handle {
        &self.handle
    }
}

impl Executor for TokioExecutor {
    fn post<F>(&self, handler: F)
    where
        F: FnOnce() + Send + 'static,
    {
        // Spawned, never inline: the task only runs once the caller yields.
        drop(self.handle.spawn(async move { handler() }));
    }
}
