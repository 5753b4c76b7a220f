//! Execution contexts for deferred completion handlers
//!
//! Asynchronous stream operations never call their completion handler from
//! inside the call that started them. Instead the handler is posted to an
//! [`Executor`] and runs later, when the executor is driven.
//!
//! - [`Executor`] - Trait for anything that can run posted handlers
//! - [`IoContext`] - Deterministic, manually driven handler queue
//! - `TokioExecutor` - Posts handlers onto a Tokio runtime (with `tokio` feature)
//!
//! # Example
//!
//! ```rust
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use std::sync::Arc;
//!
//! use fail_stream::executor::{Executor, IoContext};
//!
//! let ctx = IoContext::new();
//! let ran = Arc::new(AtomicBool::new(false));
//!
//! let flag = Arc::clone(&ran);
//! ctx.post(move || flag.store(true, Ordering::SeqCst));
//!
//! // Nothing runs until the context is driven
//! assert!(!ran.load(Ordering::SeqCst));
//!
//! assert_eq!(ctx.run(), 1);
//! assert!(ran.load(Ordering::SeqCst));
//! ```

mod io_context;

#[cfg(feature = "tokio")]
mod tokio;

pub use io_context::IoContext;

#[cfg(feature = "tokio")]
pub use self::tokio::TokioExecutor;

/// Something that runs posted completion handlers.
///
/// Implementations must never invoke the handler inline from within
/// [`post`](Executor::post); it runs at some later point, on whatever
/// thread or loop drives the executor.
pub trait Executor {
    /// Schedule `handler` to run later.
    fn post<F>(&self, handler: F)
    where
        F: FnOnce() + Send + 'static;
}

impl<E: Executor + ?Sized> Executor for &E {
    fn post<F>(&self, handler: F)
    where
        F: FnOnce() + Send + 'static,
    {
        (**self).post(handler);
    }
}
