//! Capability traits for layered streams.
//!
//! A layered stream is a transport that may sit on top of another transport
//! (TLS over TCP, a fault injector over anything). Each I/O operation comes
//! in three forms, and a wrapper never changes which form a call site uses:
//!
//! | Form     | Read                        | Failure is reported by                |
//! |----------|-----------------------------|---------------------------------------|
//! | strict   | [`ReadStream::read_some`]       | `Err` propagated with `?`             |
//! | explicit | [`ReadStream::read_some_ec`]    | a caller-supplied `Option<Error>` slot |
//! | deferred | [`ReadStream::async_read_some`] | the first argument of the handler     |
//!
//! Deferred operations hand ownership of the buffer to the stream and get it
//! back in the completion handler, which is always posted to the stream's
//! [`Executor`] and never called inline.

mod teardown;

pub use teardown::{async_teardown, teardown, Role, Teardown};

use crate::error::{Error, Result};
use crate::executor::Executor;

/// Access to the layers beneath a stream and to its executor.
pub trait LayeredStream {
    /// The innermost stream of the stack.
    ///
    /// A concrete transport uses `Self`; a wrapper forwards its inner
    /// stream's `LowestLayer`.
    type LowestLayer: ?Sized;

    /// The executor completion handlers are posted to.
    type Executor: Executor;

    /// Returns the innermost stream of the stack.
    fn lowest_layer(&self) -> &Self::LowestLayer;

    /// Returns the innermost stream of the stack, mutably.
    fn lowest_layer_mut(&mut self) -> &mut Self::LowestLayer;

    /// Returns the executor this stream posts completion handlers to.
    fn executor(&self) -> &Self::Executor;
}

/// A stream bytes can be read from.
pub trait ReadStream: LayeredStream {
    /// Read some bytes into `buf`, failing fast.
    fn read_some(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Read some bytes into `buf`, reporting failure through `ec`.
    ///
    /// Returns the number of bytes read; on failure `ec` is set and the
    /// return value is zero.
    fn read_some_ec(&mut self, buf: &mut [u8], ec: &mut Option<Error>) -> usize;

    /// Start reading some bytes into `buf`.
    ///
    /// `handler` receives the outcome and the buffer once the read
    /// completes. It is never invoked before this call returns.
    fn async_read_some<B, H>(&mut self, buf: B, handler: H)
    where
        B: AsMut<[u8]> + Send + 'static,
        H: FnOnce(Result<usize>, B) + Send + 'static;
}

/// A stream bytes can be written to.
pub trait WriteStream: LayeredStream {
    /// Write some bytes from `buf`, failing fast.
    fn write_some(&mut self, buf: &[u8]) -> Result<usize>;

    /// Write some bytes from `buf`, reporting failure through `ec`.
    fn write_some_ec(&mut self, buf: &[u8], ec: &mut Option<Error>) -> usize;

    /// Start writing some bytes from `buf`.
    ///
    /// `handler` receives the outcome and the buffer once the write
    /// completes. It is never invoked before this call returns.
    fn async_write_some<B, H>(&mut self, buf: B, handler: H)
    where
        B: AsRef<[u8]> + Send + 'static,
        H: FnOnce(Result<usize>, B) + Send + 'static;
}

/// Converts an explicit-form outcome into a `Result`.
///
/// Useful for callers that drive the `_ec` variants but want `?` afterwards.
pub fn into_result<T>(value: T, ec: Option<Error>) -> Result<T> {
    match ec {
        Some(err) => Err(err),
        None => Ok(value),
    }
}
