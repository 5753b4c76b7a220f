//! The fault-injecting stream wrapper.

use std::fmt;

use tracing::debug;

use crate::error::{Error, Result};
use crate::executor::Executor;
use crate::stream::{LayeredStream, ReadStream, Role, Teardown, WriteStream};

use super::FaultCounter;

/// The counter a [`FailStream`] consults: its own, or one it borrows.
#[derive(Debug)]
enum Counter<'a> {
    Owned(FaultCounter),
    Shared(&'a FaultCounter),
}

impl Counter<'_> {
    fn get(&self) -> &FaultCounter {
        match self {
            Counter::Owned(counter) => counter,
            Counter::Shared(counter) => *counter,
        }
    }
}

/// A stream wrapper that fails.
///
/// Every operation first consults a [`FaultCounter`]. Until the counter's
/// threshold is reached the call is forwarded unchanged to the wrapped
/// stream; from then on it fails with the counter's configured error, in the
/// same form the call site asked for:
///
/// - strict calls return `Err`
/// - explicit calls set the error slot and return without touching the
///   wrapped stream
/// - deferred calls post the handler with the error to the wrapped stream's
///   executor, again without touching the wrapped stream
///
/// `FailStream` implements every capability trait its wrapped stream
/// implements, so it can wrap another `FailStream`, and
/// [`lowest_layer`](LayeredStream::lowest_layer) reaches through the whole
/// stack.
///
/// The wrapper is move-only. When several wrappers should draw from one
/// failure budget, build them with [`with_counter`](FailStream::with_counter)
/// over a counter that outlives all of them.
///
/// # Example
///
/// ```rust
/// use fail_stream::chaos::FailStream;
/// use fail_stream::executor::IoContext;
/// use fail_stream::mock::MockStream;
/// use fail_stream::stream::ReadStream;
/// use fail_stream::Error;
///
/// let ctx = IoContext::new();
/// let mut stream = FailStream::new(2, MockStream::new(ctx).with_input(b"hello"));
///
/// let mut buf = [0u8; 16];
/// assert_eq!(stream.read_some(&mut buf), Ok(5));
/// assert_eq!(stream.read_some(&mut buf), Err(Error::TestFailure));
/// ```
pub struct FailStream<'a, S> {
    counter: Counter<'a>,
    next_layer: S,
}

impl<'a, S> FailStream<'a, S> {
    /// Wrap `next_layer`, failing on the `n`th operation with
    /// [`Error::TestFailure`].
    #[must_use]
    pub fn new(n: u64, next_layer: S) -> Self {
        Self::from_counter(FaultCounter::new(n), next_layer)
    }

    /// Wrap `next_layer` with a counter owned by the wrapper.
    #[must_use]
    pub fn from_counter(counter: FaultCounter, next_layer: S) -> Self {
        Self {
            counter: Counter::Owned(counter),
            next_layer,
        }
    }

    /// Wrap `next_layer` with a counter owned elsewhere.
    ///
    /// Every wrapper built over the same counter draws from one shared
    /// failure budget. The counter must outlive the wrapper.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fail_stream::chaos::{FailStream, FaultCounter};
    /// use fail_stream::executor::IoContext;
    /// use fail_stream::mock::MockStream;
    /// use fail_stream::stream::WriteStream;
    ///
    /// let ctx = IoContext::new();
    /// let counter = FaultCounter::new(2);
    ///
    /// let mut a = FailStream::with_counter(&counter, MockStream::new(ctx.clone()));
    /// let mut b = FailStream::with_counter(&counter, MockStream::new(ctx));
    ///
    /// assert!(a.write_some(b"ping").is_ok());
    /// assert!(b.write_some(b"pong").is_err());
    /// ```
    #[must_use]
    pub fn with_counter(counter: &'a FaultCounter, next_layer: S) -> Self {
        Self {
            counter: Counter::Shared(counter),
            next_layer,
        }
    }

    /// Returns the counter this wrapper consults.
    #[must_use]
    pub fn counter(&self) -> &FaultCounter {
        self.counter.get()
    }

    /// Returns true if the counter is owned by this wrapper.
    #[must_use]
    pub fn owns_counter(&self) -> bool {
        matches!(self.counter, Counter::Owned(_))
    }

    /// Returns the wrapped stream.
    #[must_use]
    pub fn next_layer(&self) -> &S {
        &self.next_layer
    }

    /// Returns the wrapped stream, mutably.
    #[must_use]
    pub fn next_layer_mut(&mut self) -> &mut S {
        &mut self.next_layer
    }

    /// Unwrap, returning the wrapped stream.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.next_layer
    }

    fn check(&self, op: &'static str) -> Result<()> {
        self.counter().fail().map_err(|err| {
            debug!(op, call = self.counter().calls(), error = %err, "injecting failure");
            err
        })
    }

    fn check_ec(&self, op: &'static str, ec: &mut Option<Error>) -> bool {
        let failed = self.counter().fail_ec(ec);
        if failed {
            debug!(op, call = self.counter().calls(), "injecting failure");
        }
        failed
    }

    fn injected(&self, op: &'static str) -> Option<Error> {
        let mut ec = None;
        self.check_ec(op, &mut ec);
        ec
    }
}

impl<S: LayeredStream> LayeredStream for FailStream<'_, S> {
    type LowestLayer = S::LowestLayer;
    type Executor = S::Executor;

    fn lowest_layer(&self) -> &Self::LowestLayer {
        self.next_layer.lowest_layer()
    }

    fn lowest_layer_mut(&mut self) -> &mut Self::LowestLayer {
        self.next_layer.lowest_layer_mut()
    }

    fn executor(&self) -> &Self::Executor {
        self.next_layer.executor()
    }
}

impl<S: ReadStream> ReadStream for FailStream<'_, S> {
    fn read_some(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.check("read_some")?;
        self.next_layer.read_some(buf)
    }

    fn read_some_ec(&mut self, buf: &mut [u8], ec: &mut Option<Error>) -> usize {
        if self.check_ec("read_some", ec) {
            return 0;
        }
        self.next_layer.read_some_ec(buf, ec)
    }

    fn async_read_some<B, H>(&mut self, buf: B, handler: H)
    where
        B: AsMut<[u8]> + Send + 'static,
        H: FnOnce(Result<usize>, B) + Send + 'static,
    {
        if let Some(err) = self.injected("async_read_some") {
            self.next_layer
                .executor()
                .post(move || handler(Err(err), buf));
            return;
        }
        self.next_layer.async_read_some(buf, handler);
    }
}

impl<S: WriteStream> WriteStream for FailStream<'_, S> {
    fn write_some(&mut self, buf: &[u8]) -> Result<usize> {
        self.check("write_some")?;
        self.next_layer.write_some(buf)
    }

    fn write_some_ec(&mut self, buf: &[u8], ec: &mut Option<Error>) -> usize {
        if self.check_ec("write_some", ec) {
            return 0;
        }
        self.next_layer.write_some_ec(buf, ec)
    }

    fn async_write_some<B, H>(&mut self, buf: B, handler: H)
    where
        B: AsRef<[u8]> + Send + 'static,
        H: FnOnce(Result<usize>, B) + Send + 'static,
    {
        if let Some(err) = self.injected("async_write_some") {
            self.next_layer
                .executor()
                .post(move || handler(Err(err), buf));
            return;
        }
        self.next_layer.async_write_some(buf, handler);
    }
}

impl<S: Teardown> Teardown for FailStream<'_, S> {
    fn teardown(&mut self, role: Role, ec: &mut Option<Error>) {
        if self.check_ec("teardown", ec) {
            return;
        }
        crate::stream::teardown(role, &mut self.next_layer, ec);
    }

    fn async_teardown<H>(&mut self, role: Role, handler: H)
    where
        H: FnOnce(Result<()>) + Send + 'static,
    {
        if let Some(err) = self.injected("async_teardown") {
            self.next_layer.executor().post(move || handler(Err(err)));
            return;
        }
        crate::stream::async_teardown(role, &mut self.next_layer, handler);
    }
}

impl<S: fmt::Debug> fmt::Debug for FailStream<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailStream")
            .field("counter", self.counter())
            .field("owns_counter", &self.owns_counter())
            .field("next_layer", &self.next_layer)
            .finish()
    }
}
